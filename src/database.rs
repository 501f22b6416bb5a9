//! Asset database
//!
//! The top-level authority over asset identity: scans registered directories,
//! generates and re-reads sidecar meta files, keeps the Path↔Id↔Meta tables
//! consistent, and drives load/save/delete through the per-kind repositories.
//!
//! All table access and the import critical section serialize on one mutex;
//! concurrent `refresh`/`import_asset` calls from background threads are
//! safe and never double-mint an id for the same path.

use crate::asset::AssetKind;
use crate::document;
use crate::error::{Result, VaultError};
use crate::handle::Handle;
use crate::id::AssetId;
use crate::importer::{ImporterConfig, ImporterRegistry};
use crate::meta::AssetMeta;
use crate::repository::{AssetRegistry, Stored};
use ahash::AHashMap;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Default)]
struct Tables {
    path_to_id: AHashMap<PathBuf, AssetId>,
    metas: AHashMap<AssetId, AssetMeta>,
}

impl Tables {
    fn bind(&mut self, meta: AssetMeta) -> AssetId {
        let id = meta.id;
        self.path_to_id.insert(meta.asset_path.clone(), id);
        self.metas.insert(id, meta);
        id
    }
}

/// Directory scanner and Path↔Id↔Meta authority
pub struct AssetDatabase {
    registry: Arc<AssetRegistry>,
    importers: ImporterRegistry,
    roots: Mutex<Vec<PathBuf>>,
    tables: Mutex<Tables>,
}

impl AssetDatabase {
    /// Database with the stock importer registry
    pub fn new(registry: Arc<AssetRegistry>) -> Self {
        Self::with_importers(registry, ImporterRegistry::with_defaults())
    }

    pub fn with_importers(registry: Arc<AssetRegistry>, importers: ImporterRegistry) -> Self {
        Self {
            registry,
            importers,
            roots: Mutex::new(Vec::new()),
            tables: Mutex::new(Tables::default()),
        }
    }

    pub fn registry(&self) -> &Arc<AssetRegistry> {
        &self.registry
    }

    /// Add a directory to the scan root set
    ///
    /// A missing directory is logged and skipped, not an error.
    pub fn register_asset_directory(&self, dir: impl Into<PathBuf>) {
        let dir = dir.into();
        if !dir.is_dir() {
            warn!("asset directory does not exist: {}", dir.display());
            return;
        }
        let mut roots = self.roots.lock();
        if !roots.contains(&dir) {
            debug!("registered asset directory: {}", dir.display());
            roots.push(dir);
        }
    }

    /// Remove a directory from the scan root set
    pub fn unregister_asset_directory(&self, dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        self.roots.lock().retain(|root| root != dir);
    }

    pub fn asset_directories(&self) -> Vec<PathBuf> {
        self.roots.lock().clone()
    }

    /// Scan every registered root and import files not yet tracked
    ///
    /// Idempotent; safe to call repeatedly and from background threads.
    pub fn refresh(&self) {
        let roots = self.asset_directories();
        for root in roots {
            self.scan_directory(&root);
        }
    }

    fn scan_directory(&self, dir: &Path) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot scan {}: {e}", dir.display());
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                // directories carry identity too, as folder assets
                if let Err(e) = self.import_asset(&path) {
                    warn!("import failed for {}: {e}", path.display());
                }
                self.scan_directory(&path);
            } else if !AssetMeta::is_meta_path(&path) {
                // idempotent; already-bound paths come back with their id
                if let Err(e) = self.import_asset(&path) {
                    warn!("import failed for {}: {e}", path.display());
                }
            }
        }
    }

    /// Bring a file under management
    ///
    /// Re-discovers an existing sibling meta without minting; otherwise mints
    /// a fresh id, infers the importer from the extension, and writes the
    /// meta file. Meta files themselves are rejected.
    pub fn import_asset(&self, path: impl AsRef<Path>) -> Result<AssetId> {
        let path = path.as_ref();
        if AssetMeta::is_meta_path(path) {
            warn!("refusing to import meta file: {}", path.display());
            return Err(VaultError::ImportRejected(path.display().to_string()));
        }

        // the whole check-mint-write sequence serializes on the table lock
        let mut tables = self.tables.lock();
        if let Some(id) = tables.path_to_id.get(path) {
            return Ok(*id);
        }

        let meta_path = AssetMeta::meta_path_for(path);
        let meta = if meta_path.exists() {
            // re-discovery: the meta id is the source of truth, the path
            // index is rebuilt from wherever the file lives now
            let mut meta = AssetMeta::load(&meta_path)?;
            meta.asset_path = path.to_path_buf();
            meta
        } else {
            let (kind, importer) = if path.is_dir() {
                (AssetKind::Folder, ImporterConfig::Folder)
            } else {
                self.importers.config_for(path)
            };
            if kind == AssetKind::Unknown {
                debug!("no importer for {}, tracking as inert", path.display());
            }
            let meta = AssetMeta::new(AssetId::generate(), path, kind, importer);
            meta.save(&meta_path)?;
            meta
        };

        debug!(id = %meta.id, "bound {}", path.display());
        Ok(tables.bind(meta))
    }

    /// Read a meta document straight from disk
    pub fn load_meta(&self, meta_path: impl AsRef<Path>) -> Result<AssetMeta> {
        AssetMeta::load(meta_path.as_ref())
    }

    /// Id bound to a path
    pub fn id_for_path(&self, path: impl AsRef<Path>) -> Result<AssetId> {
        let path = path.as_ref();
        self.tables
            .lock()
            .path_to_id
            .get(path)
            .copied()
            .ok_or_else(|| VaultError::MetaNotFound(path.display().to_string()))
    }

    /// Tracked meta record for an id
    pub fn meta_for_id(&self, id: AssetId) -> Result<AssetMeta> {
        self.tables
            .lock()
            .metas
            .get(&id)
            .cloned()
            .ok_or_else(|| VaultError::MetaNotFound(id.to_string()))
    }

    /// Tracked meta record for a path
    pub fn meta_for_path(&self, path: impl AsRef<Path>) -> Result<AssetMeta> {
        let id = self.id_for_path(path)?;
        self.meta_for_id(id)
    }

    /// Number of tracked (bound) content paths
    pub fn tracked_count(&self) -> usize {
        self.tables.lock().path_to_id.len()
    }

    /// Load an asset through its path binding
    pub fn load_asset<T: Stored>(&self, path: impl AsRef<Path>) -> Result<Handle<T>> {
        let meta = self.meta_for_path(path)?;
        self.load_asset_from_meta(&meta)
    }

    /// Load an asset through its id binding
    pub fn load_asset_by_id<T: Stored>(&self, id: AssetId) -> Result<Handle<T>> {
        let meta = self.meta_for_id(id)?;
        self.load_asset_from_meta(&meta)
    }

    /// Load (or return the already-loaded) asset for a meta record
    ///
    /// Check and insert are atomic per repository, so two threads loading
    /// the same cold id end up sharing one object.
    pub fn load_asset_from_meta<T: Stored>(&self, meta: &AssetMeta) -> Result<Handle<T>> {
        if meta.kind != T::KIND {
            return Err(VaultError::AssetNotFound(format!(
                "{} is a {:?}, not a {:?}",
                meta.id,
                meta.kind,
                T::KIND
            )));
        }

        self.registry
            .repository::<T>()
            .get_or_insert_with(meta.id, || {
                if !meta.asset_path.exists() {
                    return Err(VaultError::AssetNotFound(format!(
                        "content file gone: {}",
                        meta.asset_path.display()
                    )));
                }

                match &meta.importer {
                    ImporterConfig::Native => {
                        let mut asset: T = document::load(&meta.asset_path)?;
                        let info = asset.info_mut();
                        info.id = meta.id;
                        if info.name.is_empty() {
                            info.name = file_stem(&meta.asset_path);
                        }
                        Ok(asset)
                    }
                    ImporterConfig::Texture(_) | ImporterConfig::Model | ImporterConfig::Folder => {
                        T::from_import(meta).ok_or_else(|| {
                            VaultError::ImportRejected(format!(
                                "importer {:?} cannot produce a {:?}",
                                meta.importer,
                                T::KIND
                            ))
                        })
                    }
                    ImporterConfig::None => Err(VaultError::ImportRejected(format!(
                        "no importer for {}",
                        meta.asset_path.display()
                    ))),
                }
            })
    }

    /// Already-loaded asset by id; never touches disk
    pub fn get_asset<T: Stored>(&self, id: AssetId) -> Result<Handle<T>> {
        let handle = self.registry.repository::<T>().get(id);
        if handle.is_empty() {
            return Err(VaultError::AssetNotFound(id.to_string()));
        }
        Ok(handle)
    }

    /// Already-loaded asset by path; never touches disk
    pub fn get_asset_by_path<T: Stored>(&self, path: impl AsRef<Path>) -> Result<Handle<T>> {
        let id = self.id_for_path(path)?;
        self.get_asset(id)
    }

    /// Create a new asset on disk and bring it under management
    ///
    /// Collisions with existing files resolve through
    /// [`AssetDatabase::generate_unique_asset_path`].
    pub fn create_asset<T: Stored>(
        &self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Handle<T>> {
        let mut tables = self.tables.lock();
        let path = self.generate_unique_asset_path(path.as_ref());

        let mut asset = T::default();
        let id = AssetId::generate();
        {
            let info = asset.info_mut();
            info.id = id;
            info.name = name.into();
        }
        document::save(&path, &asset)?;

        let meta = AssetMeta::new(id, &path, T::KIND, ImporterConfig::Native);
        meta.save(&AssetMeta::meta_path_for(&path))?;
        tables.bind(meta);
        drop(tables);

        debug!(id = %id, "created {}", path.display());
        Ok(self.registry.repository::<T>().insert(asset))
    }

    /// Re-serialize the current in-memory state over the existing files
    ///
    /// Clears the dirty flag on success.
    pub fn update_asset<T: Stored>(&self, id: AssetId) -> Result<()> {
        let meta = self.meta_for_id(id)?;
        let handle = self.registry.repository::<T>().get(id);
        if handle.is_empty() {
            return Err(VaultError::AssetNotFound(id.to_string()));
        }

        {
            let asset = handle.get().read();
            document::save(&meta.asset_path, &*asset)?;
        }
        meta.save(&AssetMeta::meta_path_for(&meta.asset_path))?;
        handle.get().write().info_mut().dirty = false;
        Ok(())
    }

    /// [`AssetDatabase::update_asset`] addressed by path
    pub fn update_asset_by_path<T: Stored>(&self, path: impl AsRef<Path>) -> Result<()> {
        let id = self.id_for_path(path)?;
        self.update_asset::<T>(id)
    }

    /// Move an asset to a new location, keeping its id
    ///
    /// Both tables rebind under one lock; the old content and meta files are
    /// removed after the new ones are written.
    pub fn save_asset_as<T: Stored>(&self, id: AssetId, new_path: impl AsRef<Path>) -> Result<()> {
        let handle = self.registry.repository::<T>().get(id);
        if handle.is_empty() {
            return Err(VaultError::AssetNotFound(id.to_string()));
        }

        let mut tables = self.tables.lock();
        let old_meta = tables
            .metas
            .get(&id)
            .cloned()
            .ok_or_else(|| VaultError::MetaNotFound(id.to_string()))?;

        let new_path = self.generate_unique_asset_path(new_path.as_ref());
        {
            let asset = handle.get().read();
            document::save(&new_path, &*asset)?;
        }
        let new_meta = AssetMeta::new(id, &new_path, old_meta.kind, old_meta.importer.clone());
        new_meta.save(&AssetMeta::meta_path_for(&new_path))?;

        let _ = std::fs::remove_file(&old_meta.asset_path);
        let _ = std::fs::remove_file(AssetMeta::meta_path_for(&old_meta.asset_path));
        tables.path_to_id.remove(&old_meta.asset_path);
        tables.bind(new_meta);

        debug!(id = %id, "moved asset to {}", new_path.display());
        Ok(())
    }

    /// Remove an asset, its meta file, and its table entries
    ///
    /// The id is retired; outstanding handles still drive the deferred
    /// teardown of whatever is loaded.
    pub fn delete_asset_by_id(&self, id: AssetId) -> Result<()> {
        let mut tables = self.tables.lock();
        let meta = tables
            .metas
            .remove(&id)
            .ok_or_else(|| VaultError::MetaNotFound(id.to_string()))?;
        tables.path_to_id.remove(&meta.asset_path);
        drop(tables);

        self.registry.remove_by_kind(meta.kind, id);
        let _ = std::fs::remove_file(&meta.asset_path);
        let _ = std::fs::remove_file(AssetMeta::meta_path_for(&meta.asset_path));
        debug!(id = %id, "deleted {}", meta.asset_path.display());
        Ok(())
    }

    /// [`AssetDatabase::delete_asset_by_id`] addressed by path
    pub fn delete_asset(&self, path: impl AsRef<Path>) -> Result<()> {
        let id = self.id_for_path(path)?;
        self.delete_asset_by_id(id)
    }

    /// Find a free path by appending " (n)" before the extension
    pub fn generate_unique_asset_path(&self, path: &Path) -> PathBuf {
        if !path.exists() {
            return path.to_path_buf();
        }

        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let stem = file_stem(path);
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());

        for n in 1.. {
            let candidate = match &extension {
                Some(ext) => parent.join(format!("{stem} ({n}).{ext}")),
                None => parent.join(format!("{stem} ({n})")),
            };
            if !candidate.exists() {
                return candidate;
            }
        }
        unreachable!("ran out of disambiguators");
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::Material;
    use crate::lifecycle::lifecycle_channel;

    fn database() -> AssetDatabase {
        let (tx, _rx) = lifecycle_channel();
        AssetDatabase::new(Arc::new(AssetRegistry::new(tx)))
    }

    #[test]
    fn test_import_rejects_meta_files() {
        let db = database();
        let err = db.import_asset("assets/stone.mat.meta").unwrap_err();
        assert!(matches!(err, VaultError::ImportRejected(_)));
    }

    #[test]
    fn test_import_twice_binds_one_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.mat");
        std::fs::write(&path, "{}").unwrap();

        let db = database();
        let first = db.import_asset(&path).unwrap();
        let second = db.import_asset(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(db.tracked_count(), 1);
        assert!(AssetMeta::meta_path_for(&path).exists());
    }

    #[test]
    fn test_rediscovery_keeps_id_across_databases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stone.mat");
        std::fs::write(&path, "{}").unwrap();

        let original = database().import_asset(&path).unwrap();
        // a fresh database re-reads the sibling meta instead of minting
        let rediscovered = database().import_asset(&path).unwrap();
        assert_eq!(original, rediscovered);
    }

    #[test]
    fn test_register_missing_directory_is_silent() {
        let db = database();
        db.register_asset_directory("/nonexistent/assets");
        assert!(db.asset_directories().is_empty());
    }

    #[test]
    fn test_unregister_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db = database();
        db.register_asset_directory(dir.path());
        db.register_asset_directory(dir.path());
        assert_eq!(db.asset_directories().len(), 1);
        db.unregister_asset_directory(dir.path());
        assert!(db.asset_directories().is_empty());
    }

    #[test]
    fn test_generate_unique_asset_path() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("foo.mat");
        let db = database();

        assert_eq!(db.generate_unique_asset_path(&base), base);

        std::fs::write(&base, "{}").unwrap();
        let first = db.generate_unique_asset_path(&base);
        assert_eq!(first, dir.path().join("foo (1).mat"));

        std::fs::write(&first, "{}").unwrap();
        let second = db.generate_unique_asset_path(&base);
        assert_eq!(second, dir.path().join("foo (2).mat"));
    }

    #[test]
    fn test_lookup_misses_are_recoverable() {
        let db = database();
        assert!(matches!(
            db.id_for_path("never/imported.mat").unwrap_err(),
            VaultError::MetaNotFound(_)
        ));
        assert!(matches!(
            db.meta_for_id(AssetId::generate()).unwrap_err(),
            VaultError::MetaNotFound(_)
        ));
        assert!(matches!(
            db.get_asset::<Material>(AssetId::generate()).unwrap_err(),
            VaultError::AssetNotFound(_)
        ));
    }

    #[test]
    fn test_load_kind_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = database();
        let handle = db
            .create_asset::<Material>("stone", dir.path().join("stone.mat"))
            .unwrap();
        let err = db
            .load_asset_by_id::<crate::kinds::Mesh>(handle.id())
            .unwrap_err();
        assert!(matches!(err, VaultError::AssetNotFound(_)));
    }

    #[test]
    fn test_inert_files_track_but_do_not_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.xyz");
        std::fs::write(&path, "hello").unwrap();

        let db = database();
        let id = db.import_asset(&path).unwrap();
        assert_eq!(db.meta_for_id(id).unwrap().kind, AssetKind::Unknown);
    }
}

//! Per-kind asset repositories
//!
//! A [`Repository`] is the CRUD map from [`AssetId`] to the owned asset
//! object for one kind. The [`AssetRegistry`] holds one repository per kind
//! and the [`Stored`] trait selects the right one at compile time, so generic
//! code never switches on a runtime type tag.

use crate::asset::{Asset, AssetKind};
use crate::error::{Result, VaultError};
use crate::handle::{Handle, HandleCore};
use crate::id::AssetId;
use crate::kinds::{Folder, Material, Mesh, Model, Pipeline, Prefab, Texture};
use crate::lifecycle::{LifecycleAction, LifecycleSender};
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// CRUD container for one asset kind
pub struct Repository<T: Asset> {
    entries: RwLock<AHashMap<AssetId, Arc<HandleCore<T>>>>,
    sender: LifecycleSender,
}

impl<T: Asset> Repository<T> {
    pub fn new(sender: LifecycleSender) -> Self {
        Self {
            entries: RwLock::new(AHashMap::new()),
            sender,
        }
    }

    /// Insert an already-identified asset and hand back the first reference
    ///
    /// The returned handle's attach stages Init, which runs the kind's
    /// post-load fix-up on the queue consumer.
    pub fn insert(&self, asset: T) -> Handle<T> {
        let id = asset.id();
        let core = HandleCore::new(asset, self.sender.clone());
        self.entries.write().insert(id, core.clone());
        Handle::attach(core)
    }

    /// Lookup by id; a miss yields the empty handle, not an error
    pub fn get(&self, id: AssetId) -> Handle<T> {
        match self.entries.read().get(&id) {
            Some(core) => Handle::attach(core.clone()),
            None => Handle::empty(),
        }
    }

    /// Lookup by id, building and inserting the asset on a miss
    ///
    /// Check and insert happen under one write lock, so concurrent callers
    /// racing on the same id build the object exactly once. The build
    /// closure runs inside the lock; cold loads of one kind serialize.
    pub fn get_or_insert_with<F>(&self, id: AssetId, build: F) -> Result<Handle<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let mut entries = self.entries.write();
        if let Some(core) = entries.get(&id) {
            return Ok(Handle::attach(core.clone()));
        }
        let asset = build()?;
        let core = HandleCore::new(asset, self.sender.clone());
        entries.insert(id, core.clone());
        Ok(Handle::attach(core))
    }

    /// Snapshot of handles to every mapped asset, in no particular order
    pub fn get_all(&self) -> Vec<Handle<T>> {
        self.entries
            .read()
            .values()
            .map(|core| Handle::attach(core.clone()))
            .collect()
    }

    /// Stage a derived-state rebuild for the asset
    ///
    /// The refresh hook itself runs when the queue owner drains Update, and
    /// is idempotent by contract.
    pub fn update(&self, id: AssetId) -> Result<()> {
        let entries = self.entries.read();
        let core = entries
            .get(&id)
            .ok_or_else(|| VaultError::AssetNotFound(id.to_string()))?;
        self.sender
            .enqueue(LifecycleAction::Update, core.cell().clone());
        Ok(())
    }

    /// Unmap an asset
    ///
    /// Does not release derived resources; outstanding handles keep driving
    /// the lifecycle, and the last release stages the Delete.
    pub fn remove(&self, id: AssetId) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    pub fn contains(&self, id: AssetId) -> bool {
        self.entries.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<T: Asset + Default> Repository<T> {
    /// Allocate a fresh default asset under a newly minted id
    pub fn create(&self, name: impl Into<String>) -> Handle<T> {
        let mut asset = T::default();
        let info = asset.info_mut();
        info.id = AssetId::generate();
        info.name = name.into();
        self.insert(asset)
    }
}

/// Compile-time association from an asset kind to its repository
///
/// Implemented once per concrete kind so generic database code can write
/// `registry.repository::<Material>()`.
pub trait Stored: Asset + Default + Serialize + DeserializeOwned + Sized {
    const KIND: AssetKind;

    fn repository(registry: &AssetRegistry) -> &Repository<Self>;

    /// Construct the in-memory object for a source-file-backed import
    ///
    /// Kinds persisted as native documents return `None`; the database
    /// deserializes those instead.
    fn from_import(meta: &crate::meta::AssetMeta) -> Option<Self> {
        let _ = meta;
        None
    }
}

fn import_name(meta: &crate::meta::AssetMeta) -> String {
    meta.asset_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

macro_rules! impl_stored {
    ($ty:ty, $kind:expr, $field:ident) => {
        impl Stored for $ty {
            const KIND: AssetKind = $kind;

            fn repository(registry: &AssetRegistry) -> &Repository<Self> {
                &registry.$field
            }
        }
    };
}

impl_stored!(Material, AssetKind::Material, materials);
impl_stored!(Mesh, AssetKind::Mesh, meshes);
impl_stored!(Pipeline, AssetKind::Pipeline, pipelines);
impl_stored!(Prefab, AssetKind::Prefab, prefabs);

impl Stored for Folder {
    const KIND: AssetKind = AssetKind::Folder;

    fn repository(registry: &AssetRegistry) -> &Repository<Self> {
        &registry.folders
    }

    // scanned directories materialize as bare identity markers
    fn from_import(meta: &crate::meta::AssetMeta) -> Option<Self> {
        let mut folder = Folder::default();
        folder.info = crate::asset::AssetInfo::new(meta.id, import_name(meta));
        Some(folder)
    }
}

impl Stored for Texture {
    const KIND: AssetKind = AssetKind::Texture;

    fn repository(registry: &AssetRegistry) -> &Repository<Self> {
        &registry.textures
    }

    fn from_import(meta: &crate::meta::AssetMeta) -> Option<Self> {
        let mut texture = Texture::default();
        texture.info = crate::asset::AssetInfo::new(meta.id, import_name(meta));
        texture.source_path = meta.asset_path.clone();
        Some(texture)
    }
}

impl Stored for Model {
    const KIND: AssetKind = AssetKind::Model;

    fn repository(registry: &AssetRegistry) -> &Repository<Self> {
        &registry.models
    }

    fn from_import(meta: &crate::meta::AssetMeta) -> Option<Self> {
        let mut model = Model::default();
        model.info = crate::asset::AssetInfo::new(meta.id, import_name(meta));
        model.source_path = meta.asset_path.clone();
        Some(model)
    }
}

/// One repository per asset kind, built once at startup
pub struct AssetRegistry {
    materials: Repository<Material>,
    meshes: Repository<Mesh>,
    pipelines: Repository<Pipeline>,
    textures: Repository<Texture>,
    models: Repository<Model>,
    prefabs: Repository<Prefab>,
    folders: Repository<Folder>,
}

impl AssetRegistry {
    pub fn new(sender: LifecycleSender) -> Self {
        Self {
            materials: Repository::new(sender.clone()),
            meshes: Repository::new(sender.clone()),
            pipelines: Repository::new(sender.clone()),
            textures: Repository::new(sender.clone()),
            models: Repository::new(sender.clone()),
            prefabs: Repository::new(sender.clone()),
            folders: Repository::new(sender),
        }
    }

    /// The repository for a statically known kind
    pub fn repository<T: Stored>(&self) -> &Repository<T> {
        T::repository(self)
    }

    /// Unmap an asset whose kind is only known at runtime (delete paths)
    pub fn remove_by_kind(&self, kind: AssetKind, id: AssetId) -> bool {
        match kind {
            AssetKind::Material => self.materials.remove(id),
            AssetKind::Mesh => self.meshes.remove(id),
            AssetKind::Pipeline => self.pipelines.remove(id),
            AssetKind::Texture => self.textures.remove(id),
            AssetKind::Model => self.models.remove(id),
            AssetKind::Prefab => self.prefabs.remove(id),
            AssetKind::Folder => self.folders.remove(id),
            AssetKind::Unknown => false,
        }
    }
}

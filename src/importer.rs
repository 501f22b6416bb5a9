//! Extension-keyed importer registry
//!
//! Built once at startup; maps file extensions to the asset kind and importer
//! configuration recorded in the meta file. Unrecognized extensions map to no
//! importer and the file stays inert.

use crate::asset::AssetKind;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the texture importer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureImportSettings {
    pub generate_mips: bool,
    pub srgb: bool,
}

impl Default for TextureImportSettings {
    fn default() -> Self {
        Self {
            generate_mips: true,
            srgb: true,
        }
    }
}

/// Importer configuration persisted in the meta file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ImporterConfig {
    /// Image file decoded into a texture
    Texture(TextureImportSettings),
    /// Native JSON document (materials, pipelines, prefabs, meshes)
    Native,
    /// Industry model format; geometry extraction happens elsewhere
    Model,
    /// Scanned directory tracked as an identity-only folder asset
    Folder,
    /// No importer matched; the asset is tracked but inert
    None,
}

impl ImporterConfig {
    /// The default configuration for a kind
    pub fn for_kind(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Texture => ImporterConfig::Texture(TextureImportSettings::default()),
            AssetKind::Model => ImporterConfig::Model,
            AssetKind::Folder => ImporterConfig::Folder,
            AssetKind::Material
            | AssetKind::Mesh
            | AssetKind::Pipeline
            | AssetKind::Prefab => ImporterConfig::Native,
            AssetKind::Unknown => ImporterConfig::None,
        }
    }
}

/// Extension → kind table
pub struct ImporterRegistry {
    by_extension: AHashMap<String, AssetKind>,
}

impl ImporterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            by_extension: AHashMap::new(),
        }
    }

    /// Registry pre-populated with the stock importers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for ext in ["png", "jpg", "jpeg", "bmp", "tga"] {
            registry.register(ext, AssetKind::Texture);
        }
        for ext in ["fbx", "obj", "gltf", "glb"] {
            registry.register(ext, AssetKind::Model);
        }
        registry.register("mat", AssetKind::Material);
        registry.register("pipeline", AssetKind::Pipeline);
        registry.register("prefab", AssetKind::Prefab);
        registry.register("mesh", AssetKind::Mesh);
        registry
    }

    /// Bind an extension (without the dot, case-insensitive) to a kind
    pub fn register(&mut self, extension: &str, kind: AssetKind) {
        self.by_extension
            .insert(extension.to_ascii_lowercase(), kind);
    }

    /// Kind for a path, by extension
    pub fn kind_for(&self, path: &Path) -> Option<AssetKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.by_extension.get(&ext).copied()
    }

    /// Importer configuration for a path; `None` config when unrecognized
    pub fn config_for(&self, path: &Path) -> (AssetKind, ImporterConfig) {
        match self.kind_for(path) {
            Some(kind) => (kind, ImporterConfig::for_kind(kind)),
            None => (AssetKind::Unknown, ImporterConfig::None),
        }
    }
}

impl Default for ImporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_extension_mapping() {
        let registry = ImporterRegistry::with_defaults();
        assert_eq!(
            registry.kind_for(&PathBuf::from("a/b/c.png")),
            Some(AssetKind::Texture)
        );
        assert_eq!(
            registry.kind_for(&PathBuf::from("rock.FBX")),
            Some(AssetKind::Model)
        );
        assert_eq!(
            registry.kind_for(&PathBuf::from("stone.mat")),
            Some(AssetKind::Material)
        );
        assert_eq!(registry.kind_for(&PathBuf::from("notes.xyz")), None);
        assert_eq!(registry.kind_for(&PathBuf::from("no_extension")), None);
    }

    #[test]
    fn test_unrecognized_maps_to_inert_config() {
        let registry = ImporterRegistry::with_defaults();
        let (kind, config) = registry.config_for(&PathBuf::from("readme.xyz"));
        assert_eq!(kind, AssetKind::Unknown);
        assert_eq!(config, ImporterConfig::None);
    }

    #[test]
    fn test_custom_registration_wins() {
        let mut registry = ImporterRegistry::with_defaults();
        registry.register("xyz", AssetKind::Texture);
        assert_eq!(
            registry.kind_for(&PathBuf::from("a.xyz")),
            Some(AssetKind::Texture)
        );
    }

    #[test]
    fn test_config_serde_shape() {
        let config = ImporterConfig::Texture(TextureImportSettings::default());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"kind\":\"Texture\""));
        let back: ImporterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

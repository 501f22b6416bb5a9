//! Concrete asset kinds
//!
//! Each kind keeps its declarative fields in the serde schema and rebuilds
//! derived state in `refresh`. Small kinds (model, prefab, folder) live here;
//! the heavier ones get their own files.

pub mod material;
pub mod mesh;
pub mod pipeline;
pub mod texture;

pub use material::{Material, MaterialParams};
pub use mesh::Mesh;
pub use pipeline::{CompiledProgram, Pipeline};
pub use texture::{FilterMode, Texture, WrapMode};

use crate::asset::{Asset, AssetInfo, AssetKind};
use crate::id::AssetId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Imported 3D model referencing its extracted meshes
///
/// Geometry decoding of the source format is handled outside this crate; the
/// model asset only carries identity and the mesh ids split out of it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Model {
    #[serde(flatten)]
    pub info: AssetInfo,
    pub source_path: PathBuf,
    pub meshes: Vec<AssetId>,
}

impl Asset for Model {
    fn info(&self) -> &AssetInfo {
        &self.info
    }
    fn info_mut(&mut self) -> &mut AssetInfo {
        &mut self.info
    }
    fn kind(&self) -> AssetKind {
        AssetKind::Model
    }
}

/// One object in a prefab
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefabNode {
    pub name: String,
    pub material: AssetId,
    pub mesh: AssetId,
}

/// Reusable collection of pre-wired objects
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Prefab {
    #[serde(flatten)]
    pub info: AssetInfo,
    pub nodes: Vec<PrefabNode>,
}

impl Asset for Prefab {
    fn info(&self) -> &AssetInfo {
        &self.info
    }
    fn info_mut(&mut self) -> &mut AssetInfo {
        &mut self.info
    }
    fn kind(&self) -> AssetKind {
        AssetKind::Prefab
    }
}

/// Directory marker so folders can carry identity too
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Folder {
    #[serde(flatten)]
    pub info: AssetInfo,
}

impl Asset for Folder {
    fn info(&self) -> &AssetInfo {
        &self.info
    }
    fn info_mut(&mut self) -> &mut AssetInfo {
        &mut self.info
    }
    fn kind(&self) -> AssetKind {
        AssetKind::Folder
    }
}

//! Material asset
//!
//! One tagged-variant type instead of a class hierarchy: shared fields (base
//! color, pipeline reference) sit in the envelope struct, the shading model
//! picks the parameter payload.

use crate::asset::{Asset, AssetInfo, AssetKind};
use crate::id::AssetId;
use ahash::AHashMap;
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Shading-model specific parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MaterialParams {
    Pbr {
        metallic: f32,
        roughness: f32,
        albedo_map: AssetId,
    },
    Phong {
        diffuse: Vec3,
        specular: Vec3,
        shininess: f32,
    },
    Custom {
        values: AHashMap<String, f32>,
    },
}

impl Default for MaterialParams {
    fn default() -> Self {
        MaterialParams::Pbr {
            metallic: 0.0,
            roughness: 1.0,
            albedo_map: AssetId::EMPTY,
        }
    }
}

/// Surface description binding a pipeline to shading parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Material {
    #[serde(flatten)]
    pub info: AssetInfo,
    pub color: Vec4,
    /// Pipeline asset rendering this material
    pub pipeline: AssetId,
    pub params: MaterialParams,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            info: AssetInfo::default(),
            color: Vec4::ONE,
            pipeline: AssetId::EMPTY,
            params: MaterialParams::default(),
        }
    }
}

impl Asset for Material {
    fn info(&self) -> &AssetInfo {
        &self.info
    }
    fn info_mut(&mut self) -> &mut AssetInfo {
        &mut self.info
    }
    fn kind(&self) -> AssetKind {
        AssetKind::Material
    }
}

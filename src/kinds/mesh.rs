//! Mesh asset
//!
//! Vertex attributes and indices are the schema; the interleaved buffer and
//! bounding box are derived and rebuilt on refresh.

use crate::asset::{Asset, AssetInfo, AssetKind};
use crate::error::{Result, VaultError};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Triangle mesh with position/normal/uv attributes
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mesh {
    #[serde(flatten)]
    pub info: AssetInfo,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    /// Interleaved P/N/UV stream ready for buffer upload
    #[serde(skip)]
    packed: Vec<f32>,
    /// (min, max) corners
    #[serde(skip)]
    bounds: Option<(Vec3, Vec3)>,
}

impl Mesh {
    /// Interleaved vertex stream, empty until refreshed
    pub fn packed(&self) -> &[f32] {
        &self.packed
    }

    /// Axis-aligned bounds, `None` until refreshed or for empty meshes
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.bounds
    }

    fn validate(&self) -> Result<()> {
        let vertex_count = self.positions.len() as u32;
        if let Some(bad) = self.indices.iter().find(|i| **i >= vertex_count) {
            return Err(VaultError::GpuResourceFailure(format!(
                "mesh '{}': index {bad} out of range for {vertex_count} vertices",
                self.info.name
            )));
        }
        Ok(())
    }
}

impl Asset for Mesh {
    fn info(&self) -> &AssetInfo {
        &self.info
    }
    fn info_mut(&mut self) -> &mut AssetInfo {
        &mut self.info
    }
    fn kind(&self) -> AssetKind {
        AssetKind::Mesh
    }

    fn initialize(&mut self) -> Result<()> {
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        self.validate()?;

        self.packed.clear();
        self.packed.reserve(self.positions.len() * 8);
        for (i, pos) in self.positions.iter().enumerate() {
            let normal = self.normals.get(i).copied().unwrap_or(Vec3::Z);
            let uv = self.uvs.get(i).copied().unwrap_or(Vec2::ZERO);
            self.packed
                .extend_from_slice(&[pos.x, pos.y, pos.z, normal.x, normal.y, normal.z, uv.x, uv.y]);
        }

        self.bounds = self.positions.iter().fold(None, |acc, p| match acc {
            None => Some((*p, *p)),
            Some((min, max)) => Some((min.min(*p), max.max(*p))),
        });
        Ok(())
    }

    fn teardown(&mut self) {
        self.packed = Vec::new();
        self.bounds = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::AssetId;

    fn quad() -> Mesh {
        Mesh {
            info: AssetInfo::new(AssetId::generate(), "quad"),
            positions: vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            ..Default::default()
        }
    }

    #[test]
    fn test_refresh_builds_derived_state() {
        let mut mesh = quad();
        assert!(mesh.packed().is_empty());
        mesh.refresh().unwrap();
        assert_eq!(mesh.packed().len(), 4 * 8);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut mesh = quad();
        mesh.refresh().unwrap();
        let first = mesh.packed().to_vec();
        mesh.refresh().unwrap();
        assert_eq!(mesh.packed(), first.as_slice());
    }

    #[test]
    fn test_out_of_range_index_fails() {
        let mut mesh = quad();
        mesh.indices.push(99);
        let err = mesh.refresh().unwrap_err();
        assert!(matches!(err, VaultError::GpuResourceFailure(_)));
    }

    #[test]
    fn test_serde_excludes_derived_fields() {
        let mut mesh = quad();
        mesh.refresh().unwrap();
        let json = serde_json::to_string(&mesh).unwrap();
        let mut back: Mesh = serde_json::from_str(&json).unwrap();
        assert_eq!(back.positions, mesh.positions);
        assert_eq!(back.indices, mesh.indices);
        // derived state comes back only through refresh
        assert!(back.packed().is_empty());
        back.refresh().unwrap();
        assert_eq!(back.packed(), mesh.packed());
    }

    #[test]
    fn test_teardown_clears_derived_state() {
        let mut mesh = quad();
        mesh.refresh().unwrap();
        mesh.teardown();
        assert!(mesh.packed().is_empty());
        assert!(mesh.bounds().is_none());
    }
}

//! Texture asset
//!
//! The schema is the source path plus sampler settings; decoded RGBA pixels
//! and dimensions are derived state.

use crate::asset::{Asset, AssetInfo, AssetKind};
use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    #[default]
    Repeat,
    Clamp,
}

/// Image-backed texture
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Texture {
    #[serde(flatten)]
    pub info: AssetInfo,
    pub source_path: PathBuf,
    pub filter: FilterMode,
    pub wrap: WrapMode,
    #[serde(skip)]
    pixels: Option<Vec<u8>>,
    #[serde(skip)]
    width: u32,
    #[serde(skip)]
    height: u32,
}

impl Texture {
    /// Decoded RGBA8 pixels, `None` until refreshed
    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Asset for Texture {
    fn info(&self) -> &AssetInfo {
        &self.info
    }
    fn info_mut(&mut self) -> &mut AssetInfo {
        &mut self.info
    }
    fn kind(&self) -> AssetKind {
        AssetKind::Texture
    }

    fn initialize(&mut self) -> Result<()> {
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        if self.source_path.as_os_str().is_empty() {
            self.pixels = None;
            self.width = 0;
            self.height = 0;
            return Ok(());
        }

        let image = image::open(&self.source_path).map_err(|e| {
            VaultError::GpuResourceFailure(format!(
                "texture '{}': cannot decode {}: {e}",
                self.info.name,
                self.source_path.display()
            ))
        })?;
        let rgba = image.to_rgba8();
        self.width = rgba.width();
        self.height = rgba.height();
        self.pixels = Some(rgba.into_raw());
        Ok(())
    }

    fn teardown(&mut self) {
        self.pixels = None;
        self.width = 0;
        self.height = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::AssetId;

    #[test]
    fn test_refresh_decodes_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        image::RgbaImage::from_fn(4, 2, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        })
        .save(&path)
        .unwrap();

        let mut texture = Texture {
            info: AssetInfo::new(AssetId::generate(), "checker"),
            source_path: path,
            ..Default::default()
        };
        texture.refresh().unwrap();
        assert_eq!(texture.width(), 4);
        assert_eq!(texture.height(), 2);
        assert_eq!(texture.pixels().unwrap().len(), 4 * 2 * 4);

        texture.teardown();
        assert!(texture.pixels().is_none());
    }

    #[test]
    fn test_missing_image_is_gpu_failure() {
        let mut texture = Texture {
            info: AssetInfo::new(AssetId::generate(), "gone"),
            source_path: PathBuf::from("/nonexistent/gone.png"),
            ..Default::default()
        };
        let err = texture.refresh().unwrap_err();
        assert!(matches!(err, VaultError::GpuResourceFailure(_)));
    }

    #[test]
    fn test_schema_round_trip() {
        let texture = Texture {
            info: AssetInfo::new(AssetId::generate(), "t"),
            source_path: PathBuf::from("textures/t.png"),
            filter: FilterMode::Nearest,
            wrap: WrapMode::Clamp,
            ..Default::default()
        };
        let json = serde_json::to_string(&texture).unwrap();
        let back: Texture = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source_path, texture.source_path);
        assert_eq!(back.filter, FilterMode::Nearest);
        assert_eq!(back.wrap, WrapMode::Clamp);
        assert!(back.pixels().is_none());
    }
}

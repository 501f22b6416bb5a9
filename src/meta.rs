//! Sidecar metadata files
//!
//! Every imported file gets a `<name>.meta` JSON sibling binding its path to
//! an [`AssetId`] and importer configuration. The meta file is the source of
//! truth for identity; the path tables can always be rebuilt by re-scanning.

use crate::asset::AssetKind;
use crate::document;
use crate::error::{Result, VaultError};
use crate::id::AssetId;
use crate::importer::ImporterConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted metadata record for one asset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetMeta {
    #[serde(rename = "ID")]
    pub id: AssetId,
    #[serde(rename = "assetPath")]
    pub asset_path: PathBuf,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub importer: ImporterConfig,
}

impl AssetMeta {
    pub fn new(
        id: AssetId,
        asset_path: impl Into<PathBuf>,
        kind: AssetKind,
        importer: ImporterConfig,
    ) -> Self {
        Self {
            id,
            asset_path: asset_path.into(),
            kind,
            importer,
        }
    }

    /// Sibling meta path for a content path (`foo.mat` → `foo.mat.meta`)
    pub fn meta_path_for(path: &Path) -> PathBuf {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(".meta");
        PathBuf::from(raw)
    }

    /// Whether a path names a meta file
    pub fn is_meta_path(path: &Path) -> bool {
        path.extension().map(|ext| ext == "meta").unwrap_or(false)
    }

    /// Load a meta document from disk
    ///
    /// A missing file is [`VaultError::MetaNotFound`]; a present but invalid
    /// one is [`VaultError::MalformedDocument`].
    pub fn load(meta_path: &Path) -> Result<Self> {
        if !meta_path.exists() {
            return Err(VaultError::MetaNotFound(meta_path.display().to_string()));
        }
        document::load(meta_path)
    }

    /// Write the meta document next to its asset
    pub fn save(&self, meta_path: &Path) -> Result<()> {
        document::save(meta_path, self)
    }
}

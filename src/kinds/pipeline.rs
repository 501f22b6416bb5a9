//! Pipeline (shader program) asset
//!
//! The schema is the pair of shader source paths; the loaded sources and the
//! link hash standing in for the compiled program are derived state.

use crate::asset::{Asset, AssetInfo, AssetKind};
use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::hash::Hasher;
use std::path::PathBuf;

/// Derived program state, rebuilt from the source paths
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledProgram {
    pub vertex_source: String,
    pub fragment_source: String,
    /// Content hash over both stages; stable across identical sources
    pub link_hash: u64,
}

/// Render pipeline built from vertex/fragment shader sources
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(flatten)]
    pub info: AssetInfo,
    pub vertex_path: PathBuf,
    pub fragment_path: PathBuf,
    #[serde(skip)]
    program: Option<CompiledProgram>,
}

impl Pipeline {
    /// Compiled program, `None` until refreshed
    pub fn program(&self) -> Option<&CompiledProgram> {
        self.program.as_ref()
    }

    fn read_stage(&self, path: &PathBuf) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| {
            VaultError::GpuResourceFailure(format!(
                "pipeline '{}': cannot read stage {}: {e}",
                self.info.name,
                path.display()
            ))
        })
    }
}

impl Asset for Pipeline {
    fn info(&self) -> &AssetInfo {
        &self.info
    }
    fn info_mut(&mut self) -> &mut AssetInfo {
        &mut self.info
    }
    fn kind(&self) -> AssetKind {
        AssetKind::Pipeline
    }

    fn initialize(&mut self) -> Result<()> {
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        // A pipeline without sources is legal (freshly created in the editor)
        if self.vertex_path.as_os_str().is_empty() || self.fragment_path.as_os_str().is_empty() {
            self.program = None;
            return Ok(());
        }

        let vertex_source = self.read_stage(&self.vertex_path)?;
        let fragment_source = self.read_stage(&self.fragment_path)?;

        let mut hasher = ahash::AHasher::default();
        hasher.write(vertex_source.as_bytes());
        hasher.write(fragment_source.as_bytes());
        let link_hash = hasher.finish();

        self.program = Some(CompiledProgram {
            vertex_source,
            fragment_source,
            link_hash,
        });
        Ok(())
    }

    fn teardown(&mut self) {
        self.program = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::AssetId;
    use std::io::Write;

    fn stage_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_refresh_loads_and_links() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = Pipeline {
            info: AssetInfo::new(AssetId::generate(), "lit"),
            vertex_path: stage_file(&dir, "lit.vert", "void main() {}"),
            fragment_path: stage_file(&dir, "lit.frag", "void main() { frag(); }"),
            program: None,
        };

        pipeline.refresh().unwrap();
        let program = pipeline.program().unwrap().clone();
        assert_eq!(program.vertex_source, "void main() {}");

        // same sources, same derived state
        pipeline.refresh().unwrap();
        assert_eq!(pipeline.program().unwrap().link_hash, program.link_hash);
    }

    #[test]
    fn test_missing_stage_is_gpu_failure() {
        let mut pipeline = Pipeline {
            info: AssetInfo::new(AssetId::generate(), "broken"),
            vertex_path: PathBuf::from("/nonexistent/a.vert"),
            fragment_path: PathBuf::from("/nonexistent/a.frag"),
            program: None,
        };
        let err = pipeline.refresh().unwrap_err();
        assert!(matches!(err, VaultError::GpuResourceFailure(_)));
    }

    #[test]
    fn test_sourceless_pipeline_is_legal() {
        let mut pipeline = Pipeline::default();
        pipeline.refresh().unwrap();
        assert!(pipeline.program().is_none());
    }
}

//! Core asset abstractions
//!
//! Every concrete asset kind embeds an [`AssetInfo`] envelope and implements
//! [`Asset`]. Declarative fields are serialized to the content document;
//! derived state (packed buffers, decoded pixels, compiled programs) lives
//! outside the schema and is rebuilt through the lifecycle hooks.

use crate::error::Result;
use crate::id::AssetId;
use serde::{Deserialize, Serialize};

/// Runtime load state of an asset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    /// Derived state not built (or torn down)
    #[default]
    Unloaded,
    /// Derived state built and usable
    Ready,
    /// A deferred init/update failed; the asset renders as a placeholder
    Failed,
}

/// Asset kind tag
///
/// Enum-keyed dispatch for importers, repositories and meta records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Material,
    Mesh,
    Pipeline,
    Texture,
    Model,
    Prefab,
    Folder,
    /// Scanned file with no matching importer; tracked but inert
    Unknown,
}

/// Shared fields every asset kind carries
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub id: AssetId,
    pub name: String,
    /// Unsaved in-memory mutation
    #[serde(skip)]
    pub dirty: bool,
    #[serde(skip)]
    pub state: LoadState,
}

impl AssetInfo {
    /// Create an envelope with the given identity
    pub fn new(id: AssetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            dirty: false,
            state: LoadState::Unloaded,
        }
    }
}

/// Trait implemented by every asset kind
pub trait Asset: Send + Sync + 'static {
    /// Shared envelope
    fn info(&self) -> &AssetInfo;

    /// Mutable shared envelope
    fn info_mut(&mut self) -> &mut AssetInfo;

    /// Kind tag
    fn kind(&self) -> AssetKind;

    /// Stable identifier
    fn id(&self) -> AssetId {
        self.info().id
    }

    /// Human-readable name
    fn name(&self) -> &str {
        &self.info().name
    }

    /// Whether in-memory state has unsaved changes
    fn is_dirty(&self) -> bool {
        self.info().dirty
    }

    /// Flag unsaved changes
    fn mark_dirty(&mut self) {
        self.info_mut().dirty = true;
    }

    /// Current load state
    fn state(&self) -> LoadState {
        self.info().state
    }

    /// Set the load state
    fn set_state(&mut self, state: LoadState) {
        self.info_mut().state = state;
    }

    /// Build derived state when the asset first enters the runtime
    ///
    /// Runs on the lifecycle queue consumer, never on the enqueuing thread.
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Rebuild derived state from declarative fields
    ///
    /// Must be idempotent: refreshing twice with the same declarative state
    /// produces the same derived state.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release derived state
    ///
    /// Runs on the lifecycle queue consumer after the last handle is gone.
    fn teardown(&mut self) {}
}

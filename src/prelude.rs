//! Convenient re-exports of commonly used types.
//!
//! The prelude can be imported with:
//! ```
//! use asset_vault::prelude::*;
//! ```

pub use crate::asset::{Asset, AssetInfo, AssetKind, LoadState};
pub use crate::database::AssetDatabase;
pub use crate::error::{Result, VaultError};
pub use crate::handle::Handle;
pub use crate::id::AssetId;
pub use crate::importer::{ImporterConfig, ImporterRegistry};
pub use crate::kinds::{Folder, Material, MaterialParams, Mesh, Model, Pipeline, Prefab, Texture};
pub use crate::lifecycle::{lifecycle_channel, LifecycleAction, LifecycleConsumer, LifecycleSender};
pub use crate::meta::AssetMeta;
pub use crate::repository::{AssetRegistry, Repository, Stored};

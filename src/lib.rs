// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Asset Vault - content-addressed asset database with deferred lifecycle
//!
//! Stable 128-bit identity, sidecar meta files, per-kind repositories, and a
//! single-consumer lifecycle queue that keeps resource teardown on the thread
//! that owns the device.

pub mod asset;
pub mod database;
pub mod document;
pub mod error;
pub mod handle;
pub mod id;
pub mod importer;
pub mod kinds;
pub mod lifecycle;
pub mod meta;
pub mod prelude;
pub mod repository;

pub use asset::*;
pub use database::*;
pub use error::*;
pub use handle::*;
pub use id::*;
pub use importer::*;
pub use kinds::*;
pub use lifecycle::*;
pub use meta::*;
pub use repository::*;

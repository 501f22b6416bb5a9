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

//! Error types

use std::fmt;

/// Asset vault error type
#[derive(Debug, Clone)]
pub enum VaultError {
    /// No metadata record for the given path or id
    MetaNotFound(String),

    /// Metadata exists but the asset is not loaded, or its content file is gone
    AssetNotFound(String),

    /// A content or meta document failed schema validation
    MalformedDocument(String),

    /// Attempted import of a meta file, or a file with no matching importer
    ImportRejected(String),

    /// A deferred init/update failed to build its backing resource
    GpuResourceFailure(String),

    /// IO error (file operations, etc.)
    IoError(String),

    /// Serialization error
    SerializationError(String),

    /// Deserialization error
    DeserializationError(String),
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultError::MetaNotFound(msg) => write!(f, "Meta not found: {msg}"),
            VaultError::AssetNotFound(msg) => write!(f, "Asset not found: {msg}"),
            VaultError::MalformedDocument(msg) => write!(f, "Malformed document: {msg}"),
            VaultError::ImportRejected(msg) => write!(f, "Import rejected: {msg}"),
            VaultError::GpuResourceFailure(msg) => write!(f, "Gpu resource failure: {msg}"),
            VaultError::IoError(msg) => write!(f, "IO error: {msg}"),
            VaultError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            VaultError::DeserializationError(msg) => write!(f, "Deserialization error: {msg}"),
        }
    }
}

impl std::error::Error for VaultError {}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::SerializationError(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, VaultError>;

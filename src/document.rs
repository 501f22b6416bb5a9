//! Structured document boundary
//!
//! Thin layer between in-memory objects and the JSON files on disk. Failure
//! to write is a hard IO error; a file that does not parse into the expected
//! shape is a malformed document and leaves the caller's state untouched.

use crate::error::{Result, VaultError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Serialize a value as pretty JSON at `path`
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| VaultError::SerializationError(e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| VaultError::IoError(format!("{}: {e}", path.display())))
}

/// Read and parse a JSON document at `path`
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| VaultError::IoError(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| VaultError::MalformedDocument(format!("{}: {e}", path.display())))
}

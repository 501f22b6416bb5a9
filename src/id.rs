//! Stable 128-bit asset identifiers
//!
//! An [`AssetId`] names an asset independently of its file path. Ids are
//! minted once at import/creation time, persisted in the sidecar meta file,
//! and never reused.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Content-stable 128-bit identifier
///
/// The all-zero value is the canonical "empty" id. Text form is the usual
/// hyphenated 8-4-4-4-12 lowercase hex layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId {
    high: u64,
    low: u64,
}

impl AssetId {
    /// The empty (unset) identifier
    pub const EMPTY: Self = Self { high: 0, low: 0 };

    /// Create an id from its two 64-bit halves
    pub const fn from_parts(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Mint a fresh id from a uniform 128-bit random source
    ///
    /// Collisions are treated as negligible and not checked.
    pub fn generate() -> Self {
        let bits = uuid::Uuid::new_v4().as_u128();
        Self {
            high: (bits >> 64) as u64,
            low: bits as u64,
        }
    }

    /// Parse the hyphenated hex form
    ///
    /// Permissive by policy: hyphens are stripped, and anything that is not
    /// exactly 32 hex characters afterwards yields [`AssetId::EMPTY`] rather
    /// than an error.
    pub fn parse(text: &str) -> Self {
        let hex: String = text.chars().filter(|c| *c != '-').collect();
        if hex.len() != 32 || !hex.is_ascii() {
            return Self::EMPTY;
        }
        match (
            u64::from_str_radix(&hex[..16], 16),
            u64::from_str_radix(&hex[16..], 16),
        ) {
            (Ok(high), Ok(low)) => Self { high, low },
            _ => Self::EMPTY,
        }
    }

    /// Check for the empty id
    pub const fn is_empty(&self) -> bool {
        self.high == 0 && self.low == 0
    }

    /// Upper 64 bits
    pub const fn high(&self) -> u64 {
        self.high
    }

    /// Lower 64 bits
    pub const fn low(&self) -> u64 {
        self.low
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = format!("{:016x}{:016x}", self.high, self.low);
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &hex[..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..]
        )
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}

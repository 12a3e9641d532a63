//! Object metadata snapshot and prefix derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delimiter separating a deployment prefix from the rest of the key.
pub const DEFAULT_DELIMITER: char = '/';

/// A single stored object as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Full storage key, e.g. `deployhash112/css/font.css`.
    pub key: String,
    /// Last modification timestamp.
    pub last_modified: DateTime<Utc>,
    /// Object size in bytes. Only used for reporting.
    #[serde(default)]
    pub size_bytes: u64,
}

impl ObjectRecord {
    pub fn new(key: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            last_modified,
            size_bytes: 0,
        }
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Deployment prefix of this object's key.
    pub fn prefix(&self, delimiter: char) -> &str {
        prefix_id(&self.key, delimiter)
    }
}

/// Returns the part of `key` before the first `delimiter`.
///
/// Keys without the delimiter are their own prefix.
pub fn prefix_id(key: &str, delimiter: char) -> &str {
    key.split_once(delimiter).map_or(key, |(prefix, _)| prefix)
}

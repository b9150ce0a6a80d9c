//! Cache record types.

use serde::{Deserialize, Serialize};

/// One directory's previously computed load order.
///
/// `files` is the fully flattened, type-ordered list produced by a single
/// walk; type buckets are not retained across a cache round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Absolute path of the walked directory.
    pub directory: String,

    /// Ordered file paths to load for that directory.
    pub files: Vec<String>,
}

impl CacheRecord {
    /// Creates a new cache record.
    pub fn new(directory: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            directory: directory.into(),
            files,
        }
    }
}

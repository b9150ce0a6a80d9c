//! # conscript_cache
//!
//! Persistence layer for Conscript's discovered-file lists.
//!
//! A [`CacheStore`] owns one collection of [`CacheRecord`]s (at most one
//! record per walked directory), kept in memory and, when enabled, mirrored
//! to a human-readable JSON file. Records are only ever invalidated by an
//! explicit clear, never automatically.

pub mod record;
pub mod store;

pub use record::CacheRecord;
pub use store::CacheStore;

use thiserror::Error;

/// Errors raised by the cache layer.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error reading or writing the cache file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted cache content could not be parsed.
    #[error("Corrupted cache: {0}")]
    Corrupted(String),

    /// The configured cache path is unusable.
    #[error("Invalid cache path: {0}")]
    InvalidPath(String),

    /// The record collection could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CacheError {
    /// Creates a corrupted-cache error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }

    /// Creates an invalid-path error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }
}

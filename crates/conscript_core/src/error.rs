//! Engine error types.

use thiserror::Error;

/// Errors that can occur while discovering or loading a directory.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The directory argument was empty or otherwise unusable.
    #[error("Invalid directory value of '{0}'")]
    InvalidDirectory(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failure while listing, stating, or reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache error.
    #[error("Cache error: {0}")]
    Cache(#[from] conscript_cache::CacheError),

    /// Plugin error.
    #[error("Plugin error: {0}")]
    Plugin(#[from] conscript_plugin::PluginError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Creates an invalid-directory error.
    pub fn invalid_directory(directory: impl Into<String>) -> Self {
        Self::InvalidDirectory(directory.into())
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

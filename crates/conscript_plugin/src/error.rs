//! Plugin error types.

use thiserror::Error;

/// Errors raised while resolving or invoking a loadable unit.
#[derive(Debug, Error)]
pub enum PluginError {
    /// No loadable is registered for a discovered path.
    #[error("No loadable registered for '{0}'")]
    NotFound(String),

    /// The unit's entry function failed.
    #[error("Unit failed: {0}")]
    Invoke(String),
}

impl PluginError {
    /// Creates a not-found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Creates an invocation error.
    pub fn invoke(message: impl Into<String>) -> Self {
        Self::Invoke(message.into())
    }
}

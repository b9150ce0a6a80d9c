//! Sequential unit invocation.
//!
//! The list order produced by classification (or restored from cache) is
//! the binding load order; this module only consumes it, one unit at a
//! time. A failing unit is caught and recorded, never aborting the batch.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use conscript_plugin::{InvokeContext, PluginError, PluginRegistry};

/// Result of one batch invocation.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Errors caught while loading or invoking individual units.
    pub errors: Vec<PluginError>,

    /// Paths that were attempted, in load order.
    pub loaded: Vec<String>,

    /// Per-unit return values, positionally aligned with `loaded`. A
    /// failed unit contributes `Value::Null`.
    pub returns: Vec<Value>,
}

/// Invokes every unit in `list`, in order.
///
/// Empty entries and paths missing from disk are skipped with a log.
/// Each surviving path resolves through the registry and runs with the
/// host handle, the resolved configuration, and the caller's extras.
pub fn invoke(
    registry: &PluginRegistry,
    host: &Value,
    config: &Value,
    list: &[String],
    extras: &[Value],
) -> LoadOutcome {
    debug!("Invoking {} file(s)", list.len());

    let mut outcome = LoadOutcome::default();

    for entry in list {
        if entry.is_empty() {
            debug!("Can't load a file with an empty path");
            continue;
        }

        let path = normalize(entry);
        if !path.exists() {
            debug!("Can't load a file that doesn't exist: {}", path.display());
            continue;
        }

        debug!("Loading: {}", path.display());

        let ctx = InvokeContext {
            host,
            config,
            extras,
        };
        let result = registry
            .resolve(&path)
            .ok_or_else(|| PluginError::not_found(path.to_string_lossy()))
            .and_then(|loadable| loadable.invoke(&ctx));

        outcome.loaded.push(path.to_string_lossy().into_owned());
        match result {
            Ok(value) => outcome.returns.push(value),
            Err(e) => {
                warn!("{} could not be loaded: {}", path.display(), e);
                outcome.errors.push(e);
                outcome.returns.push(Value::Null);
            }
        }
    }

    outcome
}

/// Paths are loaded absolute; a missing leading separator is prefixed.
fn normalize(entry: &str) -> PathBuf {
    let path = Path::new(entry);
    if path.has_root() {
        path.to_path_buf()
    } else {
        PathBuf::from(format!("{}{}", std::path::MAIN_SEPARATOR, entry))
    }
}

//! Registry mapping discovered paths to loadable units.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::Loadable;

/// Host-owned registry of loadable units.
///
/// Keys are either absolute paths or bare file names. Resolution tries the
/// full path first, then falls back to the file's base name, so hosts can
/// register units without knowing the discovery root.
#[derive(Default, Clone)]
pub struct PluginRegistry {
    entries: HashMap<String, Arc<dyn Loadable>>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a loadable under a path or file-name key.
    ///
    /// Registering the same key twice replaces the earlier entry.
    pub fn register(&mut self, key: impl Into<String>, loadable: Arc<dyn Loadable>) {
        self.entries.insert(key.into(), loadable);
    }

    /// Resolves a discovered path to its registered loadable.
    pub fn resolve(&self, path: &Path) -> Option<Arc<dyn Loadable>> {
        let full = path.to_string_lossy();
        if let Some(loadable) = self.entries.get(full.as_ref()) {
            return Some(Arc::clone(loadable));
        }

        let name = path.file_name()?.to_string_lossy();
        self.entries.get(name.as_ref()).map(Arc::clone)
    }

    /// Returns the number of registered units.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

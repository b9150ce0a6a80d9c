//! Cache store: the persisted collection of directory records.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::{CacheError, CacheRecord};

/// Owns the in-memory record collection and its on-disk mirror.
///
/// The store is the sole owner of the cache file; walkers and classifiers
/// only ever hand it freshly built lists. Overlapping load/save calls
/// against one cache path are the caller's responsibility to avoid.
#[derive(Debug)]
pub struct CacheStore {
    /// Cache file location, when the configured path string is usable.
    path: Option<PathBuf>,
    /// Whether persistence is enabled.
    enabled: bool,
    /// Deferred complaint about an unusable configured path. Surfaced on
    /// save, not load.
    path_error: Option<String>,
    /// In-memory record collection.
    records: Vec<CacheRecord>,
}

impl CacheStore {
    /// Creates a store from the resolved cache settings.
    ///
    /// An unusable path string (empty, `"undefined"`, `"null"`) force-
    /// disables persistence; the error is reported by the next `save`.
    pub fn new(enabled: bool, path: &str) -> Self {
        let usable = is_path_usable(path);
        let path_error = if enabled && !usable {
            Some(format!("could not enable cache for path '{path}'"))
        } else {
            None
        };

        Self {
            path: usable.then(|| PathBuf::from(path)),
            enabled: enabled && usable,
            path_error,
            records: Vec::new(),
        }
    }

    /// Returns whether persistence is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the current in-memory records.
    pub fn records(&self) -> &[CacheRecord] {
        &self.records
    }

    /// Finds the record for a directory, if one exists.
    pub fn find(&self, directory: &str) -> Option<&CacheRecord> {
        self.records
            .iter()
            .find(|record| record.directory == directory)
    }

    /// Loads the record collection.
    ///
    /// When persistence is disabled or no cache file exists yet, the
    /// current in-memory records stand and `false` is returned. A cache
    /// file that cannot be parsed fails the load.
    pub async fn load(&mut self) -> Result<bool, CacheError> {
        if !self.enabled {
            trace!("Cache only found in memory ({} records)", self.records.len());
            return Ok(false);
        }

        let Some(path) = self.path.clone() else {
            return Ok(false);
        };

        if !tokio::fs::try_exists(&path).await? {
            trace!("Cache not yet saved to disk, loading from memory");
            return Ok(false);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let records: Vec<CacheRecord> =
            serde_json::from_str(&content).map_err(|e| CacheError::corrupted(e.to_string()))?;

        debug!("Loaded {} cache records from {}", records.len(), path.display());
        self.records = records;

        Ok(true)
    }

    /// Replaces the record collection, persisting it when enabled.
    ///
    /// Memory is always updated. The write replaces the whole file; a
    /// temp-file rename keeps partial writes invisible.
    pub async fn save(&mut self, records: Vec<CacheRecord>) -> Result<(), CacheError> {
        self.records = records;

        if let Some(message) = &self.path_error {
            return Err(CacheError::invalid_path(message.clone()));
        }

        if !self.enabled {
            trace!("Cache updated in memory ({} records)", self.records.len());
            return Ok(());
        }

        let path = self
            .path
            .as_ref()
            .ok_or_else(|| CacheError::invalid_path("no cache path configured"))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.records)
            .map_err(|e| CacheError::Serialization(e.to_string()))?;

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(
            "Saved {} cache records to {}",
            self.records.len(),
            path.display()
        );

        Ok(())
    }

    /// Replaces one directory's files, appending a new record when the
    /// directory has none, then persists the collection.
    pub async fn update_record(
        &mut self,
        directory: &str,
        files: Vec<String>,
    ) -> Result<(), CacheError> {
        trace!("Update record for {} ({} files)", directory, files.len());

        let mut records = self.records.clone();
        match records
            .iter_mut()
            .find(|record| record.directory == directory)
        {
            Some(record) => record.files = files,
            None => records.push(CacheRecord::new(directory, files)),
        }

        self.save(records).await
    }

    /// Rebuilds the single load-ready sequence: every record's files in
    /// collection order, stored order within a record.
    pub fn flatten(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|record| record.files.iter().cloned())
            .collect()
    }

    /// Clears the in-memory records and deletes the cache file if one is
    /// configured and present. Idempotent.
    pub async fn clear(&mut self) -> Result<(), CacheError> {
        self.records.clear();

        if let Some(path) = &self.path {
            if tokio::fs::try_exists(path).await? {
                tokio::fs::remove_file(path).await?;
                debug!("Cache cleared and '{}' deleted", path.display());
                return Ok(());
            }
        }

        debug!("Cache cleared");
        Ok(())
    }

    /// Synchronous variant of [`CacheStore::clear`].
    pub fn clear_sync(&mut self) -> Result<(), CacheError> {
        self.records.clear();

        if let Some(path) = &self.path {
            if path.exists() {
                std::fs::remove_file(path)?;
                debug!("Cache cleared and '{}' deleted", path.display());
                return Ok(());
            }
        }

        debug!("Cache cleared");
        Ok(())
    }

    /// Returns the configured cache file path, if usable.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Rejects path strings that produce a cache in the wrong place rather
/// than a visible failure.
fn is_path_usable(path: &str) -> bool {
    !(path.is_empty() || path == "undefined" || path == "null")
}

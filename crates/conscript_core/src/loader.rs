//! Load orchestration.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use conscript_cache::CacheStore;
use conscript_plugin::PluginRegistry;

use crate::classifier::TypeClassifier;
use crate::config::LoaderConfig;
use crate::invoker::{self, LoadOutcome};
use crate::walker::{self, FileAction};
use crate::EngineError;

/// Types loaded, in priority order, when a call supplies none.
pub const DEFAULT_TYPES: [&str; 5] = ["static", "model", "controller", "error", "tracker"];

/// The discovery-and-load engine.
///
/// A `Loader` threads one resolved configuration, one cache store, and one
/// plugin registry through every call; there is no process-wide state.
/// Mutating entry points take `&mut self`, so overlapping loads against
/// the same cache cannot be expressed.
pub struct Loader {
    config: LoaderConfig,
    cache: CacheStore,
    registry: PluginRegistry,
    host: Value,
}

impl Loader {
    /// Creates a loader from a resolved configuration, a registry of
    /// loadable units, and an opaque host handle forwarded to every unit.
    pub fn new(config: LoaderConfig, registry: PluginRegistry, host: Value) -> Self {
        let cache = CacheStore::new(config.cache.enable, &config.cache.path);
        Self {
            config,
            cache,
            registry,
            host,
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Returns the plugin registry.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Returns the plugin registry for late registration.
    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// Replaces the configuration.
    ///
    /// Disabling a previously enabled cache clears it, memory and disk.
    /// Changing cache settings resets the store; anything else leaves
    /// cached records in place.
    pub fn set_config(&mut self, config: LoaderConfig) -> Result<(), EngineError> {
        if self.config.cache.enable && !config.cache.enable {
            self.cache.clear_sync()?;
        }

        if self.config.cache.enable != config.cache.enable
            || self.config.cache.path != config.cache.path
        {
            self.cache = CacheStore::new(config.cache.enable, &config.cache.path);
        }

        self.config = config;
        Ok(())
    }

    /// Discovers and loads every typed file under `directory`.
    ///
    /// The cache is consulted first; on a hit the stored list is used
    /// verbatim, with no re-validation. On a miss the tree is walked and
    /// classified, the cache record updated, and the fresh list loaded.
    /// `types` defaults to [`DEFAULT_TYPES`]; `extras` are forwarded to
    /// each unit after the host handle and configuration.
    pub async fn load_directory(
        &mut self,
        directory: &str,
        types: Option<&[&str]>,
        extras: &[Value],
    ) -> Result<LoadOutcome, EngineError> {
        if directory.is_empty() {
            return Err(EngineError::invalid_directory(directory));
        }

        let directory = directory
            .strip_suffix(std::path::MAIN_SEPARATOR)
            .unwrap_or(directory)
            .to_string();

        let types: Vec<String> = match types {
            Some(types) => types.iter().map(|ty| ty.to_string()).collect(),
            None => DEFAULT_TYPES.iter().map(|ty| ty.to_string()).collect(),
        };

        self.cache.load().await?;

        if let Some(record) = self.cache.find(&directory) {
            debug!(
                "Cache hit for {} ({} files)",
                directory,
                record.files.len()
            );
            let files = record.files.clone();
            return Ok(self.invoke_files(&files, extras));
        }

        let files = self.build_directory_list(&directory, &types).await?;
        self.cache.update_record(&directory, files.clone()).await?;

        Ok(self.invoke_files(&files, extras))
    }

    /// Invokes an explicit ordered file list with the loader's host handle
    /// and configuration.
    pub fn invoke_files(&self, list: &[String], extras: &[Value]) -> LoadOutcome {
        let config = serde_json::to_value(&self.config).unwrap_or(Value::Null);
        invoker::invoke(&self.registry, &self.host, &config, list, extras)
    }

    /// Returns the cached load order across all known directories.
    pub fn cached_files(&self) -> Vec<String> {
        self.cache.flatten()
    }

    /// Clears the cache, memory and disk. Idempotent.
    pub async fn clear_cache(&mut self) -> Result<(), EngineError> {
        self.cache.clear().await.map_err(Into::into)
    }

    /// Synchronous variant of [`Loader::clear_cache`].
    pub fn clear_cache_sync(&mut self) -> Result<(), EngineError> {
        self.cache.clear_sync().map_err(Into::into)
    }

    /// Walks the directory and classifies every visited file, producing
    /// the flattened type-ordered list.
    async fn build_directory_list(
        &self,
        directory: &str,
        types: &[String],
    ) -> Result<Vec<String>, EngineError> {
        debug!(
            "Building directory list for {} with types [{}]",
            directory,
            types.join(", ")
        );

        let classifier = Arc::new(TypeClassifier::new(types, &self.config.identification));

        let action: FileAction = {
            let classifier = Arc::clone(&classifier);
            Arc::new(move |path| {
                let classifier = Arc::clone(&classifier);
                Box::pin(async move { classifier.classify(path).await.map(|_| ()) })
            })
        };

        walker::walk(directory, action).await?;

        Ok(classifier.take_list())
    }
}

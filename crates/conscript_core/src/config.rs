//! Loader configuration.
//!
//! The core consumes resolved values only; merging and overriding partial
//! configurations is the host application's concern.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Configuration for one `Loader`.
///
/// Resolved once per load call; values never change mid-walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Caching of discovered file lists.
    #[serde(default)]
    pub cache: CacheSettings,

    /// How discovered files are matched to types.
    #[serde(default)]
    pub identification: Identification,

    /// When true, additional logs are displayed.
    #[serde(default)]
    pub debug: bool,

    /// When true, per-file tracing logs are displayed.
    #[serde(default)]
    pub trace: bool,

    /// When true, error logs are displayed.
    #[serde(default)]
    pub error: bool,
}

/// Cache-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// When true, discovered file lists are stored to disk so later runs
    /// skip walking entirely.
    #[serde(default)]
    pub enable: bool,

    /// Path to the file used to store the cache.
    #[serde(default = "default_cache_path")]
    pub path: String,
}

fn default_cache_path() -> String {
    "data/conscript-cache.json".to_string()
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enable: false,
            path: default_cache_path(),
        }
    }
}

/// How to decide which type a file belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identification {
    /// Matching mode.
    #[serde(rename = "type", default)]
    pub mode: IdentificationMode,

    /// Marker used to identify the files.
    #[serde(default = "default_identifier")]
    pub identifier: String,
}

fn default_identifier() -> String {
    "~>".to_string()
}

impl Default for Identification {
    fn default() -> Self {
        Self {
            mode: IdentificationMode::default(),
            identifier: default_identifier(),
        }
    }
}

/// Available identification modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdentificationMode {
    /// Search the file's text for `<identifier> <type>`.
    #[default]
    #[serde(rename = "string")]
    Content,

    /// Search the file's base name for `<identifier><type>`.
    #[serde(rename = "filename")]
    Filename,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache: CacheSettings::default(),
            identification: Identification::default(),
            debug: false,
            trace: false,
            error: false,
        }
    }
}

impl LoaderConfig {
    /// Loads configuration from a JSON or JSONC file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::config(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parses configuration from a JSON or JSONC string.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let value = jsonc_parser::parse_to_serde_value(json, &Default::default())
            .map_err(|e| EngineError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        serde_json::from_value(value)
            .map_err(|e| EngineError::config(format!("Invalid config: {}", e)))
    }
}

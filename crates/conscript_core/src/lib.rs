//! # conscript_core
//!
//! Core discovery-and-load engine for Conscript.
//!
//! This crate provides:
//! - The main `Loader` orchestrator
//! - Configuration loading
//! - Concurrent directory walking and per-file type classification
//! - Ordered, failure-contained unit invocation
//!
//! ## Example
//!
//! ```rust,ignore
//! use conscript_core::{Loader, LoaderConfig, PluginRegistry};
//!
//! let mut loader = Loader::new(LoaderConfig::default(), registry, serde_json::json!({}));
//! let outcome = loader
//!     .load_directory("/srv/app", Some(&["model", "controller"]), &[])
//!     .await?;
//! for path in &outcome.loaded {
//!     println!("loaded {path}");
//! }
//! ```

mod classifier;
mod config;
mod error;
mod invoker;
mod loader;
pub mod logging;
pub mod walker;

pub use classifier::TypeClassifier;
pub use config::{CacheSettings, Identification, IdentificationMode, LoaderConfig};
pub use error::EngineError;
pub use invoker::LoadOutcome;
pub use loader::{DEFAULT_TYPES, Loader};

pub use conscript_plugin::{InvokeContext, Loadable, PluginError, PluginRegistry};

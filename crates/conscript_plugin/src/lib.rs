//! Plugin contract for units discovered by Conscript.
//!
//! A discovered file never executes on its own. Each path resolves through
//! a [`PluginRegistry`] to a [`Loadable`] supplied by the host application;
//! the host's module system owns registration, the core only resolves and
//! invokes. Parameters cross the boundary as JSON values.
//!
//! # Example
//!
//! ```rust
//! use conscript_plugin::{InvokeContext, PluginError, PluginRegistry};
//! use serde_json::{Value, json};
//! use std::sync::Arc;
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(
//!     "users_model.js",
//!     Arc::new(|ctx: &InvokeContext<'_>| -> Result<Value, PluginError> {
//!         Ok(json!({ "host": ctx.host.clone() }))
//!     }),
//! );
//!
//! let loadable = registry.resolve("/srv/app/users/users_model.js".as_ref()).unwrap();
//! ```

mod error;
mod registry;

pub use error::PluginError;
pub use registry::PluginRegistry;

use serde_json::Value;

/// Fixed leading parameter set passed to every loaded unit, followed by the
/// caller-forwarded arguments in the caller's order.
pub struct InvokeContext<'a> {
    /// Opaque handle to the host application.
    pub host: &'a Value,

    /// Configuration resolved for the load call.
    pub config: &'a Value,

    /// Extra arguments forwarded by the caller.
    pub extras: &'a [Value],
}

/// A unit that can be loaded and invoked by the engine.
///
/// The return value, if any, is forwarded to the caller of the load.
pub trait Loadable: Send + Sync {
    /// Runs the unit's entry function.
    fn invoke(&self, ctx: &InvokeContext<'_>) -> Result<Value, PluginError>;
}

impl<F> Loadable for F
where
    F: Fn(&InvokeContext<'_>) -> Result<Value, PluginError> + Send + Sync,
{
    fn invoke(&self, ctx: &InvokeContext<'_>) -> Result<Value, PluginError> {
        self(ctx)
    }
}

//! Execution boundary for generated code.
//!
//! Generated source comes straight from a remote model. Loading it is the trust
//! boundary of this crate, so it sits behind [`ScriptRuntime`]: the runtime decides
//! what the code may touch.

use serde_json::Value;
use std::sync::Arc;

use crate::error::Result;

/// A loaded, invokable function.
pub trait Implementation: Send + Sync {
    fn call(&self, args: &[Value]) -> Result<Value>;
}

/// Loads generated source text as an [`Implementation`].
pub trait ScriptRuntime: Send + Sync {
    /// Human readable language name, used in prompts.
    fn language(&self) -> &str;

    /// File extension of persisted artifacts.
    fn extension(&self) -> &str;

    /// How the generated source must expose its function.
    fn export_directive(&self) -> &str;

    fn load(&self, source: &str) -> Result<Arc<dyn Implementation>>;
}

impl<F> Implementation for F
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync,
{
    fn call(&self, args: &[Value]) -> Result<Value> {
        self(args)
    }
}

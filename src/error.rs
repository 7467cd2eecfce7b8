use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

#[cfg(feature = "llm")]
use crate::llm::error::LLMError;

/// Errors produced while generating, loading or calling a generated function.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid arg: {}, expected type: {}", render_arg(.value), compact(.schema))]
    InvalidArgument { value: Value, schema: Value },

    #[error("Expected {expected} argument(s), got {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("Invalid schema: {0}")]
    Schema(String),

    #[error("Invalid signature: {0}")]
    Signature(String),

    #[error("Failed to persist artifact {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read artifact {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load generated code: {0}")]
    Load(String),

    #[error("Generated function failed: {0}")]
    Execution(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[cfg(feature = "llm")]
    #[error(transparent)]
    Llm(#[from] LLMError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Strings render bare, everything else as compact JSON.
pub(crate) fn render_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => compact(other),
    }
}

pub(crate) fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

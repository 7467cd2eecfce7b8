//! # llmfn
//!
//! Functions written by a language model, generated once and cached on disk.
//!
//! Describe a function by an identifier, one JSON Schema per positional argument and
//! one for its result, then give a natural-language objective. The first time an
//! identifier is seen, a chat-completion endpoint is asked for an implementation and
//! the reply is written verbatim to `./generated/<id>.<ext>`. Every later call loads
//! that artifact instead; its existence is the only cache key.
//!
//! The returned [`GeneratedFn`] checks each argument against its schema before
//! running the code, and logs a warning when the result does not match the output
//! schema.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llmfn::prelude::*;
//! use serde_json::json;
//!
//! # async fn demo() -> llmfn::Result<()> {
//! let factory = Factory::new(
//!     Configuration::default().merged(ConfigurationPatch::new().model("qwen2.5-coder")),
//! );
//!
//! let echo = factory
//!     .llmfn(signature!("echo: string -> string"))
//!     .instruct("echo the input back as the output")
//!     .await?;
//!
//! assert_eq!(echo.call(&[json!("test")])?, json!("test"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - Core: [`Signature`], [`Instruction`], [`ArtifactStore`], [`Factory`], [`LlmFn`], [`GeneratedFn`]
//! - Seams: [`Completion`], [`ScriptRuntime`] / [`Implementation`], [`SchemaCompiler`] / [`Validator`]
//! - [`llm`] (feature `llm`): the HTTP completion client
//! - [`RhaiRuntime`] (feature `rhai`): Rhai as the generated language

// ============================================================================
// Core Module
// ============================================================================

mod core;
mod error;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use crate::core::completion::Completion;
pub use crate::core::generated::GeneratedFn;
pub use crate::core::llmfn::{Factory, FactoryBuilder, LlmFn};
pub use crate::core::prompt::{build_prompt, Instruction};
pub use crate::core::runtime::{Implementation, ScriptRuntime};
pub use crate::core::signature::Signature;
pub use crate::core::store::{ArtifactStore, DEFAULT_ROOT};
pub use crate::core::validation::{JsonSchemaCompiler, SchemaCompiler, Validator};

#[cfg(feature = "rhai")]
pub use crate::core::rhai_runtime::{RhaiRuntime, ENTRYPOINT};

// ============================================================================
// LLM Feature
// ============================================================================

#[cfg(feature = "llm")]
pub mod llm;

#[cfg(feature = "llm")]
pub use llm::{Client, Configuration, ConfigurationPatch, LLMError};

/// Everything needed to define and call generated functions.
///
/// # Example
/// ```rust
/// use llmfn::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        instruction, signature, ArtifactStore, Completion, Factory, GeneratedFn, Implementation,
        Instruction, LlmFn, ScriptRuntime, Signature,
    };

    #[cfg(feature = "llm")]
    pub use super::{Client, Configuration, ConfigurationPatch};

    #[cfg(feature = "rhai")]
    pub use super::RhaiRuntime;
}

// ============================================================================
// Re-export commonly used external types for convenience
// ============================================================================

pub use serde_json::Value as JsonValue;

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");

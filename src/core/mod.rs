pub mod completion;
pub mod generated;
pub mod llmfn;
pub mod prompt;
pub mod runtime;
pub mod signature;
pub mod store;
pub mod validation;

#[cfg(feature = "rhai")]
pub mod rhai_runtime;

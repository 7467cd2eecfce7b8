//! HTTP completion client.
//!
//! Talks to any OpenAI-compatible `/v1/chat/completions` endpoint (Ollama, vLLM,
//! llama.cpp server, hosted APIs). The client owns its [`Configuration`]; there is
//! no process-wide state.

pub mod chat;
pub mod config;
pub mod error;

use async_trait::async_trait;

pub use chat::{ChatCompletionBuilder, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use config::{Configuration, ConfigurationPatch};
pub use error::LLMError;

use crate::core::completion::Completion;

/// Default system message sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are an awesome Rhai developer! Please respond in plain generated code and without any Markdown codeblock!";

/// LLM client wrapper around reqwest::Client
#[derive(Clone, Debug)]
pub struct Client {
    /// The underlying HTTP client
    pub(crate) client: reqwest::Client,
    pub(crate) config: Configuration,
    pub(crate) system_prompt: String,
}

impl Client {
    /// Create a client for the given configuration
    pub fn new(config: Configuration) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing reqwest client (connection pool, proxies, TLS)
    pub fn with_http_client(client: reqwest::Client, config: Configuration) -> Self {
        Client {
            client,
            config,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }

    /// Replace the system message, e.g. when targeting a runtime other than Rhai
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Merge `patch` into this client's configuration
    pub fn configure(&mut self, patch: ConfigurationPatch) {
        self.config.configure(patch);
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

#[async_trait]
impl Completion for Client {
    async fn generate(&self, prompt: &str) -> crate::Result<String> {
        log::debug!(
            "Requesting completion from {} with model {}",
            self.config.completions_url(),
            self.config.model
        );
        let code = self.chat().system(self.system_prompt.as_str()).user(prompt).await?;
        Ok(code)
    }
}

// ============================================================================
// Deref to reqwest::Client for direct HTTP usage
// ============================================================================

impl std::ops::Deref for Client {
    type Target = reqwest::Client;
    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl std::ops::DerefMut for Client {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.client
    }
}

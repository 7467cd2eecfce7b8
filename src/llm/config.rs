//! Endpoint configuration for the completion client.

use serde::{Deserialize, Serialize};

/// Connection settings for an OpenAI-compatible chat-completion endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Base URL (default: http://localhost:11434)
    pub base_url: String,
    /// Bearer token; `None` or empty omits the `Authorization` header
    pub api_key: Option<String>,
    /// Model to request (default: llama3:70b)
    pub model: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            api_key: Some("ollama".to_string()),
            model: "llama3:70b".to_string(),
        }
    }
}

/// A partial configuration. Present fields override, absent fields are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigurationPatch {
    #[serde(rename = "baseURL", alias = "baseUrl")]
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl ConfigurationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Configuration {
    /// Shallow-merge `patch` into this configuration.
    pub fn configure(&mut self, patch: ConfigurationPatch) {
        if let Some(base_url) = patch.base_url {
            self.base_url = base_url;
        }
        if let Some(api_key) = patch.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
    }

    /// Consuming variant of [`configure`](Self::configure).
    pub fn merged(mut self, patch: ConfigurationPatch) -> Self {
        self.configure(patch);
        self
    }

    /// The bearer token to send, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

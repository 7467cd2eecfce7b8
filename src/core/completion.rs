use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can turn a prompt into generated source text.
///
/// [`Client`](crate::llm::Client) is the HTTP implementation; tests and embedders
/// can substitute their own.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn generate(&self, prompt: &str) -> crate::Result<String>;
}

#[async_trait]
impl<T: Completion + ?Sized> Completion for Arc<T> {
    async fn generate(&self, prompt: &str) -> crate::Result<String> {
        (**self).generate(prompt).await
    }
}

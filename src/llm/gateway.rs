use crate::error::Result;
use crate::llm::models::{GenerateRequest, ModelEntry};
use async_trait::async_trait;

/// Abstract interface for the hosted generative model provider
#[async_trait]
pub trait GenerativeGateway: Send + Sync {
    /// List the models available to the configured credential
    async fn list_models(&self) -> Result<Vec<ModelEntry>>;

    /// Generate content from a prompt and optional image, returning the reply text
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<String>;
}

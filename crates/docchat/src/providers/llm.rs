//! LLM provider trait for chat generation

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ChatTurn;

/// Trait for chat-style answer generation
///
/// Implementations:
/// - `HttpLlm`: JSON generation microservice
/// - `OllamaLlm`: Ollama `/api/chat`
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a reply to `messages` using at most `max_tokens` output tokens
    async fn generate(&self, messages: &[ChatTurn], max_tokens: u32) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

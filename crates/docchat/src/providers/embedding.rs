//! Embedding provider trait for turning text into vectors

use async_trait::async_trait;

use crate::error::{Error, Result, Service};

/// Trait for generating text embeddings
///
/// Batches are all-or-nothing and positional: vector `i` belongs to text `i`.
///
/// Implementations:
/// - `HttpEmbedder`: JSON embedding microservice
/// - `OllamaEmbedder`: Ollama `/api/embed`
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        match vectors.pop() {
            Some(vector) if vectors.is_empty() => Ok(vector),
            _ => Err(Error::upstream(
                Service::Embedding,
                "expected exactly one vector for a single text",
            )),
        }
    }

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Fail unless the provider returned one vector per input
pub(crate) fn ensure_batch_len(expected: usize, vectors: &[Vec<f32>]) -> Result<()> {
    if vectors.len() != expected {
        return Err(Error::upstream(
            Service::Embedding,
            format!("requested {} embeddings, received {}", expected, vectors.len()),
        ));
    }
    Ok(())
}

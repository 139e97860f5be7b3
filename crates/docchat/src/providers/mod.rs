//! Provider abstractions for embeddings, generation and vector storage
//!
//! Each upstream service sits behind a trait so the orchestrator can switch
//! between the JSON microservices, Ollama, Chroma and the in-memory store.

pub mod chroma;
pub mod embedding;
pub mod http;
pub mod llm;
pub mod memory;
pub mod ollama;
pub mod vector_store;

use std::sync::Arc;

use crate::config::{EmbeddingConfig, LlmConfig, ModelBackend, VectorBackend, VectorDbConfig};
use crate::error::Result;

pub use chroma::ChromaVectorStore;
pub use embedding::EmbeddingProvider;
pub use http::{HttpEmbedder, HttpLlm};
pub use llm::LlmProvider;
pub use memory::InMemoryVectorStore;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use vector_store::VectorStoreProvider;

/// Build the configured embedding provider
pub fn embedding_from_config(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(match config.backend {
        ModelBackend::Http => Arc::new(HttpEmbedder::new(config)?),
        ModelBackend::Ollama => Arc::new(OllamaEmbedder::new(config)?),
    })
}

/// Build the configured generation provider
pub fn llm_from_config(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    Ok(match config.backend {
        ModelBackend::Http => Arc::new(HttpLlm::new(config)?),
        ModelBackend::Ollama => Arc::new(OllamaLlm::new(config)?),
    })
}

/// Build the configured vector store
pub fn vector_store_from_config(config: &VectorDbConfig) -> Result<Arc<dyn VectorStoreProvider>> {
    Ok(match config.backend {
        VectorBackend::Memory => Arc::new(InMemoryVectorStore::new()),
        VectorBackend::Chroma => Arc::new(ChromaVectorStore::new(config)?),
    })
}

//! Turns questions into ranked context passages

use std::sync::Arc;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::providers::embedding::ensure_batch_len;
use crate::providers::{EmbeddingProvider, VectorStoreProvider};
use crate::types::{CollectionId, ScoredPassage};

/// Wraps the embedding provider and vector store
#[derive(Clone)]
pub struct RetrievalClient {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStoreProvider>,
    top_k: usize,
    max_distance: Option<f32>,
}

impl RetrievalClient {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStoreProvider>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            top_k: config.top_k,
            max_distance: config.max_distance,
        }
    }

    /// Embed a batch in one provider call; vector `i` belongs to `texts[i]`
    ///
    /// All-or-nothing: a failed or short batch is an error.
    pub async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        tracing::debug!(
            "Embedding {} texts with {}",
            texts.len(),
            self.embedder.name()
        );
        let vectors = self.embedder.embed_batch(texts).await?;
        ensure_batch_len(texts.len(), &vectors)?;
        Ok(vectors)
    }

    /// Embed a single text, e.g. an incoming question
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embedder.embed(text).await
    }

    /// The `k` stored passages nearest to `vector`, closest first
    ///
    /// Passages further than the configured `max_distance` are dropped.
    pub async fn query(
        &self,
        collection: &CollectionId,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPassage>> {
        let mut passages = self.store.query(collection, vector, k).await?;

        if let Some(limit) = self.max_distance {
            let before = passages.len();
            passages.retain(|p| p.distance <= limit);
            if passages.len() < before {
                tracing::debug!(
                    "Dropped {} passages beyond distance {}",
                    before - passages.len(),
                    limit
                );
            }
        }

        Ok(passages)
    }

    /// Embed `question` and fetch the configured number of passages
    pub async fn retrieve(
        &self,
        collection: &CollectionId,
        question: &str,
    ) -> Result<Vec<ScoredPassage>> {
        let vector = self.embed_one(question).await?;
        self.query(collection, &vector, self.top_k).await
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

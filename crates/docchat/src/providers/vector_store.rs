//! Vector store provider trait: named, isolated collections

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CollectionHandle, CollectionId, CollectionInfo, ScoredPassage};

/// Trait for collection-scoped vector storage and nearest-neighbor search
///
/// A `create_collection` followed by `add` must be visible to any later
/// `query` on the same name.
///
/// Implementations:
/// - `InMemoryVectorStore`: in-process, lost on restart
/// - `ChromaVectorStore`: Chroma REST API
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Create a new, empty collection; fails if the name is taken
    async fn create_collection(&self, id: &CollectionId) -> Result<()>;

    /// Look up a collection; `CollectionNotFound` if absent
    async fn get_collection(&self, id: &CollectionId) -> Result<CollectionHandle>;

    /// Store positionally matched (id, vector, document) triples
    async fn add(
        &self,
        id: &CollectionId,
        ids: &[String],
        vectors: &[Vec<f32>],
        documents: &[String],
    ) -> Result<()>;

    /// The `k` stored documents closest to `vector`, closest first
    async fn query(&self, id: &CollectionId, vector: &[f32], k: usize)
        -> Result<Vec<ScoredPassage>>;

    /// Delete a collection; `CollectionNotFound` if absent
    async fn delete_collection(&self, id: &CollectionId) -> Result<()>;

    /// List every collection in the store
    async fn list_collections(&self) -> Result<Vec<CollectionInfo>>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

//! Per-document collection lifecycle
//!
//! Every indexed document gets its own collection, named with the service
//! prefix and a fresh UUID. The collection name is the only session handle;
//! nothing about it is remembered in process.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::providers::VectorStoreProvider;
use crate::types::{CollectionHandle, CollectionId};

/// Allocates, populates and retires collections in the vector store
#[derive(Clone)]
pub struct CollectionManager {
    store: Arc<dyn VectorStoreProvider>,
    prefix: String,
}

impl CollectionManager {
    pub fn new(store: Arc<dyn VectorStoreProvider>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Allocate a fresh, empty collection
    pub async fn create_collection(&self) -> Result<CollectionId> {
        let id = CollectionId::generate(&self.prefix);
        self.store.create_collection(&id).await?;
        tracing::info!("Created collection {}", id);
        Ok(id)
    }

    /// Create a collection and store the given triples in it
    ///
    /// If storing fails the new collection is deleted again, so a failed
    /// call never leaves a half-populated collection behind.
    pub async fn create_populated(
        &self,
        ids: &[String],
        vectors: &[Vec<f32>],
        documents: &[String],
    ) -> Result<CollectionHandle> {
        let id = self.create_collection().await?;

        if let Err(e) = self.store.add(&id, ids, vectors, documents).await {
            tracing::warn!("Storing chunks in {} failed, removing it: {}", id, e);
            if let Err(cleanup) = self.store.delete_collection(&id).await {
                tracing::error!("Failed to remove collection {}: {}", id, cleanup);
            }
            return Err(e);
        }

        Ok(CollectionHandle {
            id,
            chunk_count: ids.len(),
            created_at: Some(Utc::now()),
        })
    }

    /// Look up a collection; `CollectionNotFound` if the store doesn't know it
    pub async fn get_collection(&self, id: &CollectionId) -> Result<CollectionHandle> {
        self.store.get_collection(id).await
    }

    /// Delete a collection; `CollectionNotFound` if absent
    pub async fn delete_collection(&self, id: &CollectionId) -> Result<()> {
        self.store.delete_collection(id).await?;
        tracing::info!("Deleted collection {}", id);
        Ok(())
    }

    /// Delete collections under our prefix created before `now - ttl`
    ///
    /// Collections without a creation time are left alone. Returns how many
    /// were deleted.
    pub async fn sweep_expired(&self, ttl: Duration, now: DateTime<Utc>) -> Result<usize> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| Error::Config(format!("TTL out of range: {}", e)))?;
        let cutoff = now - ttl;

        let expired: Vec<CollectionId> = self
            .store
            .list_collections()
            .await?
            .into_iter()
            .filter(|info| info.id.has_prefix(&self.prefix))
            .filter(|info| info.created_at.is_some_and(|t| t < cutoff))
            .map(|info| info.id)
            .collect();

        let mut deleted = 0;
        for id in expired {
            match self.store.delete_collection(&id).await {
                Ok(()) => deleted += 1,
                // Already gone, e.g. deleted by a caller meanwhile
                Err(Error::CollectionNotFound(_)) => {}
                Err(e) => tracing::warn!("Failed to expire collection {}: {}", id, e),
            }
        }

        if deleted > 0 {
            tracing::info!("Expired {} collections older than {}", deleted, cutoff);
        }
        Ok(deleted)
    }

    /// Run `sweep_expired` every `interval` until the task is aborted
    pub fn spawn_sweeper(&self, ttl: Duration, interval: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = manager.sweep_expired(ttl, Utc::now()).await {
                    tracing::warn!("Collection sweep failed: {}", e);
                }
            }
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

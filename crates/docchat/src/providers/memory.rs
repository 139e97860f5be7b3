//! In-process vector store
//!
//! Each collection is an isolated list of (id, vector, document) entries.
//! Search is a linear cosine-distance scan (SIMD kernels from simsimd), which
//! is plenty for one document's worth of chunks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use simsimd::SpatialSimilarity;
use std::collections::HashSet;

use crate::error::{Error, Result, Service};
use crate::types::{CollectionHandle, CollectionId, CollectionInfo, ScoredPassage};

use super::vector_store::VectorStoreProvider;

struct StoredEntry {
    id: String,
    vector: Vec<f32>,
    document: String,
}

struct MemoryCollection {
    created_at: DateTime<Utc>,
    entries: Vec<StoredEntry>,
}

/// Vector store held in process memory; lost on restart
#[derive(Default)]
pub struct InMemoryVectorStore {
    collections: DashMap<CollectionId, MemoryCollection>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection with an explicit creation time
    pub fn create_collection_at(&self, id: &CollectionId, created_at: DateTime<Utc>) -> Result<()> {
        match self.collections.entry(id.clone()) {
            Entry::Occupied(_) => Err(Error::upstream(
                Service::VectorStore,
                format!("collection '{}' already exists", id),
            )),
            Entry::Vacant(slot) => {
                slot.insert(MemoryCollection {
                    created_at,
                    entries: Vec::new(),
                });
                Ok(())
            }
        }
    }
}

/// 1 - cosine similarity; 1.0 when either vector has zero length
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.iter().all(|x| *x == 0.0) || b.iter().all(|x| *x == 0.0) {
        return 1.0;
    }
    // None only on a length mismatch, which `add` and `query` rule out
    <f32 as SpatialSimilarity>::cosine(a, b)
        .map(|distance| distance as f32)
        .unwrap_or(1.0)
}

#[async_trait]
impl VectorStoreProvider for InMemoryVectorStore {
    async fn create_collection(&self, id: &CollectionId) -> Result<()> {
        self.create_collection_at(id, Utc::now())
    }

    async fn get_collection(&self, id: &CollectionId) -> Result<CollectionHandle> {
        let collection = self
            .collections
            .get(id)
            .ok_or_else(|| Error::CollectionNotFound(id.to_string()))?;

        Ok(CollectionHandle {
            id: id.clone(),
            chunk_count: collection.entries.len(),
            created_at: Some(collection.created_at),
        })
    }

    async fn add(
        &self,
        id: &CollectionId,
        ids: &[String],
        vectors: &[Vec<f32>],
        documents: &[String],
    ) -> Result<()> {
        if ids.len() != vectors.len() || ids.len() != documents.len() {
            return Err(Error::internal(format!(
                "mismatched add: {} ids, {} vectors, {} documents",
                ids.len(),
                vectors.len(),
                documents.len()
            )));
        }

        let mut collection = self
            .collections
            .get_mut(id)
            .ok_or_else(|| Error::CollectionNotFound(id.to_string()))?;

        let mut seen: HashSet<&str> = collection.entries.iter().map(|e| e.id.as_str()).collect();
        for entry_id in ids {
            if !seen.insert(entry_id.as_str()) {
                return Err(Error::upstream(
                    Service::VectorStore,
                    format!("duplicate id '{}' in collection '{}'", entry_id, id),
                ));
            }
        }

        let dimension = collection
            .entries
            .first()
            .map(|e| e.vector.len())
            .or_else(|| vectors.first().map(Vec::len));
        if let Some(dimension) = dimension {
            if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
                return Err(Error::upstream(
                    Service::VectorStore,
                    format!("expected {}-dimensional vectors, got {}", dimension, bad.len()),
                ));
            }
        }

        collection.entries.extend(
            ids.iter()
                .zip(vectors)
                .zip(documents)
                .map(|((entry_id, vector), document)| StoredEntry {
                    id: entry_id.clone(),
                    vector: vector.clone(),
                    document: document.clone(),
                }),
        );

        Ok(())
    }

    async fn query(
        &self,
        id: &CollectionId,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPassage>> {
        let collection = self
            .collections
            .get(id)
            .ok_or_else(|| Error::CollectionNotFound(id.to_string()))?;

        if let Some(first) = collection.entries.first() {
            if first.vector.len() != vector.len() {
                return Err(Error::upstream(
                    Service::VectorStore,
                    format!(
                        "query has {} dimensions, collection has {}",
                        vector.len(),
                        first.vector.len()
                    ),
                ));
            }
        }

        let mut scored: Vec<ScoredPassage> = collection
            .entries
            .iter()
            .map(|entry| ScoredPassage {
                text: entry.document.clone(),
                distance: cosine_distance(&entry.vector, vector),
            })
            .collect();

        // Stable sort keeps insertion order among ties
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);
        Ok(scored)
    }

    async fn delete_collection(&self, id: &CollectionId) -> Result<()> {
        self.collections
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::CollectionNotFound(id.to_string()))
    }

    async fn list_collections(&self) -> Result<Vec<CollectionInfo>> {
        Ok(self
            .collections
            .iter()
            .map(|entry| CollectionInfo {
                id: entry.key().clone(),
                created_at: Some(entry.value().created_at),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

//! Collection identity and retrieval results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of an isolated retrieval namespace, one per indexed document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(String);

impl CollectionId {
    /// Allocate a fresh, globally unique name
    pub fn generate(prefix: &str) -> Self {
        Self(format!("{}-{}", prefix, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name was allocated under `prefix`
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

impl From<String> for CollectionId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for CollectionId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the vector store reports about a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: CollectionId,
    /// Creation time, when the store kept it
    pub created_at: Option<DateTime<Utc>>,
}

/// Handle to an existing collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionHandle {
    pub id: CollectionId,
    /// Number of stored chunks
    pub chunk_count: usize,
    pub created_at: Option<DateTime<Utc>>,
}

/// A stored passage ranked by distance to a query vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub text: String,
    /// Smaller is closer
    pub distance: f32,
}

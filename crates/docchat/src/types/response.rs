//! Response types

use serde::{Deserialize, Serialize};

use super::collection::{CollectionHandle, CollectionId};

/// Result of indexing one document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    /// Collection to pass with later questions (none when nothing was indexable)
    pub collection_id: Option<CollectionId>,
    /// Number of chunks stored
    pub chunk_count: usize,
    /// Filename as uploaded
    pub filename: String,
    /// Human-readable summary
    pub message: String,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl IndexResponse {
    /// Document had no extractable paragraphs
    pub fn nothing_indexable(filename: impl Into<String>, processing_time_ms: u64) -> Self {
        let filename = filename.into();
        Self {
            collection_id: None,
            chunk_count: 0,
            message: format!("'{}' contains no extractable text", filename),
            filename,
            processing_time_ms,
        }
    }

    pub fn indexed(
        filename: impl Into<String>,
        collection_id: CollectionId,
        chunk_count: usize,
        processing_time_ms: u64,
    ) -> Self {
        let filename = filename.into();
        Self {
            collection_id: Some(collection_id),
            chunk_count,
            message: format!("'{}' indexed: {} chunks processed", filename, chunk_count),
            filename,
            processing_time_ms,
        }
    }
}

/// Generated answer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub answer: String,
    /// Collection the context came from, if any
    pub collection_id: Option<CollectionId>,
    /// Passages injected into the system turn
    pub context_passages: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Answer on the `/chat` route; older clients read `response`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(flatten)]
    pub ask: AskResponse,
}

impl From<AskResponse> for ChatResponse {
    fn from(ask: AskResponse) -> Self {
        Self {
            response: ask.answer.clone(),
            ask,
        }
    }
}

/// Collection status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    pub collection_id: CollectionId,
    pub chunk_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<CollectionHandle> for CollectionResponse {
    fn from(handle: CollectionHandle) -> Self {
        Self {
            collection_id: handle.id,
            chunk_count: handle.chunk_count,
            created_at: handle.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_response_keys() {
        let response = IndexResponse::indexed("a.txt", CollectionId::from("doc-1"), 2, 5);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["collectionId"], "doc-1");
        assert_eq!(json["chunkCount"], 2);
        assert_eq!(json["processingTimeMs"], 5);
        assert!(json.get("chunk_count").is_none());

        let empty = serde_json::to_value(IndexResponse::nothing_indexable("b.txt", 1)).unwrap();
        assert_eq!(empty["chunkCount"], 0);
        assert!(empty["collectionId"].is_null());
    }

    #[test]
    fn test_chat_response_carries_answer_twice() {
        let chat = ChatResponse::from(AskResponse {
            answer: "hello".into(),
            collection_id: None,
            context_passages: 0,
            processing_time_ms: 3,
        });
        let json = serde_json::to_value(&chat).unwrap();
        assert_eq!(json["response"], "hello");
        assert_eq!(json["answer"], "hello");
        assert_eq!(json["contextPassages"], 0);
    }
}

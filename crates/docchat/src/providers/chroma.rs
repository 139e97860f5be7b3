//! Chroma vector store over its REST API (v1)
//!
//! Collections are addressed by name; each call resolves the name to
//! Chroma's internal collection id, so no handle is cached between requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::VectorDbConfig;
use crate::error::{Error, Result, Service};
use crate::types::{CollectionHandle, CollectionId, CollectionInfo, ScoredPassage};

use super::http::{build_client, status_error};
use super::vector_store::VectorStoreProvider;

const CREATED_AT_KEY: &str = "created_at";

/// Collection record as Chroma returns it
#[derive(Debug, Deserialize)]
struct ChromaCollection {
    id: String,
    name: String,
    #[serde(default)]
    metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ChromaCollection {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.metadata
            .as_ref()?
            .get(CREATED_AT_KEY)?
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Serialize)]
struct AddRequest<'a> {
    ids: &'a [String],
    embeddings: &'a [Vec<f32>],
    documents: &'a [String],
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_embeddings: [&'a [f32]; 1],
    n_results: usize,
    include: [&'static str; 2],
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
}

/// Chroma REST client
pub struct ChromaVectorStore {
    client: Client,
    base_url: String,
}

impl ChromaVectorStore {
    pub fn new(config: &VectorDbConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout())?,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    fn transport_error(context: &str, err: reqwest::Error) -> Error {
        Error::from_reqwest(Service::VectorStore, context, err)
    }

    /// Chroma reports a missing collection as 404 or as a 500 naming it
    async fn not_found_or_error(id: &CollectionId, response: reqwest::Response) -> Error {
        if response.status() == StatusCode::NOT_FOUND {
            return Error::CollectionNotFound(id.to_string());
        }
        let err = status_error(Service::VectorStore, response).await;
        match &err {
            Error::Upstream { message, .. } if message.contains("does not exist") => {
                Error::CollectionNotFound(id.to_string())
            }
            _ => err,
        }
    }

    async fn resolve(&self, id: &CollectionId) -> Result<ChromaCollection> {
        let response = self
            .client
            .get(self.url(&format!("/collections/{}", id)))
            .send()
            .await
            .map_err(|e| Self::transport_error("Collection lookup failed", e))?;

        if !response.status().is_success() {
            return Err(Self::not_found_or_error(id, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| Self::transport_error("Failed to parse collection", e))
    }

    async fn count(&self, collection: &ChromaCollection) -> Result<usize> {
        let response = self
            .client
            .get(self.url(&format!("/collections/{}/count", collection.id)))
            .send()
            .await
            .map_err(|e| Self::transport_error("Count request failed", e))?;

        if !response.status().is_success() {
            return Err(status_error(Service::VectorStore, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| Self::transport_error("Failed to parse count", e))
    }
}

#[async_trait]
impl VectorStoreProvider for ChromaVectorStore {
    async fn create_collection(&self, id: &CollectionId) -> Result<()> {
        let body = json!({
            "name": id.as_str(),
            "metadata": { "created_at": Utc::now().to_rfc3339() },
            "get_or_create": false,
        });

        let response = self
            .client
            .post(self.url("/collections"))
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport_error("Create collection failed", e))?;

        if !response.status().is_success() {
            return Err(status_error(Service::VectorStore, response).await);
        }
        Ok(())
    }

    async fn get_collection(&self, id: &CollectionId) -> Result<CollectionHandle> {
        let collection = self.resolve(id).await?;
        let chunk_count = self.count(&collection).await?;

        Ok(CollectionHandle {
            id: id.clone(),
            chunk_count,
            created_at: collection.created_at(),
        })
    }

    async fn add(
        &self,
        id: &CollectionId,
        ids: &[String],
        vectors: &[Vec<f32>],
        documents: &[String],
    ) -> Result<()> {
        let collection = self.resolve(id).await?;

        let response = self
            .client
            .post(self.url(&format!("/collections/{}/add", collection.id)))
            .json(&AddRequest {
                ids,
                embeddings: vectors,
                documents,
            })
            .send()
            .await
            .map_err(|e| Self::transport_error("Add request failed", e))?;

        if !response.status().is_success() {
            return Err(status_error(Service::VectorStore, response).await);
        }
        Ok(())
    }

    async fn query(
        &self,
        id: &CollectionId,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPassage>> {
        let collection = self.resolve(id).await?;

        let response = self
            .client
            .post(self.url(&format!("/collections/{}/query", collection.id)))
            .json(&QueryRequest {
                query_embeddings: [vector],
                n_results: k,
                include: ["documents", "distances"],
            })
            .send()
            .await
            .map_err(|e| Self::transport_error("Query request failed", e))?;

        if !response.status().is_success() {
            return Err(status_error(Service::VectorStore, response).await);
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| Self::transport_error("Failed to parse query response", e))?;

        // One query vector, so only the first result row matters
        let documents = parsed
            .documents
            .and_then(|rows| rows.into_iter().next())
            .unwrap_or_default();
        let distances = parsed
            .distances
            .and_then(|rows| rows.into_iter().next())
            .unwrap_or_default();

        Ok(documents
            .into_iter()
            .zip(distances.into_iter().map(Some).chain(std::iter::repeat(None)))
            .filter_map(|(text, distance)| {
                Some(ScoredPassage {
                    text: text?,
                    distance: distance.unwrap_or(f32::MAX),
                })
            })
            .collect())
    }

    async fn delete_collection(&self, id: &CollectionId) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/collections/{}", id)))
            .send()
            .await
            .map_err(|e| Self::transport_error("Delete collection failed", e))?;

        if !response.status().is_success() {
            return Err(Self::not_found_or_error(id, response).await);
        }
        Ok(())
    }

    async fn list_collections(&self) -> Result<Vec<CollectionInfo>> {
        let response = self
            .client
            .get(self.url("/collections"))
            .send()
            .await
            .map_err(|e| Self::transport_error("List collections failed", e))?;

        if !response.status().is_success() {
            return Err(status_error(Service::VectorStore, response).await);
        }

        let collections: Vec<ChromaCollection> = response
            .json()
            .await
            .map_err(|e| Self::transport_error("Failed to parse collection list", e))?;

        Ok(collections
            .into_iter()
            .map(|c| CollectionInfo {
                created_at: c.created_at(),
                id: CollectionId::from(c.name),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.get(self.url("/heartbeat")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "chroma"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store(server: &MockServer) -> ChromaVectorStore {
        ChromaVectorStore::new(&VectorDbConfig {
            url: server.uri(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap()
    }

    async fn mount_lookup(server: &MockServer, name: &str, uuid: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/collections/{}", name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": uuid,
                "name": name,
                "metadata": {"created_at": "2026-01-02T03:04:05+00:00"}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_create_sends_name_and_timestamp() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections"))
            .and(body_partial_json(json!({"name": "doc-abc", "get_or_create": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "uuid-1", "name": "doc-abc", "metadata": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        store(&server)
            .create_collection(&CollectionId::from("doc-abc"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_goes_to_resolved_collection() {
        let server = MockServer::start().await;
        mount_lookup(&server, "doc-abc", "uuid-1").await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections/uuid-1/add"))
            .and(body_json(json!({
                "ids": ["f.pdf_chunk_0"],
                "embeddings": [[0.5, 0.5]],
                "documents": ["hello"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!(true)))
            .expect(1)
            .mount(&server)
            .await;

        store(&server)
            .add(
                &CollectionId::from("doc-abc"),
                &["f.pdf_chunk_0".to_string()],
                &[vec![0.5, 0.5]],
                &["hello".to_string()],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_query_reads_first_row() {
        let server = MockServer::start().await;
        mount_lookup(&server, "doc-abc", "uuid-1").await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections/uuid-1/query"))
            .and(body_json(json!({
                "query_embeddings": [[1.0, 0.0]],
                "n_results": 3,
                "include": ["documents", "distances"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ids": [["a", "b"]],
                "documents": [["closest", "next"]],
                "distances": [[0.1, 0.4]],
                "metadatas": null
            })))
            .mount(&server)
            .await;

        let results = store(&server)
            .query(&CollectionId::from("doc-abc"), &[1.0, 0.0], 3)
            .await
            .unwrap();
        assert_eq!(
            results,
            vec![
                ScoredPassage { text: "closest".into(), distance: 0.1 },
                ScoredPassage { text: "next".into(), distance: 0.4 },
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_collection_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/collections/doc-123"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": "ValueError('Collection doc-123 does not exist.')"})),
            )
            .mount(&server)
            .await;

        let err = store(&server)
            .query(&CollectionId::from("doc-123"), &[1.0], 3)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CollectionNotFound(_)));
    }

    #[tokio::test]
    async fn test_get_collection_counts_and_reads_timestamp() {
        let server = MockServer::start().await;
        mount_lookup(&server, "doc-abc", "uuid-1").await;
        Mock::given(method("GET"))
            .and(path("/api/v1/collections/uuid-1/count"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(7)))
            .mount(&server)
            .await;

        let handle = store(&server)
            .get_collection(&CollectionId::from("doc-abc"))
            .await
            .unwrap();
        assert_eq!(handle.chunk_count, 7);
        assert!(handle.created_at.is_some());
    }

    #[tokio::test]
    async fn test_list_collections() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "u1", "name": "doc-1", "metadata": {"created_at": "2026-01-02T03:04:05Z"}},
                {"id": "u2", "name": "other", "metadata": null}
            ])))
            .mount(&server)
            .await;

        let listed = store(&server).list_collections().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id.as_str(), "doc-1");
        assert!(listed[0].created_at.is_some());
        assert!(listed[1].created_at.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_upstream_error() {
        let store = ChromaVectorStore::new(&VectorDbConfig {
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..Default::default()
        })
        .unwrap();

        let err = store
            .create_collection(&CollectionId::from("doc-x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Upstream { service: Service::VectorStore, .. }
        ));
        assert!(!store.health_check().await.unwrap());
    }
}

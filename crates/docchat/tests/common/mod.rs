//! In-process fakes for the upstream services

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use docchat::error::{Error, Result, Service};
use docchat::providers::{EmbeddingProvider, InMemoryVectorStore, LlmProvider, VectorStoreProvider};
use docchat::server::{build_router, state::AppState};
use docchat::types::{ChatTurn, CollectionHandle, CollectionId, CollectionInfo, ScoredPassage};
use docchat::{Orchestrator, RagConfig};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Bag-of-letters embedder
#[derive(Default)]
pub struct FakeEmbedder {
    pub calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = vec![0.0f32; 26];
                for c in t.to_ascii_lowercase().bytes().filter(u8::is_ascii_lowercase) {
                    v[(c - b'a') as usize] += 1.0;
                }
                v
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake-embedding"
    }
}

/// Records every prompt and answers with a fixed string
#[derive(Default)]
pub struct FakeLlm {
    pub prompts: Mutex<Vec<(Vec<ChatTurn>, u32)>>,
}

impl FakeLlm {
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn last_system_prompt(&self) -> String {
        self.prompts
            .lock()
            .last()
            .map(|(turns, _)| turns[0].content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn generate(&self, messages: &[ChatTurn], max_tokens: u32) -> Result<String> {
        self.prompts.lock().push((messages.to_vec(), max_tokens));
        Ok("fake answer".to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake-generation"
    }
}

/// In-memory store that counts calls per operation
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryVectorStore,
    pub creates: AtomicUsize,
    pub adds: AtomicUsize,
    pub queries: AtomicUsize,
    pub healthy: bool,
}

impl CountingStore {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
            + self.adds.load(Ordering::SeqCst)
            + self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStoreProvider for CountingStore {
    async fn create_collection(&self, id: &CollectionId) -> Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_collection(id).await
    }

    async fn get_collection(&self, id: &CollectionId) -> Result<CollectionHandle> {
        self.inner.get_collection(id).await
    }

    async fn add(
        &self,
        id: &CollectionId,
        ids: &[String],
        vectors: &[Vec<f32>],
        documents: &[String],
    ) -> Result<()> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        self.inner.add(id, ids, vectors, documents).await
    }

    async fn query(
        &self,
        id: &CollectionId,
        vector: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredPassage>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(id, vector, k).await
    }

    async fn delete_collection(&self, id: &CollectionId) -> Result<()> {
        self.inner.delete_collection(id).await
    }

    async fn list_collections(&self) -> Result<Vec<CollectionInfo>> {
        self.inner.list_collections().await
    }

    async fn health_check(&self) -> Result<bool> {
        if self.healthy {
            Ok(true)
        } else {
            Err(Error::upstream(Service::VectorStore, "unreachable"))
        }
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Router wired to the given providers
pub struct TestApp {
    pub embedder: Arc<FakeEmbedder>,
    pub llm: Arc<FakeLlm>,
    pub store: Arc<CountingStore>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let embedder = Arc::new(FakeEmbedder::default());
        Self::build(embedder.clone(), embedder, Arc::new(CountingStore::healthy()))
    }

    /// Route embeddings to `embedder` instead of the counting fake
    pub fn with_embedder(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self::build(
            embedder,
            Arc::new(FakeEmbedder::default()),
            Arc::new(CountingStore::healthy()),
        )
    }

    pub fn with_store(store: Arc<CountingStore>) -> Self {
        let embedder = Arc::new(FakeEmbedder::default());
        Self::build(embedder.clone(), embedder, store)
    }

    fn build(
        active: Arc<dyn EmbeddingProvider>,
        embedder: Arc<FakeEmbedder>,
        store: Arc<CountingStore>,
    ) -> Self {
        let config = RagConfig::default();
        let llm = Arc::new(FakeLlm::default());
        let orchestrator = Orchestrator::new(&config, active, llm.clone(), store.clone()).unwrap();
        let router = build_router(AppState::with_orchestrator(config, orchestrator));

        Self {
            embedder,
            llm,
            store,
            router,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = ServiceExt::<Request<Body>>::oneshot(self.router.clone(), request)
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&body).into()))
        };
        (status, json)
    }

    pub async fn upload(&self, uri: &str, filename: &str, content: &str) -> (StatusCode, serde_json::Value) {
        self.send(multipart_request(uri, "file", filename, content)).await
    }

    pub async fn ask(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.send(json_request(uri, &body)).await
    }
}

const BOUNDARY: &str = "docchat-test-boundary";

pub fn multipart_request(uri: &str, field: &str, filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n--{b}--\r\n",
        b = BOUNDARY,
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn json_request(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

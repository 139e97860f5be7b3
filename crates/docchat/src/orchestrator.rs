//! Index and ask pipelines
//!
//! `index`: parse → chunk → embed → create and populate a collection.
//! `ask`: validate → (embed question → nearest passages) → compose → generate.
//! No state is kept between requests; the collection id travels with
//! every question.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::collections::CollectionManager;
use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::PromptComposer;
use crate::ingestion::{FileParser, ParagraphChunker};
use crate::providers::{
    embedding_from_config, llm_from_config, vector_store_from_config, EmbeddingProvider,
    LlmProvider, VectorStoreProvider,
};
use crate::retrieval::RetrievalClient;
use crate::types::query::MAX_TOKENS_LIMIT;
use crate::types::{AskRequest, AskResponse, Document, IndexResponse};

/// Reachability of each upstream service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderHealth {
    pub embedding: bool,
    pub generation: bool,
    pub vector_store: bool,
}

impl ProviderHealth {
    pub fn all_up(&self) -> bool {
        self.embedding && self.generation && self.vector_store
    }
}

/// Entry point for both pipelines
#[derive(Clone)]
pub struct Orchestrator {
    chunker: ParagraphChunker,
    retrieval: RetrievalClient,
    collections: CollectionManager,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn VectorStoreProvider>,
    default_system_prompt: String,
    default_max_tokens: u32,
}

impl Orchestrator {
    /// Wire the pipelines to explicit providers
    pub fn new(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn VectorStoreProvider>,
    ) -> Result<Self> {
        Ok(Self {
            chunker: ParagraphChunker::from_config(&config.chunking)?,
            retrieval: RetrievalClient::new(embedder.clone(), store.clone(), &config.retrieval),
            collections: CollectionManager::new(store.clone(), &config.vector_db.collection_prefix),
            embedder,
            llm,
            store,
            default_system_prompt: config.llm.default_system_prompt.clone(),
            default_max_tokens: config.llm.default_max_tokens,
        })
    }

    /// Build providers from configuration
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let embedder = embedding_from_config(&config.embeddings)?;
        let llm = llm_from_config(&config.llm)?;
        let store = vector_store_from_config(&config.vector_db)?;

        tracing::info!(
            "Providers: embedding={}, generation={}, vector_store={}",
            embedder.name(),
            llm.name(),
            store.name()
        );

        Self::new(config, embedder, llm, store)
    }

    /// Index one uploaded document into a fresh collection
    pub async fn index(&self, document: Document) -> Result<IndexResponse> {
        let start = Instant::now();

        if document.is_empty() {
            return Err(Error::invalid_input("No file supplied or file is empty"));
        }

        let filename = document.filename.clone();
        tracing::info!("Indexing '{}' ({} bytes)", filename, document.data.len());

        let parsed = tokio::task::spawn_blocking(move || FileParser::parse(&document))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

        let chunks = self.chunker.chunk_text(&filename, &parsed.content);
        if chunks.is_empty() {
            tracing::info!("'{}' has no extractable paragraphs", filename);
            return Ok(IndexResponse::nothing_indexable(
                filename,
                start.elapsed().as_millis() as u64,
            ));
        }

        let (ids, texts): (Vec<String>, Vec<String>) =
            chunks.into_iter().map(|c| (c.id, c.content)).unzip();

        // Embeddings first: a failure here leaves nothing behind in the store
        let vectors = self.retrieval.embed_many(&texts).await?;
        let handle = self
            .collections
            .create_populated(&ids, &vectors, &texts)
            .await?;

        let elapsed = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Indexed '{}' into {}: {} chunks in {}ms",
            filename,
            handle.id,
            handle.chunk_count,
            elapsed
        );

        Ok(IndexResponse::indexed(
            filename,
            handle.id,
            handle.chunk_count,
            elapsed,
        ))
    }

    /// Answer a question, grounded in a collection when one is given
    pub async fn ask(&self, request: AskRequest) -> Result<AskResponse> {
        let start = Instant::now();

        let question = request
            .question_text()
            .ok_or_else(|| Error::invalid_input("A non-empty question is required"))?
            .to_string();

        let max_tokens = request.max_tokens.unwrap_or(self.default_max_tokens);
        if !(1..=MAX_TOKENS_LIMIT).contains(&max_tokens) {
            return Err(Error::invalid_input(format!(
                "max_tokens must be between 1 and {}, got {}",
                MAX_TOKENS_LIMIT, max_tokens
            )));
        }

        let system_prompt = request
            .system_prompt
            .as_deref()
            .unwrap_or(&self.default_system_prompt);

        // A blank id means no collection, same as leaving it out
        let collection_id = request
            .collection_id
            .filter(|id| !id.as_str().trim().is_empty());

        let passages: Vec<String> = match &collection_id {
            Some(id) => {
                let ranked = self.retrieval.retrieve(id, &question).await?;
                tracing::debug!("Retrieved {} passages from {}", ranked.len(), id);
                ranked.into_iter().map(|p| p.text).collect()
            }
            None => {
                tracing::debug!("No collection given, answering without context");
                Vec::new()
            }
        };

        let messages = PromptComposer::compose(system_prompt, &passages, &question);
        let answer = self.llm.generate(&messages, max_tokens).await?;

        let elapsed = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Answered question with {} context passages in {}ms",
            passages.len(),
            elapsed
        );

        Ok(AskResponse {
            answer,
            collection_id,
            context_passages: passages.len(),
            processing_time_ms: elapsed,
        })
    }

    /// Probe every upstream service concurrently
    pub async fn health(&self) -> ProviderHealth {
        let (embedding, generation, vector_store) = tokio::join!(
            self.embedder.health_check(),
            self.llm.health_check(),
            self.store.health_check(),
        );

        ProviderHealth {
            embedding: embedding.unwrap_or(false),
            generation: generation.unwrap_or(false),
            vector_store: vector_store.unwrap_or(false),
        }
    }

    pub fn collections(&self) -> &CollectionManager {
        &self.collections
    }
}

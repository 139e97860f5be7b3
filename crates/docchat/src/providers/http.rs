//! Clients for the JSON embedding and generation microservices
//!
//! Embedding service: `POST {"text": string | [string]}` returns
//! `{"embedding": vector | [vector]}`. Generation service:
//! `POST {"messages": [...], "max_tokens": n}` returns `{"response": text}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result, Service};
use crate::types::ChatTurn;

use super::embedding::{ensure_batch_len, EmbeddingProvider};
use super::llm::LlmProvider;

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(5)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-success response into an upstream error carrying the body
pub(crate) async fn status_error(service: Service, response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::upstream(service, format!("HTTP {} - {}", status, body.trim()))
}

/// Reachability probe: any HTTP answer counts as up
async fn probe(client: &Client, url: &str) -> Result<bool> {
    match client.get(url).send().await {
        Ok(_) => Ok(true),
        Err(e) => {
            tracing::debug!("Probe of {} failed: {}", url, e);
            Ok(false)
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a [String],
}

/// Single text yields a bare vector upstream; batches yield a list
#[derive(Deserialize)]
#[serde(untagged)]
enum EmbeddingPayload {
    Batch(Vec<Vec<f32>>),
    Single(Vec<f32>),
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(alias = "vectors")]
    embedding: EmbeddingPayload,
}

impl EmbeddingPayload {
    fn into_batch(self) -> Vec<Vec<f32>> {
        match self {
            Self::Batch(vectors) => vectors,
            Self::Single(vector) => vec![vector],
        }
    }
}

/// Embedding microservice client
pub struct HttpEmbedder {
    client: Client,
    url: String,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout())?,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Embedding {} texts via {}", texts.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&EmbedRequest { text: texts })
            .send()
            .await
            .map_err(|e| Error::from_reqwest(Service::Embedding, "Embedding request failed", e))?;

        if !response.status().is_success() {
            return Err(status_error(Service::Embedding, response).await);
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| {
            Error::from_reqwest(Service::Embedding, "Failed to parse embedding response", e)
        })?;

        let vectors = parsed.embedding.into_batch();
        ensure_batch_len(texts.len(), &vectors)?;
        Ok(vectors)
    }

    async fn health_check(&self) -> Result<bool> {
        probe(&self.client, &self.url).await
    }

    fn name(&self) -> &str {
        "http-embedding"
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    messages: &'a [ChatTurn],
    max_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(alias = "text")]
    response: String,
}

/// Generation microservice client
pub struct HttpLlm {
    client: Client,
    url: String,
}

impl HttpLlm {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout())?,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl LlmProvider for HttpLlm {
    async fn generate(&self, messages: &[ChatTurn], max_tokens: u32) -> Result<String> {
        tracing::info!(
            "Generating answer via {} ({} messages, max_tokens={})",
            self.url,
            messages.len(),
            max_tokens
        );

        let response = self
            .client
            .post(&self.url)
            .json(&GenerateRequest {
                messages,
                max_tokens,
            })
            .send()
            .await
            .map_err(|e| Error::from_reqwest(Service::Generation, "Generation request failed", e))?;

        if !response.status().is_success() {
            return Err(status_error(Service::Generation, response).await);
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            Error::from_reqwest(Service::Generation, "Failed to parse generation response", e)
        })?;

        Ok(parsed.response.trim().to_string())
    }

    async fn health_check(&self) -> Result<bool> {
        probe(&self.client, &self.url).await
    }

    fn name(&self) -> &str {
        "http-generation"
    }
}

//! Ollama-based providers for embeddings and chat generation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result, Service};
use crate::types::ChatTurn;

use super::embedding::{ensure_batch_len, EmbeddingProvider};
use super::http::{build_client, status_error};
use super::llm::LlmProvider;

/// Ollama API client bound to one model
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Server base URL, e.g. `http://localhost:11434`
    base_url: String,
    /// Model name
    model: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    num_predict: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatTurn,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Embed a batch with `/api/embed`
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(Service::Embedding, "Embedding request failed", e))?;

        if !response.status().is_success() {
            return Err(status_error(Service::Embedding, response).await);
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            Error::from_reqwest(Service::Embedding, "Failed to parse embedding response", e)
        })?;

        Ok(embed_response.embeddings)
    }

    /// Non-streaming chat completion with `/api/chat`
    pub async fn chat(&self, messages: &[ChatTurn], max_tokens: u32) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: ChatOptions {
                num_predict: max_tokens,
            },
        };

        tracing::info!("Generating answer with model: {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(Service::Generation, "Generation request failed", e))?;

        if !response.status().is_success() {
            return Err(status_error(Service::Generation, response).await);
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            Error::from_reqwest(Service::Generation, "Failed to parse generation response", e)
        })?;

        Ok(chat_response.message.content.trim().to_string())
    }
}

/// Ollama embedding provider (nomic-embed-text or similar)
pub struct OllamaEmbedder {
    client: OllamaClient,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        Ok(Self {
            client: OllamaClient::new(&config.url, &config.model, config.timeout())?,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.client.embed(texts).await?;
        ensure_batch_len(texts.len(), &vectors)?;
        Ok(vectors)
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama chat provider
pub struct OllamaLlm {
    client: OllamaClient,
}

impl OllamaLlm {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: OllamaClient::new(&config.url, &config.model, config.timeout())?,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate(&self, messages: &[ChatTurn], max_tokens: u32) -> Result<String> {
        self.client.chat(messages, max_tokens).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelBackend;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_embed_uses_input_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_json(json!({"model": "nomic-embed-text", "input": ["x", "y"]})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"embeddings": [[0.1], [0.2]]})),
            )
            .mount(&server)
            .await;

        let embedder = OllamaEmbedder::new(&EmbeddingConfig {
            backend: ModelBackend::Ollama,
            url: server.uri(),
            ..Default::default()
        })
        .unwrap();

        let vectors = embedder
            .embed_batch(&["x".to_string(), "y".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors, vec![vec![0.1], vec![0.2]]);
    }

    #[tokio::test]
    async fn test_chat_maps_budget_to_num_predict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "model": "llama3",
                "messages": [{"role": "user", "content": "hello"}],
                "stream": false,
                "options": {"num_predict": 64}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3",
                "message": {"role": "assistant", "content": "hi there"},
                "done": true
            })))
            .mount(&server)
            .await;

        let llm = OllamaLlm::new(&LlmConfig {
            backend: ModelBackend::Ollama,
            url: format!("{}/", server.uri()),
            ..Default::default()
        })
        .unwrap();

        let answer = llm.generate(&[ChatTurn::user("hello")], 64).await.unwrap();
        assert_eq!(answer, "hi there");
    }

    #[tokio::test]
    async fn test_health_check_reports_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = OllamaClient::new(&server.uri(), "m", Duration::from_secs(1)).unwrap();
        assert!(!client.health_check().await.unwrap());
    }
}

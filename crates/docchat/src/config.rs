//! Configuration for the orchestrator

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Paragraph chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding service configuration
    pub embeddings: EmbeddingConfig,
    /// Generation service configuration
    pub llm: LlmConfig,
    /// Vector database configuration
    pub vector_db: VectorDbConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("EMBEDDING_API_URL") {
            self.embeddings.url = url;
        }
        if let Some(url) = lookup("LLM_API_URL") {
            self.llm.url = url;
        }
        if let Some(url) = lookup("VECTOR_DB_URL") {
            self.vector_db.url = url;
        }
        if let Some(host) = lookup("DOCCHAT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DOCCHAT_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid DOCCHAT_PORT '{}': {}", port, e)))?;
        }
        Ok(())
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be at least 1".into()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".into()));
        }
        if self.embeddings.timeout_secs == 0
            || self.llm.timeout_secs == 0
            || self.vector_db.timeout_secs == 0
        {
            return Err(Error::Config("service timeouts must be non-zero".into()));
        }
        if self.vector_db.collection_ttl_secs > 0 && self.vector_db.sweep_interval_secs == 0 {
            return Err(Error::Config(
                "vector_db.sweep_interval_secs must be non-zero when a TTL is set".into(),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Paragraph chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Paragraphs per chunk
    pub chunk_size: usize,
    /// Paragraphs shared by consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 3,
            chunk_overlap: 1,
        }
    }
}

/// Which wire protocol a model service speaks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Plain JSON microservice (`/create-embedding`, `/generate`)
    #[default]
    Http,
    /// Ollama server (`/api/embed`, `/api/chat`)
    Ollama,
}

/// Embedding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: ModelBackend,
    /// Full endpoint URL for `http`, base URL for `ollama`
    pub url: String,
    /// Model name (used by the ollama backend)
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Http,
            url: "http://embedding-service:8080/create-embedding".to_string(),
            model: "nomic-embed-text".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub backend: ModelBackend,
    /// Full endpoint URL for `http`, base URL for `ollama`
    pub url: String,
    /// Model name (used by the ollama backend)
    pub model: String,
    /// Request timeout in seconds; generation dominates latency
    pub timeout_secs: u64,
    /// Output token budget when the request does not set one
    pub default_max_tokens: u32,
    /// System instruction when the request does not set one
    pub default_system_prompt: String,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Http,
            url: "http://llm-service:8080/generate".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 300,
            default_max_tokens: 512,
            default_system_prompt: "You are a helpful assistant.".to_string(),
        }
    }
}

/// Vector store backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    /// In-process store, lost on restart
    #[default]
    Memory,
    /// Chroma server over its REST API
    Chroma,
}

/// Vector database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorDbConfig {
    pub backend: VectorBackend,
    /// Base URL (chroma backend only)
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Prefix of every collection name this service creates
    pub collection_prefix: String,
    /// Collections older than this are deleted by the sweeper (0 disables)
    pub collection_ttl_secs: u64,
    /// How often the sweeper runs
    pub sweep_interval_secs: u64,
}

impl VectorDbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn collection_ttl(&self) -> Option<Duration> {
        (self.collection_ttl_secs > 0).then(|| Duration::from_secs(self.collection_ttl_secs))
    }
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            backend: VectorBackend::Memory,
            url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
            collection_prefix: "doc".to_string(),
            collection_ttl_secs: 24 * 3600,
            sweep_interval_secs: 300,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Passages retrieved per question
    pub top_k: usize,
    /// Drop passages farther than this distance (unset: keep all)
    pub max_distance: Option<f32>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_distance: None,
        }
    }
}

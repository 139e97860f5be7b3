//! Error types for the orchestrator

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Result type alias for orchestrator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Upstream service that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Embedding,
    Generation,
    VectorStore,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Service::Embedding => "embedding",
            Service::Generation => "generation",
            Service::VectorStore => "vector_store",
        };
        f.write_str(name)
    }
}

/// Caller-visible error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    UpstreamError,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UpstreamError => "upstream_error",
            ErrorKind::InternalError => "internal_error",
        }
    }
}

/// Orchestrator errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or missing request field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Unknown collection
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Embedding, generation or vector store failure
    #[error("{service} service error: {message}")]
    Upstream {
        service: Service,
        message: String,
        timed_out: bool,
    },

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an upstream error
    pub fn upstream(service: Service, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
            timed_out: false,
        }
    }

    /// Translate a transport error from one of the upstream services
    pub fn from_reqwest(service: Service, context: &str, err: reqwest::Error) -> Self {
        Self::Upstream {
            service,
            message: format!("{}: {}", context, err),
            timed_out: err.is_timeout(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Category reported to the caller
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) | Error::UnsupportedFileType(_) => ErrorKind::InvalidInput,
            Error::CollectionNotFound(_) => ErrorKind::NotFound,
            Error::Upstream { .. } => ErrorKind::UpstreamError,
            Error::Config(_) | Error::FileParse { .. } | Error::Io(_) | Error::Internal(_) => {
                ErrorKind::InternalError
            }
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Upstream { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => match self.kind() {
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::UpstreamError => StatusCode::BAD_GATEWAY,
                ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();

        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", kind.as_str(), self);
        }

        let body = Json(json!({
            "error": {
                "kind": kind.as_str(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

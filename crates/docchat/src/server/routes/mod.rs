//! API routes

pub mod ask;
pub mod collections;
pub mod index;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Indexing - with larger body limit for file uploads
        .route(
            "/index",
            post(index::index_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/ask", post(ask::ask_question))
        .route(
            "/collections/:id",
            get(collections::get_collection).delete(collections::delete_collection),
        )
        .route("/info", get(info))
}

/// Top-level paths kept for existing clients
pub fn legacy_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/index-pdf",
            post(index::index_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/chat", post(ask::chat))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docchat",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Chat with an uploaded document via retrieval-augmented generation",
        "endpoints": {
            "POST /api/index": "Upload a document (multipart field 'file'); returns a collection id",
            "POST /api/ask": "Ask a question, optionally grounded in a collection",
            "GET /api/collections/:id": "Collection status and chunk count",
            "DELETE /api/collections/:id": "Delete a collection",
            "POST /index-pdf": "Alias of POST /api/index",
            "POST /chat": "Alias of POST /api/ask; the answer is also under 'response'"
        }
    }))
}

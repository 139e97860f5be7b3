//! Document indexing endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{Document, IndexResponse};

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

/// POST /api/index - Upload a document into a new collection
pub async fn index_document(
    State(state): State<AppState>,
    payload: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<IndexResponse>> {
    let mut multipart = payload.map_err(|e| Error::invalid_input(e.body_text()))?;
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_input(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::invalid_input("Uploaded file has no filename"))?
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_input(format!("Failed to read file: {}", e)))?;

        document = Some(Document::new(filename, data));
        break;
    }

    let document = document
        .ok_or_else(|| Error::invalid_input(format!("No '{}' field in upload", FILE_FIELD)))?;

    let response = state.orchestrator().index(document).await?;
    Ok(Json(response))
}

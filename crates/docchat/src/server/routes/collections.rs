//! Collection lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{CollectionId, CollectionResponse};

/// GET /api/collections/:id - Existence and chunk count
pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CollectionResponse>> {
    let handle = state
        .orchestrator()
        .collections()
        .get_collection(&CollectionId::from(id))
        .await?;
    Ok(Json(handle.into()))
}

/// DELETE /api/collections/:id - Drop a collection
pub async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state
        .orchestrator()
        .collections()
        .delete_collection(&CollectionId::from(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

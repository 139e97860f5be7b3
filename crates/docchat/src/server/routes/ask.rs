//! Question answering endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse, ChatResponse};

/// POST /api/ask - Answer a question, grounded in a collection if one is given
pub async fn ask_question(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>> {
    let Json(request) = payload.map_err(|e| Error::invalid_input(e.body_text()))?;
    answer(&state, request).await.map(Json)
}

/// POST /chat - Same as `/api/ask`, with the answer also under `response`
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(request) = payload.map_err(|e| Error::invalid_input(e.body_text()))?;
    let response = answer(&state, request).await?;
    Ok(Json(response.into()))
}

async fn answer(state: &AppState, request: AskRequest) -> Result<AskResponse> {
    tracing::info!(
        "Question (collection: {})",
        request
            .collection_id
            .as_ref()
            .map(|id| id.as_str())
            .unwrap_or("none")
    );

    state.orchestrator().ask(request).await
}

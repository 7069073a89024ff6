//! POST /summarize - forward a chat-completion request upstream.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use mermaidai_types::llm::{ChatCompletion, ChatRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// The request is passed through unchanged; the completion comes back as JSON.
pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatCompletion>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let completion = state
        .openai
        .create_chat_completion(&request)
        .await
        .map_err(AppError::Completion)?;

    Ok(Json(completion))
}

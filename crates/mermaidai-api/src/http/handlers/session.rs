//! GET /session - mint an ephemeral realtime credential.

use axum::Json;
use axum::extract::State;

use mermaidai_types::realtime::{RealtimeSession, RealtimeSessionRequest};

use crate::http::error::AppError;
use crate::state::AppState;

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<RealtimeSession>, AppError> {
    let request = RealtimeSessionRequest::for_model(&state.config.realtime_model);
    let session = state
        .openai
        .create_realtime_session(&request)
        .await
        .map_err(AppError::Session)?;

    Ok(Json(session))
}

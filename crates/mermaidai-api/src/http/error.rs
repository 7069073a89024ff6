//! Application error type mapping to HTTP status codes.
//!
//! Bodies are short plain-text messages; details go to the log only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use mermaidai_infra::openai::OpenAiError;

/// Handler failure.
#[derive(Debug)]
pub enum AppError {
    /// Request body could not be decoded.
    InvalidRequest(String),
    /// Upstream chat completion failed.
    Completion(OpenAiError),
    /// Upstream realtime session could not be minted.
    Session(OpenAiError),
}

impl AppError {
    fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid request",
            AppError::Completion(_) => "failed to get completion",
            AppError::Session(_) => "failed to create session",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.public_message();
        let status = match &self {
            AppError::InvalidRequest(detail) => {
                tracing::info!(error = %detail, "{message}");
                StatusCode::BAD_REQUEST
            }
            AppError::Completion(err) | AppError::Session(err) => {
                tracing::error!(error = %err, "{message}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, message).into_response()
    }
}

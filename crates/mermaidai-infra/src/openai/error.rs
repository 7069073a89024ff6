//! Errors from the upstream OpenAI API.

use serde::Deserialize;
use thiserror::Error;

/// Failure talking to the upstream API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpenAiError {
    /// The API answered with a non-success status.
    #[error("openai: {kind}: {message}")]
    Api {
        status: u16,
        message: String,
        kind: String,
        param: Option<serde_json::Value>,
        code: i64,
    },

    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// A success response whose body could not be decoded.
    #[error("decode response: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    param: Option<serde_json::Value>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl OpenAiError {
    /// Build an API error from a non-success response body.
    ///
    /// A body that is not the documented `{"error": {...}}` envelope is
    /// reported with type `json_unmarshal_error` and code -1.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => OpenAiError::Api {
                status,
                message: error.message,
                kind: error.kind,
                param: error.param.filter(|p| !p.is_null()),
                code: error.code.and_then(|c| c.as_i64()).unwrap_or_default(),
            },
            Err(err) => OpenAiError::Api {
                status,
                message: err.to_string(),
                kind: "json_unmarshal_error".to_string(),
                param: None,
                code: -1,
            },
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenAiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OpenAiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            OpenAiError::Decode(err.to_string())
        } else {
            OpenAiError::Request(err.to_string())
        }
    }
}

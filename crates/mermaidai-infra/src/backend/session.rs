//! SessionTokenSource over `GET /session`.

use std::time::Duration;

use mermaidai_core::connection::SessionTokenSource;
use mermaidai_types::error::TransportError;
use mermaidai_types::realtime::RealtimeSession;

/// Fetches realtime credentials from a MermaidAI backend.
///
/// The token source of sessions opened through [`crate::client::open_session`].
#[derive(Debug, Clone)]
pub struct SessionEndpoint {
    client: reqwest::Client,
    url: String,
}

impl SessionEndpoint {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = super::http_client(timeout)
            .map_err(|e| TransportError::TokenRequest(e.to_string()))?;
        Ok(Self {
            client,
            url: format!("{}/session", server_url.trim_end_matches('/')),
        })
    }
}

impl SessionTokenSource for SessionEndpoint {
    async fn fetch_token(&self) -> Result<RealtimeSession, TransportError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| TransportError::TokenRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::TokenRequest(status.to_string()));
        }

        response
            .json::<RealtimeSession>()
            .await
            .map_err(|e| TransportError::TokenRequest(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use serde_json::json;

    use super::*;
    use crate::test_server;

    #[tokio::test]
    async fn test_fetches_model_and_secret() {
        let base = test_server::spawn(Router::new().route(
            "/session",
            get(|| async {
                Json(json!({
                    "model": "gpt-4o-realtime-preview-2024-12-17",
                    "client_secret": {"value": "ek_1", "expires_at": 42}
                }))
            }),
        ))
        .await;

        let token = SessionEndpoint::new(&base, Duration::from_secs(5))
            .unwrap()
            .fetch_token()
            .await
            .unwrap();
        assert_eq!(token.model, "gpt-4o-realtime-preview-2024-12-17");
        assert_eq!(token.client_secret.value, "ek_1");
    }

    #[tokio::test]
    async fn test_failure_mentions_session_endpoint() {
        let base = test_server::spawn(Router::new().route(
            "/session",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "failed to create session") }),
        ))
        .await;

        let err = SessionEndpoint::new(&base, Duration::from_secs(5))
            .unwrap()
            .fetch_token()
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to get /session from server: 500 Internal Server Error"
        );
    }
}

//! OpenAiClient -- direct client for the upstream OpenAI API.
//!
//! Two calls are needed: chat completions (used to summarize diagram
//! changes) and realtime session creation (used to mint the short-lived
//! credential the browser connects with). Both are plain JSON POSTs with
//! bearer authentication.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;

use mermaidai_core::summary::SummaryBackend;
use mermaidai_types::error::SummarizeError;
use mermaidai_types::llm::{ChatCompletion, ChatRequest};
use mermaidai_types::realtime::{RealtimeSession, RealtimeSessionRequest};

use super::error::OpenAiError;

/// Default upstream API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for the OpenAI REST API.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// building the `Authorization` header.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

// No Debug: keeps the client out of accidental `{:?}` logging.

impl OpenAiClient {
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, OpenAiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAiError::Request(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (proxies, compatible servers, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a chat completion.
    #[tracing::instrument(
        name = "create_chat_completion",
        skip_all,
        fields(model = %request.model, messages = request.messages.len())
    )]
    pub async fn create_chat_completion(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, OpenAiError> {
        self.post_json("/chat/completions", request).await
    }

    /// Mint an ephemeral realtime session credential.
    #[tracing::instrument(name = "create_realtime_session", skip_all, fields(model = %input.model))]
    pub async fn create_realtime_session(
        &self,
        input: &RealtimeSessionRequest,
    ) -> Result<RealtimeSession, OpenAiError> {
        self.post_json("/realtime/sessions", input).await
    }

    async fn post_json<I, O>(&self, path: &str, input: &I) -> Result<O, OpenAiError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(input)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = OpenAiError::from_response(status.as_u16(), &body);
            tracing::warn!(%status, error = %err, "Upstream request failed");
            return Err(err);
        }

        response
            .json::<O>()
            .await
            .map_err(|e| OpenAiError::Decode(e.to_string()))
    }
}

impl SummaryBackend for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, SummarizeError> {
        self.create_chat_completion(request)
            .await
            .map_err(|err| match err {
                OpenAiError::Api { status, .. } => SummarizeError::Status(status),
                OpenAiError::Request(message) => SummarizeError::Transport(message),
                OpenAiError::Decode(message) => SummarizeError::MalformedResponse(message),
            })
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use mermaidai_types::llm::ChatMessage;
    use serde_json::{Value, json};

    use super::*;
    use crate::test_server;

    fn client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(SecretString::from("sk-test"), Duration::from_secs(5))
            .unwrap()
            .with_base_url(base_url)
    }

    fn request() -> ChatRequest {
        ChatRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::user("hi")],
        }
    }

    async fn echo_completion(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        Json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1,
            "model": body["model"],
            "choices": [{"index": 0, "message": {"role": "assistant", "content": auth}, "finish_reason": "stop"}]
        }))
    }

    #[tokio::test]
    async fn test_chat_completion_sends_bearer_and_decodes() {
        let base = test_server::spawn(
            Router::new().route("/chat/completions", post(echo_completion)),
        )
        .await;

        let completion = client(&base).create_chat_completion(&request()).await.unwrap();
        assert_eq!(completion.model, "gpt-3.5-turbo");
        assert_eq!(completion.first_content(), Some("Bearer sk-test"));
    }

    #[tokio::test]
    async fn test_api_errors_are_parsed() {
        let base = test_server::spawn(Router::new().route(
            "/chat/completions",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({"error": {"message": "slow down", "type": "rate_limit", "code": 429}})),
                )
            }),
        ))
        .await;

        let err = client(&base).create_chat_completion(&request()).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.to_string(), "openai: rate_limit: slow down");

        let summary_err = SummaryBackend::complete(&client(&base), &request())
            .await
            .unwrap_err();
        assert_eq!(summary_err, SummarizeError::Status(429));
    }

    #[tokio::test]
    async fn test_realtime_session_passes_through_model_and_secret() {
        let base = test_server::spawn(Router::new().route(
            "/realtime/sessions",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "id": "sess_1",
                    "object": "realtime.session",
                    "model": body["model"],
                    "voice": "alloy",
                    "client_secret": {"value": "ek_abc", "expires_at": 1700000060}
                }))
            }),
        ))
        .await;

        let session = client(&base)
            .create_realtime_session(&RealtimeSessionRequest::for_model("gpt-4o-realtime"))
            .await
            .unwrap();
        assert_eq!(session.model, "gpt-4o-realtime");
        assert_eq!(session.client_secret.value, "ek_abc");
        assert_eq!(session.client_secret.expires_at, 1700000060);
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let base = test_server::spawn(
            Router::new().route("/chat/completions", post(|| async { "not json" })),
        )
        .await;

        let err = client(&base).create_chat_completion(&request()).await.unwrap_err();
        assert!(matches!(err, OpenAiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_request_error() {
        let err = client("http://127.0.0.1:9")
            .create_chat_completion(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, OpenAiError::Request(_)));
    }
}

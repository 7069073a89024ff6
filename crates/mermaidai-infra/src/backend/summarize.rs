//! SummaryBackend over `POST /summarize`.

use std::time::Duration;

use mermaidai_core::summary::SummaryBackend;
use mermaidai_types::error::SummarizeError;
use mermaidai_types::llm::{ChatCompletion, ChatRequest};

/// Sends summarization prompts to a MermaidAI backend.
#[derive(Debug, Clone)]
pub struct SummarizeEndpoint {
    client: reqwest::Client,
    url: String,
}

impl SummarizeEndpoint {
    /// `server_url` is the backend root, e.g. `http://localhost:8000`.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, SummarizeError> {
        let client = super::http_client(timeout)
            .map_err(|e| SummarizeError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: format!("{}/summarize", server_url.trim_end_matches('/')),
        })
    }
}

impl SummaryBackend for SummarizeEndpoint {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, SummarizeError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| SummarizeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::Status(status.as_u16()));
        }

        response
            .json::<ChatCompletion>()
            .await
            .map_err(|e| SummarizeError::MalformedResponse(e.to_string()))
    }
}

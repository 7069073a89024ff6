//! Application state shared by the HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use mermaidai_infra::openai::{OpenAiClient, OpenAiError};
use mermaidai_types::config::AppConfig;

/// Upstream client plus the resolved configuration.
#[derive(Clone)]
pub struct AppState {
    pub openai: Arc<OpenAiClient>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, api_key: SecretString) -> Result<Self, OpenAiError> {
        let openai = OpenAiClient::new(api_key, Duration::from_secs(config.request_timeout_secs))?
            .with_base_url(&config.openai_base_url);
        Ok(Self {
            openai: Arc::new(openai),
            config: Arc::new(config),
        })
    }
}

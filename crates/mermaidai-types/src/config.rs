//! Application configuration types for MermaidAI.
//!
//! `AppConfig` represents the `config.toml` in the data directory. Every
//! field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address.
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Model used for realtime voice/text sessions.
    #[serde(default = "default_realtime_model")]
    pub realtime_model: String,

    /// Model used for change summaries.
    #[serde(default = "default_summary_model")]
    pub summary_model: String,

    /// Base URL of the upstream OpenAI-compatible API.
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Directory of static web assets served at `/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Upstream HTTP request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_realtime_model() -> String {
    "gpt-4o-realtime-preview-2024-12-17".to_string()
}

fn default_summary_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            realtime_model: default_realtime_model(),
            summary_model: default_summary_model(),
            openai_base_url: default_openai_base_url(),
            static_dir: default_static_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

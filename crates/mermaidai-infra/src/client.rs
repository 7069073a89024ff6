//! Wires a [`DiagramSession`] to a running MermaidAI backend.
//!
//! Change summaries and realtime credentials come from the backend's
//! `/summarize` and `/session` endpoints, diagrams are rendered by the
//! Mermaid CLI, and the theme persists in `{data_dir}/preferences.json`.
//! The realtime media transport is supplied by the caller.
//!
//! ```no_run
//! # async fn demo<T: mermaidai_core::connection::RealtimeTransport>(transport: T) {
//! use mermaidai_core::event::EventBus;
//! use mermaidai_infra::client::{ClientConfig, open_session};
//!
//! let config = ClientConfig::new("http://localhost:8000", "/tmp/mermaidai");
//! let session = open_session(config, transport, EventBus::default()).await.unwrap();
//! session.initialize(mermaidai_core::templates::DEFAULT_DIAGRAM).await.unwrap();
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use mermaidai_core::connection::RealtimeTransport;
use mermaidai_core::event::EventBus;
use mermaidai_core::session::DiagramSession;
use mermaidai_core::summary::{BoxSummaryBackend, ChangeSummarizer};
use mermaidai_types::config::AppConfig;
use mermaidai_types::error::{SummarizeError, TransportError};
use thiserror::Error;

use crate::backend::{SessionEndpoint, SummarizeEndpoint};
use crate::preferences::JsonPreferenceStore;
use crate::render::MermaidCliRenderer;

/// A diagram session backed by the MermaidAI server and local adapters.
pub type BackendSession<T> =
    DiagramSession<MermaidCliRenderer, SessionEndpoint, T, JsonPreferenceStore>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build summary client: {0}")]
    Summarize(#[from] SummarizeError),

    #[error("failed to build session client: {0}")]
    Session(#[from] TransportError),
}

/// Where the session's adapters point.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:8000`.
    pub server_url: String,
    /// Directory holding `preferences.json`.
    pub data_dir: PathBuf,
    pub summary_model: String,
    /// Per-request timeout for backend calls.
    pub timeout: Duration,
    pub renderer: MermaidCliRenderer,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        let defaults = AppConfig::default();
        Self {
            server_url: server_url.into(),
            data_dir: data_dir.into(),
            summary_model: defaults.summary_model,
            timeout: Duration::from_secs(defaults.request_timeout_secs),
            renderer: MermaidCliRenderer::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: MermaidCliRenderer) -> Self {
        self.renderer = renderer;
        self
    }
}

/// Assemble a [`BackendSession`] over `transport`, restoring the saved theme.
pub async fn open_session<T: RealtimeTransport>(
    config: ClientConfig,
    transport: T,
    events: EventBus,
) -> Result<BackendSession<T>, ClientError> {
    let summaries = SummarizeEndpoint::new(&config.server_url, config.timeout)?;
    let tokens = SessionEndpoint::new(&config.server_url, config.timeout)?;
    let summarizer = ChangeSummarizer::new(BoxSummaryBackend::new(summaries), config.summary_model);
    let preferences = JsonPreferenceStore::new(&config.data_dir);

    tracing::debug!(server = %config.server_url, "Opening diagram session");
    Ok(DiagramSession::open(
        config.renderer,
        summarizer,
        tokens,
        transport,
        preferences,
        events,
    )
    .await)
}

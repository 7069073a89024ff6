//! Clients for the MermaidAI backend's own HTTP endpoints.
//!
//! A diagram session running outside the server talks to the same two
//! endpoints the browser does: `POST /summarize` for change summaries and
//! `GET /session` for the realtime credential.

pub mod session;
pub mod summarize;

pub use session::SessionEndpoint;
pub use summarize::SummarizeEndpoint;

use std::time::Duration;

/// Build the shared HTTP client for backend calls.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

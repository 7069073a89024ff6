//! Infrastructure layer for MermaidAI.
//!
//! Contains implementations of the ports defined in `mermaidai-core`:
//! the OpenAI HTTP client, HTTP clients for the backend's own `/summarize`
//! and `/session` endpoints, the Mermaid CLI renderer, the JSON preference
//! store, and the configuration loader. [`client::open_session`] wires
//! them into a ready-to-use diagram session.

pub mod backend;
pub mod client;
pub mod config;
pub mod openai;
pub mod preferences;
pub mod render;

#[cfg(test)]
pub(crate) mod test_server;

//! Business logic and port definitions for MermaidAI.
//!
//! This crate holds the version history, change summarizer, tool-call
//! dispatcher and diagram session, and defines the ports (renderer,
//! summary backend, realtime transport, preference store) that the
//! infrastructure layer implements. It depends only on `mermaidai-types`,
//! never on `mermaidai-infra` or any HTTP or filesystem crate.

pub mod connection;
pub mod conversation;
pub mod dispatch;
pub mod event;
pub mod history;
pub mod notify;
pub mod preferences;
pub mod prompt;
pub mod render;
pub mod session;
pub mod summary;
pub mod templates;

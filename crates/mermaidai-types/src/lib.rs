//! Shared domain types for MermaidAI.
//!
//! This crate contains the core domain types used across the workspace:
//! diagram versions and their change summaries, chat-completion and realtime
//! protocol shapes, session events, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod diagram;
pub mod error;
pub mod event;
pub mod llm;
pub mod realtime;
pub mod theme;
pub mod version;

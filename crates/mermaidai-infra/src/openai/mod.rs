//! Upstream OpenAI API client.

pub mod client;
pub mod error;

pub use client::OpenAiClient;
pub use error::OpenAiError;

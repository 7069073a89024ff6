//! HTTP backend for the browser client.
//!
//! `POST /summarize` and `GET /session` proxy the upstream API so the
//! browser never sees the long-lived key. Everything else is static assets.

pub mod error;
pub mod handlers;
pub mod router;

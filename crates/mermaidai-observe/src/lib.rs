//! Observability setup for MermaidAI: tracing subscriber and optional
//! OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{LogFormat, filter_for_verbosity, init_tracing, shutdown_tracing};

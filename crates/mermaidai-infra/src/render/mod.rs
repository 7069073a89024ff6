//! Diagram renderer adapters.

pub mod mmdc;

pub use mmdc::MermaidCliRenderer;

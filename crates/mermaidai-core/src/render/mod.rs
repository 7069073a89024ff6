//! Diagram renderer port and the canvas that owns the on-screen diagram.

pub mod canvas;

use std::future::Future;

use mermaidai_types::error::RenderError;
use mermaidai_types::theme::Theme;

pub use canvas::Canvas;

/// Turns diagram source text into rendered markup.
///
/// Implementations report invalid syntax as [`RenderError::Syntax`] with the
/// rendering library's own message, and a renderer that cannot run at all as
/// [`RenderError::Unavailable`].
pub trait DiagramRenderer: Send + Sync {
    fn render(
        &self,
        definition: &str,
        theme: Theme,
    ) -> impl Future<Output = Result<String, RenderError>> + Send;
}

//! The live diagram: editor text, last valid render, and theme.
//!
//! Every consumer that puts a definition on screen (manual edits, restores,
//! templates, tool calls) goes through [`Canvas::apply`]. A failed render
//! updates the editor text but never replaces the last valid render.

use std::sync::Arc;

use mermaidai_types::error::RenderError;
use mermaidai_types::event::SessionEvent;
use mermaidai_types::theme::Theme;
use tokio::sync::Mutex;

use super::DiagramRenderer;
use crate::event::EventBus;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rendered {
    definition: String,
    markup: String,
}

#[derive(Debug, Default)]
struct CanvasState {
    editor_text: String,
    rendered: Option<Rendered>,
    theme: Theme,
}

/// Cloneable handle to the diagram currently on screen.
pub struct Canvas<R> {
    renderer: Arc<R>,
    state: Arc<Mutex<CanvasState>>,
    events: EventBus,
}

impl<R> Clone for Canvas<R> {
    fn clone(&self) -> Self {
        Self {
            renderer: Arc::clone(&self.renderer),
            state: Arc::clone(&self.state),
            events: self.events.clone(),
        }
    }
}

impl<R: DiagramRenderer> Canvas<R> {
    pub fn new(renderer: R, theme: Theme, events: EventBus) -> Self {
        Self {
            renderer: Arc::new(renderer),
            state: Arc::new(Mutex::new(CanvasState {
                theme,
                ..Default::default()
            })),
            events,
        }
    }

    /// Put a definition in the editor and render it.
    ///
    /// Renders are serialized so the screen always shows the most recently
    /// applied valid definition.
    pub async fn apply(&self, definition: &str) -> Result<String, RenderError> {
        let mut state = self.state.lock().await;
        state.editor_text = definition.to_string();

        let markup = self.renderer.render(definition, state.theme).await?;
        state.rendered = Some(Rendered {
            definition: definition.to_string(),
            markup: markup.clone(),
        });
        drop(state);

        self.events.publish(SessionEvent::DiagramRendered {
            definition: definition.to_string(),
            markup: markup.clone(),
        });
        Ok(markup)
    }

    /// Switch theme and re-render the last valid definition with it.
    ///
    /// The theme change sticks even if the re-render fails.
    pub async fn set_theme(&self, theme: Theme) -> Result<(), RenderError> {
        let mut state = self.state.lock().await;
        state.theme = theme;
        let Some(current) = state.rendered.clone() else {
            return Ok(());
        };

        let markup = self.renderer.render(&current.definition, theme).await?;
        state.rendered = Some(Rendered {
            definition: current.definition.clone(),
            markup: markup.clone(),
        });
        drop(state);

        self.events.publish(SessionEvent::DiagramRendered {
            definition: current.definition,
            markup,
        });
        Ok(())
    }

    /// Definition of the last successful render.
    pub async fn current_definition(&self) -> Option<String> {
        let state = self.state.lock().await;
        state.rendered.as_ref().map(|r| r.definition.clone())
    }

    /// Markup of the last successful render.
    pub async fn markup(&self) -> Option<String> {
        let state = self.state.lock().await;
        state.rendered.as_ref().map(|r| r.markup.clone())
    }

    /// Text in the editor, which may not have rendered.
    pub async fn editor_text(&self) -> String {
        self.state.lock().await.editor_text.clone()
    }

    pub async fn theme(&self) -> Theme {
        self.state.lock().await.theme
    }
}

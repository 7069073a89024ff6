//! DiagramSession: one explicit context for a diagram editing session.
//!
//! Owns the canvas, the version history, the conversation state, the tool
//! dispatcher, the realtime connection and the notification surface. Every
//! user action and every inbound assistant event enters through here.
//!
//! Failures are funnelled into the notification surface and also returned so
//! callers can react. Nothing in here aborts the session: a failed render
//! keeps the previous diagram, a failed connection leaves the session
//! usable offline, and summarization never reports failures at all.

use std::sync::{Arc, Mutex};

use mermaidai_types::error::{HistoryError, RenderError, TransportError};
use mermaidai_types::event::SessionEvent;
use mermaidai_types::realtime::{ConnectionStatus, ServerEvent};
use mermaidai_types::theme::Theme;
use mermaidai_types::version::{VersionId, VersionView};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::connection::{ConnectionManager, RealtimeTransport, SessionTokenSource};
use crate::conversation::ConversationContext;
use crate::dispatch::{DispatchOutcome, ToolDispatcher, ToolResult};
use crate::event::EventBus;
use crate::history::{DiagramHistory, VersionHandle, VersionStore};
use crate::notify::NotificationCenter;
use crate::preferences::PreferenceStore;
use crate::prompt;
use crate::render::{Canvas, DiagramRenderer};
use crate::summary::ChangeSummarizer;
use crate::templates;

/// Errors returned by session operations after they were shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unknown template: {0}")]
    UnknownTemplate(String),
}

/// A diagram editing session.
///
/// Library entry point for embedding MermaidAI in a client. The
/// infrastructure crate's `client::open_session` assembles one against a
/// running backend.
pub struct DiagramSession<R, K, T: RealtimeTransport, P> {
    canvas: Canvas<R>,
    history: DiagramHistory,
    conversation: ConversationContext,
    dispatcher: ToolDispatcher<R>,
    connection: ConnectionManager<K, T>,
    notifications: NotificationCenter,
    preferences: P,
    context: Mutex<String>,
    events: EventBus,
}

impl<R, K, T, P> DiagramSession<R, K, T, P>
where
    R: DiagramRenderer,
    K: SessionTokenSource,
    T: RealtimeTransport,
    P: PreferenceStore,
{
    /// Assemble a session, restoring the persisted theme.
    pub async fn open(
        renderer: R,
        summarizer: ChangeSummarizer,
        tokens: K,
        transport: T,
        preferences: P,
        events: EventBus,
    ) -> Self {
        let theme = preferences.load_theme().await;
        let conversation = ConversationContext::new();
        let canvas = Canvas::new(renderer, theme, events.clone());
        let history = DiagramHistory::new(
            Arc::new(VersionStore::new(events.clone())),
            Arc::new(summarizer),
            conversation.clone(),
        );
        let dispatcher = ToolDispatcher::new(canvas.clone(), history.clone(), conversation.clone());

        Self {
            canvas,
            history,
            conversation,
            dispatcher,
            connection: ConnectionManager::new(tokens, transport, events.clone()),
            notifications: NotificationCenter::new(events.clone()),
            preferences,
            context: Mutex::new(String::new()),
            events,
        }
    }

    /// Render the starting diagram and record it as version 1.
    pub async fn initialize(&self, definition: &str) -> Result<VersionHandle, SessionError> {
        self.render_or_notify(definition).await?;
        Ok(self.history.append(definition, ""))
    }

    /// Submit the editor contents as a manual edit.
    ///
    /// A definition that does not render creates no version.
    pub async fn submit_edit(&self, definition: &str) -> Result<VersionHandle, SessionError> {
        self.render_or_notify(definition).await?;
        let handle = self.history.append(definition, "");
        self.send_text(&prompt::current_diagram_text(definition)).await;
        Ok(handle)
    }

    /// Put an earlier version back on screen. Never appends or mutates
    /// history.
    pub async fn restore_version(&self, id: VersionId) -> Result<String, SessionError> {
        let definition = match self.history.restore(id) {
            Ok(definition) => definition,
            Err(err) => {
                self.notifications.show(err.to_string());
                return Err(err.into());
            }
        };
        self.render_or_notify(&definition).await?;
        self.send_text(&prompt::current_diagram_text(&definition)).await;
        Ok(definition)
    }

    /// Replace the diagram with a built-in template, as a manual edit.
    pub async fn apply_template(&self, name: &str) -> Result<VersionHandle, SessionError> {
        let Some(template) = templates::find(name) else {
            let err = SessionError::UnknownTemplate(name.to_string());
            self.notifications.show(err.to_string());
            return Err(err);
        };
        self.submit_edit(template.definition).await
    }

    /// Replace the free-form context and share it with the assistant.
    pub async fn update_context(&self, context: &str) {
        *self.context.lock().expect("context lock poisoned") = context.to_string();
        let text = prompt::context_text(context);
        if !text.is_empty() {
            self.send_text(&text).await;
        }
    }

    /// Send a typed user message.
    pub async fn send_user_text(&self, text: &str) {
        self.send_text(text).await;
    }

    /// Route one raw inbound event from the conversation channel.
    ///
    /// Returns the dispatch outcome when the event was a tool invocation of
    /// a known capability; its result has already been sent back.
    pub async fn handle_server_event(&self, raw: &str) -> Option<DispatchOutcome> {
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring undecodable server event");
                return None;
            }
        };
        let event = match serde_json::from_value::<ServerEvent>(value.clone()) {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring malformed server event");
                return None;
            }
        };

        match event {
            ServerEvent::SessionUpdated => {
                tracing::debug!("Session configuration accepted");
                self.connection.mark_ready().await;
                None
            }
            ServerEvent::ContentPart { content } => {
                self.conversation.push_assistant_fragment(&content);
                None
            }
            ServerEvent::ContentDone => {
                let response = self.conversation.complete_response();
                tracing::debug!(chars = response.len(), "Assistant response complete");
                None
            }
            ServerEvent::FunctionCallArgumentsDone {
                name,
                arguments,
                call_id,
            } => {
                let outcome = self.dispatcher.dispatch(&name, &arguments, &call_id).await?;
                if let ToolResult::Failure { error } = &outcome.result {
                    self.notifications.show(error.clone());
                }
                if let Err(err) = self.connection.send(&outcome.reply()).await {
                    tracing::warn!(call_id = %call_id, error = %err, "Failed to return tool result");
                }
                Some(outcome)
            }
            ServerEvent::Error { .. } => {
                let pretty =
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string());
                self.notifications.show(pretty);
                None
            }
            ServerEvent::Other => None,
        }
    }

    /// Connect to the assistant and prime it with the session configuration
    /// and the current diagram.
    ///
    /// The status stays `Connecting` until the assistant answers with
    /// `session.updated`.
    pub async fn connect(&self) -> Result<(), SessionError> {
        match self.connection.connect().await {
            Ok(()) => {}
            // A disconnect or a newer attempt took over; nothing to report
            Err(TransportError::Cancelled) => return Err(TransportError::Cancelled.into()),
            Err(err) => {
                self.notifications.show(err.to_string());
                return Err(err.into());
            }
        }

        if let Err(err) = self.connection.send(&prompt::session_update()).await {
            tracing::warn!(error = %err, "Failed to send session configuration");
        }
        let context = self.context.lock().expect("context lock poisoned").clone();
        let opening = prompt::opening_text(&self.canvas.editor_text().await, &context);
        self.send_text(&opening).await;
        Ok(())
    }

    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
    }

    /// Disconnect when connected or connecting, reconnect when disconnected.
    pub async fn toggle_connection(&self) -> Result<ConnectionStatus, SessionError> {
        match self.connection.status().await {
            ConnectionStatus::Disconnected => self.connect().await?,
            ConnectionStatus::Connecting | ConnectionStatus::Connected => self.disconnect().await,
        }
        Ok(self.connection.status().await)
    }

    /// Mute or unmute the microphone. Returns the new state.
    pub async fn toggle_microphone(&self) -> Result<bool, SessionError> {
        self.connection.toggle_microphone().await.map_err(|err| {
            self.notifications.show(err.to_string());
            err.into()
        })
    }

    /// Flip the theme, persist it, and re-render the diagram with it.
    pub async fn toggle_theme(&self) -> Result<Theme, SessionError> {
        let theme = self.canvas.theme().await.toggled();
        if let Err(err) = self.preferences.save_theme(theme).await {
            tracing::warn!(error = %err, "Failed to persist theme");
        }
        self.events.publish(SessionEvent::ThemeChanged { theme });

        if let Err(err) = self.canvas.set_theme(theme).await {
            self.notifications.show(err.to_string());
            return Err(err.into());
        }
        Ok(theme)
    }

    pub fn dismiss_notification(&self) {
        self.notifications.dismiss();
    }

    /// Forget the last user query and any partial assistant response.
    pub fn reset_conversation(&self) {
        self.conversation.reset();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn versions(&self) -> Vec<VersionView> {
        self.history.views()
    }

    pub fn history(&self) -> &DiagramHistory {
        &self.history
    }

    pub fn canvas(&self) -> &Canvas<R> {
        &self.canvas
    }

    pub fn conversation(&self) -> &ConversationContext {
        &self.conversation
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub async fn connection_status(&self) -> ConnectionStatus {
        self.connection.status().await
    }

    async fn render_or_notify(&self, definition: &str) -> Result<String, SessionError> {
        self.canvas.apply(definition).await.map_err(|err| {
            self.notifications.show(err.to_string());
            err.into()
        })
    }

    /// Send user-role text, recording it as the last user query unless it is
    /// client-injected. Sending while disconnected is a silent no-op.
    async fn send_text(&self, text: &str) {
        self.conversation.record_user_text(text);
        match self.connection.send(&prompt::user_message(text)).await {
            Ok(()) => {}
            Err(TransportError::NotConnected) => {
                tracing::debug!("Not connected, message not sent");
            }
            Err(err) => self.notifications.show(err.to_string()),
        }
    }
}

//! Event types for the diagram session event bus.
//!
//! `SessionEvent` is the single event type broadcast to presentation
//! subscribers. All variants are Clone + Send + Sync for use with tokio
//! broadcast channels.

use serde::{Deserialize, Serialize};

use crate::realtime::ConnectionStatus;
use crate::theme::Theme;
use crate::version::VersionView;

/// Events emitted by a diagram session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The version history changed; carries the full, current list.
    HistoryChanged { versions: Vec<VersionView> },

    /// A definition was rendered successfully and is now on screen.
    DiagramRendered { definition: String, markup: String },

    /// A user-visible failure to show in the notification surface.
    Notification { message: String },

    /// The notification surface was dismissed.
    NotificationDismissed,

    /// The realtime connection changed state.
    ConnectionStatusChanged { status: ConnectionStatus },

    /// The microphone was muted or unmuted.
    MicrophoneToggled { enabled: bool },

    /// The display theme changed.
    ThemeChanged { theme: Theme },
}

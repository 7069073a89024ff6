use thiserror::Error;

use crate::version::VersionId;

/// Errors from version history lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("version #{0} not found")]
    NotFound(VersionId),

    #[error("version history is empty")]
    Empty,
}

/// Errors from rendering a diagram definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The definition is not valid diagram syntax. Carries the renderer's
    /// own message verbatim.
    #[error("{0}")]
    Syntax(String),

    /// The renderer itself could not run.
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
}

/// Errors from realtime connection setup and use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Failed to access microphone: {0}")]
    MediaUnavailable(String),

    #[error("failed to get /session from server: {0}")]
    TokenRequest(String),

    #[error("connection negotiation failed: {0}")]
    Negotiation(String),

    #[error("not connected")]
    NotConnected,

    /// A disconnect or a newer attempt replaced this one mid-negotiation.
    #[error("connection attempt cancelled")]
    Cancelled,

    #[error("send failed: {0}")]
    Send(String),
}

/// Errors while requesting a change summary.
///
/// Never shown to the user: the summarizer turns every one of these into a
/// fallback summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizeError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors persisting user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("failed to write preferences to {path}: {message}")]
    Write { path: String, message: String },

    #[error("failed to encode preferences: {0}")]
    Encode(String),
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no api key provided")]
    MissingApiKey,

    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_error_display() {
        assert_eq!(HistoryError::NotFound(VersionId(9)).to_string(), "version #9 not found");
        assert_eq!(HistoryError::Empty.to_string(), "version history is empty");
    }

    #[test]
    fn test_render_error_keeps_library_message() {
        let err = RenderError::Syntax("Parse error on line 2".to_string());
        assert_eq!(err.to_string(), "Parse error on line 2");
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::MediaUnavailable("Permission denied".to_string());
        assert_eq!(err.to_string(), "Failed to access microphone: Permission denied");
    }
}

//! Realtime assistant protocol types.
//!
//! Inbound [`ServerEvent`]s arrive on the conversation channel as JSON text
//! frames tagged by `type`. Outbound [`ClientEvent`]s configure the session,
//! submit user messages, and return tool results. Only the event types the
//! diagram session acts on are modelled; everything else parses as
//! [`ServerEvent::Other`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::llm::MessageRole;

/// Events received from the realtime assistant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// The session configuration was accepted.
    #[serde(rename = "session.updated")]
    SessionUpdated,

    /// A streamed fragment of assistant text.
    #[serde(rename = "response.message.content.part")]
    ContentPart {
        #[serde(default)]
        content: String,
    },

    /// The assistant finished its current message.
    #[serde(rename = "response.message.content.done")]
    ContentDone,

    /// A tool invocation is ready to execute.
    #[serde(rename = "response.function_call_arguments.done")]
    FunctionCallArgumentsDone {
        name: String,
        /// JSON-encoded argument object.
        #[serde(default)]
        arguments: String,
        call_id: String,
    },

    /// Generic protocol error.
    #[serde(rename = "error")]
    Error {
        #[serde(default)]
        error: serde_json::Value,
    },

    /// Any event type this client does not act on.
    #[serde(other)]
    Other,
}

/// Events sent to the realtime assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "session.update")]
    SessionUpdate { session: SessionConfig },

    #[serde(rename = "conversation.item.create")]
    ConversationItemCreate { item: ConversationItem },
}

/// Items appended to the assistant's conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationItem {
    Message {
        role: MessageRole,
        content: Vec<ContentPart>,
    },
    FunctionCallOutput {
        call_id: String,
        /// JSON-encoded tool result.
        output: String,
    },
}

/// Content of a conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    InputText { text: String },
}

/// Session configuration: behaviour instructions and the capability manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub modalities: Vec<String>,
    pub instructions: String,
    pub tools: Vec<ToolDefinition>,
}

/// A function the assistant may invoke, described with a JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Request body for minting an ephemeral realtime session upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealtimeSessionRequest {
    pub model: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modalities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_audio_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_audio_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_detection: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl RealtimeSessionRequest {
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Ephemeral credential authorizing one realtime handshake.
///
/// Returned to the browser by `GET /session`; only the model and the client
/// secret are passed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeSession {
    pub model: String,
    pub client_secret: ClientSecret,
}

/// Short-lived bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecret {
    pub value: String,
    #[serde(default)]
    pub expires_at: i64,
}

// The token value is a credential; keep it out of logs.
impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecret")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Lifecycle state of the realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

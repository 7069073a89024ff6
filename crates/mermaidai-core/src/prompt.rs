//! Outbound assistant messages: session configuration and the text the
//! client injects on the user's behalf.

use mermaidai_types::llm::MessageRole;
use mermaidai_types::realtime::{ClientEvent, ContentPart, ConversationItem, SessionConfig};

use crate::conversation::{CONTEXT_PREFIX, CURRENT_DIAGRAM_PREFIX};
use crate::dispatch::{Capability, ToolResult};

/// Behavioural instructions sent with the session configuration.
pub const INSTRUCTIONS: &str = "\
You are a helpful assistant.
You are an expert in writing mermaid diagrams.
When you speak, it is brief and to the point.
You only speak when asked a direct question.
You do not explain your actions unless asked.
Stay quiet unless explicitly asked to speak.
If you encounter an error with tool use, fix the problem described in the error and try again.
After several failed tool use attempts request help from the user.";

/// `session.update` carrying the instructions and the tool manifest.
pub fn session_update() -> ClientEvent {
    ClientEvent::SessionUpdate {
        session: SessionConfig {
            modalities: vec!["text".to_string(), "audio".to_string()],
            instructions: INSTRUCTIONS.to_string(),
            tools: Capability::manifest(),
        },
    }
}

/// Message telling the assistant what the diagram currently looks like.
pub fn current_diagram_text(definition: &str) -> String {
    format!(
        "{CURRENT_DIAGRAM_PREFIX} definition\n```\n{definition}\n```\n\
         Please do not respond, but keep the current state in mind going forward"
    )
}

/// Message carrying free-form user context. Empty when there is none.
pub fn context_text(context: &str) -> String {
    if context.trim().is_empty() {
        return String::new();
    }
    format!("{CONTEXT_PREFIX}\n{context}\nPlease do no reply to this message")
}

/// First message after the channel opens: diagram state plus context.
pub fn opening_text(definition: &str, context: &str) -> String {
    format!("{}\n{}", current_diagram_text(definition), context_text(context))
}

/// User-role text message.
pub fn user_message(text: impl Into<String>) -> ClientEvent {
    ClientEvent::ConversationItemCreate {
        item: ConversationItem::Message {
            role: MessageRole::User,
            content: vec![ContentPart::InputText { text: text.into() }],
        },
    }
}

/// Tool result correlated with the invocation's call id.
pub fn function_output(call_id: impl Into<String>, result: &ToolResult) -> ClientEvent {
    ClientEvent::ConversationItemCreate {
        item: ConversationItem::FunctionCallOutput {
            call_id: call_id.into(),
            output: result.to_json(),
        },
    }
}

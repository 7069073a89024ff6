//! Conversation state shared by the dispatcher and the summarizer.
//!
//! Tracks the most recent user utterance (used to attribute edits) and the
//! assistant text currently being streamed. The state survives reconnects;
//! only [`ConversationContext::reset`] clears it.

use std::sync::{Arc, Mutex};

/// Prefix of the system-injected context message.
pub const CONTEXT_PREFIX: &str = "Additional Context:";

/// Prefix of the system-injected current-diagram message.
pub const CURRENT_DIAGRAM_PREFIX: &str = "Here is the current diagram";

/// Plain conversation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    pub last_user_query: String,
    pub last_assistant_response: String,
}

/// Whether a user-role message was injected by the client rather than typed
/// or spoken by the user.
pub fn is_system_injected(text: &str) -> bool {
    text.starts_with(CONTEXT_PREFIX) || text.starts_with(CURRENT_DIAGRAM_PREFIX)
}

/// Cloneable handle to the single conversation state of a session.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    inner: Arc<Mutex<ConversationState>>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record text sent on the user's behalf.
    ///
    /// Returns `true` when it became the new last user query. Injected
    /// context and diagram-state messages are ignored.
    pub fn record_user_text(&self, text: &str) -> bool {
        if is_system_injected(text) {
            return false;
        }
        self.inner
            .lock()
            .expect("conversation lock poisoned")
            .last_user_query = text.to_string();
        true
    }

    /// Append a streamed assistant fragment.
    pub fn push_assistant_fragment(&self, fragment: &str) {
        self.inner
            .lock()
            .expect("conversation lock poisoned")
            .last_assistant_response
            .push_str(fragment);
    }

    /// Finish the current assistant response, returning the accumulated text
    /// and clearing the accumulator.
    pub fn complete_response(&self) -> String {
        let mut state = self.inner.lock().expect("conversation lock poisoned");
        std::mem::take(&mut state.last_assistant_response)
    }

    /// Snapshot of the last user query.
    pub fn last_user_query(&self) -> String {
        self.inner
            .lock()
            .expect("conversation lock poisoned")
            .last_user_query
            .clone()
    }

    pub fn snapshot(&self) -> ConversationState {
        self.inner.lock().expect("conversation lock poisoned").clone()
    }

    /// Clear both fields.
    pub fn reset(&self) {
        *self.inner.lock().expect("conversation lock poisoned") = ConversationState::default();
    }
}

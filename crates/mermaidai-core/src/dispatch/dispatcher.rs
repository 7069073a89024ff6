//! ToolDispatcher: executes capability invocations from the assistant.
//!
//! Every registered invocation produces a result, success or failure, that
//! the caller sends back correlated by call id. Unknown capability names are
//! protocol noise and produce nothing.

use mermaidai_types::realtime::ClientEvent;
use serde_json::json;

use super::capability::{Capability, ToolCall, UpdateDefinitionArgs};
use crate::conversation::ConversationContext;
use crate::history::{DiagramHistory, VersionHandle};
use crate::prompt::function_output;
use crate::render::{Canvas, DiagramRenderer};

/// Payload returned to the assistant for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResult {
    Success { new_definition: String },
    Failure { error: String },
}

impl ToolResult {
    pub fn success(new_definition: impl Into<String>) -> Self {
        Self::Success {
            new_definition: new_definition.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Failure {
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// `{"success": true, "newDefinition": ...}` or `{"error": ...}`.
    pub fn to_json(&self) -> String {
        match self {
            Self::Success { new_definition } => {
                json!({"success": true, "newDefinition": new_definition})
            }
            Self::Failure { error } => json!({"error": error}),
        }
        .to_string()
    }
}

/// What a dispatched invocation produced.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub call_id: String,
    pub result: ToolResult,
    /// The version appended by a successful edit.
    pub version: Option<VersionHandle>,
}

impl DispatchOutcome {
    /// The `function_call_output` event to send back.
    pub fn reply(&self) -> ClientEvent {
        function_output(self.call_id.clone(), &self.result)
    }
}

/// Routes capability invocations to their handlers.
pub struct ToolDispatcher<R> {
    canvas: Canvas<R>,
    history: DiagramHistory,
    conversation: ConversationContext,
}

impl<R: DiagramRenderer> ToolDispatcher<R> {
    pub fn new(canvas: Canvas<R>, history: DiagramHistory, conversation: ConversationContext) -> Self {
        Self {
            canvas,
            history,
            conversation,
        }
    }

    /// Execute one invocation.
    ///
    /// Returns `None` only for unknown capability names.
    #[tracing::instrument(
        name = "dispatch_tool_call",
        skip_all,
        fields(capability = %name, call_id = %call_id)
    )]
    pub async fn dispatch(&self, name: &str, arguments: &str, call_id: &str) -> Option<DispatchOutcome> {
        let Some(capability) = Capability::from_name(name) else {
            tracing::debug!(capability = name, "Ignoring unknown capability");
            return None;
        };

        let (result, version) = match capability.parse_call(arguments) {
            Ok(call) => self.execute(call).await,
            Err(err) => {
                tracing::warn!(error = %err, "Tool call has invalid arguments");
                (ToolResult::error(format!("invalid arguments: {err}")), None)
            }
        };

        Some(DispatchOutcome {
            call_id: call_id.to_string(),
            result,
            version,
        })
    }

    async fn execute(&self, call: ToolCall) -> (ToolResult, Option<VersionHandle>) {
        match call {
            ToolCall::UpdateMermaidDefinition(UpdateDefinitionArgs { definition }) => {
                match self.canvas.apply(&definition).await {
                    Ok(_) => {
                        // The history schedules the summary; nothing else does.
                        let query = self.conversation.last_user_query();
                        let handle = self.history.append(&definition, &query);
                        (ToolResult::success(definition), Some(handle))
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "Tool definition failed to render");
                        (ToolResult::error(err.to_string()), None)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mermaidai_types::error::{RenderError, SummarizeError};
    use mermaidai_types::llm::{ChatCompletion, ChatRequest};
    use mermaidai_types::theme::Theme;
    use mermaidai_types::version::VersionId;

    use super::*;
    use crate::event::EventBus;
    use crate::history::VersionStore;
    use crate::summary::{BoxSummaryBackend, ChangeSummarizer, SummaryBackend};

    struct FakeRenderer;

    impl DiagramRenderer for FakeRenderer {
        fn render(
            &self,
            definition: &str,
            _theme: Theme,
        ) -> impl Future<Output = Result<String, RenderError>> + Send {
            let result = if definition.contains("<invalid>") {
                Err(RenderError::Syntax("Parse error on line 1:\n<invalid>".to_string()))
            } else {
                Ok(format!("<svg>{definition}</svg>"))
            };
            async move { result }
        }
    }

    struct CountingBackend {
        calls: Arc<AtomicUsize>,
    }

    impl SummaryBackend for CountingBackend {
        fn complete(
            &self,
            _request: &ChatRequest,
        ) -> impl Future<Output = Result<ChatCompletion, SummarizeError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async { Err(SummarizeError::Transport("offline".to_string())) }
        }
    }

    struct Fixture {
        dispatcher: ToolDispatcher<FakeRenderer>,
        history: DiagramHistory,
        canvas: Canvas<FakeRenderer>,
        conversation: ConversationContext,
        calls: Arc<AtomicUsize>,
    }

    fn fixture() -> Fixture {
        let bus = EventBus::new(64);
        let calls = Arc::new(AtomicUsize::new(0));
        let conversation = ConversationContext::new();
        let summarizer = ChangeSummarizer::new(
            BoxSummaryBackend::new(CountingBackend {
                calls: calls.clone(),
            }),
            "gpt-3.5-turbo",
        );
        let history = DiagramHistory::new(
            Arc::new(VersionStore::new(bus.clone())),
            Arc::new(summarizer),
            conversation.clone(),
        );
        let canvas = Canvas::new(FakeRenderer, Theme::Light, bus);
        Fixture {
            dispatcher: ToolDispatcher::new(canvas.clone(), history.clone(), conversation.clone()),
            history,
            canvas,
            conversation,
            calls,
        }
    }

    #[tokio::test]
    async fn test_successful_update_renders_and_appends() {
        let f = fixture();
        f.conversation.record_user_text("add a queue");
        f.history.append("graph TD", "");

        let outcome = f
            .dispatcher
            .dispatch(
                "updateMermaidDefinition",
                r#"{"definition":"graph TD\nA-->Q"}"#,
                "call_1",
            )
            .await
            .unwrap();

        assert_eq!(outcome.call_id, "call_1");
        assert_eq!(outcome.result, ToolResult::success("graph TD\nA-->Q"));
        let id = outcome.version.unwrap().settled().await;
        assert_eq!(id, VersionId(2));

        let version = f.history.get(id).unwrap();
        assert_eq!(version.query(), "add a queue");
        assert!(version.summary().is_some());
        assert_eq!(f.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            f.canvas.current_definition().await.as_deref(),
            Some("graph TD\nA-->Q")
        );
    }

    #[tokio::test]
    async fn test_invalid_definition_returns_error_without_version() {
        let f = fixture();
        f.history.append("graph TD", "");

        let outcome = f
            .dispatcher
            .dispatch("updateMermaidDefinition", r#"{"definition":"<invalid>"}"#, "call_2")
            .await
            .unwrap();

        assert_eq!(
            outcome.result,
            ToolResult::error("Parse error on line 1:\n<invalid>")
        );
        assert!(outcome.version.is_none());
        assert_eq!(f.history.len(), 1);
        assert_eq!(f.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_arguments_return_error() {
        let f = fixture();
        let outcome = f
            .dispatcher
            .dispatch("updateMermaidDefinition", "not json", "call_3")
            .await
            .unwrap();

        match outcome.result {
            ToolResult::Failure { error } => assert!(error.starts_with("invalid arguments")),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(f.history.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_capability_is_silently_dropped() {
        let f = fixture();
        let outcome = f.dispatcher.dispatch("deleteDiagram", "{}", "call_4").await;
        assert!(outcome.is_none());
        assert!(f.history.is_empty());
    }

    #[tokio::test]
    async fn test_reply_is_correlated_by_call_id() {
        let f = fixture();
        let outcome = f
            .dispatcher
            .dispatch("updateMermaidDefinition", r#"{"definition":"graph LR"}"#, "call_5")
            .await
            .unwrap();

        let json = serde_json::to_value(outcome.reply()).unwrap();
        assert_eq!(json["item"]["call_id"], "call_5");
        let output: serde_json::Value =
            serde_json::from_str(json["item"]["output"].as_str().unwrap()).unwrap();
        assert_eq!(
            output,
            serde_json::json!({"success": true, "newDefinition": "graph LR"})
        );
    }
}

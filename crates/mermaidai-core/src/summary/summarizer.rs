//! Change summarizer for diagram edits.
//!
//! `ChangeSummarizer` asks a remote completion service for a terse,
//! two-part description of an edit (the user's intent and the technical
//! change) and writes it onto the version that triggered it. It is
//! best-effort: every failure resolves into a deterministic fallback so the
//! history never shows a permanently blank annotation.

use mermaidai_types::llm::{ChatMessage, ChatRequest};
use mermaidai_types::version::{ChangeSummary, VersionId};

use super::backend::BoxSummaryBackend;
use crate::history::store::VersionStore;

/// System prompt for the summarization call.
const SUMMARY_SYSTEM_PROMPT: &str = "You are a diagram change analyzer. Provide brief, focused summaries of changes to sequence diagrams.";

pub const UNCHANGED_INTENT: &str = "No changes made";
pub const UNCHANGED_CHANGES: &str = "Diagram unchanged";
pub const PARSE_ERROR_INTENT: &str = "Parse error";
pub const PARSE_ERROR_CHANGES: &str = "See changes in diagram";
pub const FALLBACK_CHANGES: &str = "Compare diagrams manually";

/// Number of characters of the user query kept in a fallback summary.
const QUERY_PREVIEW_CHARS: usize = 50;

/// Everything one summarization needs, captured when the version is created.
///
/// Each job is closed over its own snapshot, so concurrent jobs never read
/// each other's state and later edits cannot change what a job compares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryJob {
    pub version_id: VersionId,
    pub old_definition: String,
    pub new_definition: String,
    /// Last known user utterance at trigger time.
    pub user_query: String,
}

/// Produces change summaries through a [`BoxSummaryBackend`].
#[derive(Debug)]
pub struct ChangeSummarizer {
    backend: BoxSummaryBackend,
    model: String,
}

impl ChangeSummarizer {
    pub fn new(backend: BoxSummaryBackend, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the completion request for a job.
    pub fn build_request(&self, job: &SummaryJob) -> ChatRequest {
        let prompt = format!(
            r#"Summarize this diagram change in two parts:
1. User's intent: "{query}"
2. Technical changes made (compare):

Previous:
{old}

Current:
{new}

Respond in JSON format:
{{
  "userIntent": "2-3 word summary of user request",
  "technicalChanges": "2-3 word summary of actual changes"
}}"#,
            query = job.user_query,
            old = job.old_definition,
            new = job.new_definition,
        );

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ],
        }
    }

    /// Summarize one edit. Never fails.
    ///
    /// Identical definitions short-circuit without a network call.
    #[tracing::instrument(
        name = "summarize_change",
        skip(self, job),
        fields(version_id = %job.version_id, model = %self.model)
    )]
    pub async fn summarize(&self, job: &SummaryJob) -> ChangeSummary {
        if job.old_definition == job.new_definition {
            return ChangeSummary::new(UNCHANGED_INTENT, UNCHANGED_CHANGES);
        }

        let request = self.build_request(job);
        match self.backend.complete(&request).await {
            Ok(completion) => match completion.first_content() {
                Some(content) => parse_summary(content),
                None => {
                    tracing::warn!("Completion has no message content, using fallback summary");
                    fallback_summary(&job.user_query)
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "Failed to get summary, using fallback summary");
                fallback_summary(&job.user_query)
            }
        }
    }

    /// Summarize one edit and write the result onto its own version.
    ///
    /// The store refreshes its presentation on attach, whichever path
    /// produced the summary.
    pub async fn summarize_into(&self, store: &VersionStore, job: SummaryJob) {
        let summary = self.summarize(&job).await;
        if let Err(err) = store.attach_summary(job.version_id, summary) {
            tracing::debug!(error = %err, "Summary not attached");
        }
    }
}

/// Parse the model's answer.
///
/// Expects a JSON object with `userIntent` and `technicalChanges`. Anything
/// else degrades to "first line / second line" of the raw text, with fixed
/// placeholders for missing lines.
pub fn parse_summary(content: &str) -> ChangeSummary {
    if let Ok(summary) = serde_json::from_str::<ChangeSummary>(content) {
        return summary;
    }

    tracing::debug!("Summary is not valid JSON, falling back to raw lines");
    let mut lines = content.split('\n').map(str::trim);
    let user_intent = lines
        .next()
        .filter(|line| !line.is_empty())
        .unwrap_or(PARSE_ERROR_INTENT);
    let technical_changes = lines
        .next()
        .filter(|line| !line.is_empty())
        .unwrap_or(PARSE_ERROR_CHANGES);

    ChangeSummary::new(user_intent, technical_changes)
}

/// Summary used when the completion service could not be reached or
/// answered with something unusable.
pub fn fallback_summary(user_query: &str) -> ChangeSummary {
    let preview: String = user_query.chars().take(QUERY_PREVIEW_CHARS).collect();
    ChangeSummary::new(format!("{preview}..."), FALLBACK_CHANGES)
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use mermaidai_types::error::SummarizeError;
    use mermaidai_types::llm::{ChatChoice, ChatCompletion, ChoiceMessage, MessageRole};

    use super::*;
    use crate::event::EventBus;
    use crate::summary::backend::SummaryBackend;

    #[derive(Clone)]
    enum Reply {
        Content(String),
        NoChoices,
        Fail(SummarizeError),
    }

    struct ScriptedBackend {
        reply: Reply,
        calls: Arc<AtomicUsize>,
        last_request: Arc<Mutex<Option<ChatRequest>>>,
    }

    impl ScriptedBackend {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Arc::new(AtomicUsize::new(0)),
                last_request: Arc::new(Mutex::new(None)),
            }
        }
    }

    impl SummaryBackend for ScriptedBackend {
        fn complete(
            &self,
            request: &ChatRequest,
        ) -> impl Future<Output = Result<ChatCompletion, SummarizeError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            let reply = self.reply.clone();
            async move {
                match reply {
                    Reply::Content(content) => Ok(ChatCompletion {
                        choices: vec![ChatChoice {
                            index: 0,
                            message: Some(ChoiceMessage {
                                role: "assistant".to_string(),
                                content,
                            }),
                            finish_reason: Some("stop".to_string()),
                        }],
                        ..Default::default()
                    }),
                    Reply::NoChoices => Ok(ChatCompletion::default()),
                    Reply::Fail(err) => Err(err),
                }
            }
        }
    }

    fn summarizer(reply: Reply) -> (ChangeSummarizer, Arc<AtomicUsize>, Arc<Mutex<Option<ChatRequest>>>) {
        let backend = ScriptedBackend::new(reply);
        let calls = backend.calls.clone();
        let last = backend.last_request.clone();
        (
            ChangeSummarizer::new(BoxSummaryBackend::new(backend), "gpt-3.5-turbo"),
            calls,
            last,
        )
    }

    fn job(old: &str, new: &str) -> SummaryJob {
        SummaryJob {
            version_id: VersionId(2),
            old_definition: old.to_string(),
            new_definition: new.to_string(),
            user_query: "add a database participant".to_string(),
        }
    }

    #[tokio::test]
    async fn test_identical_definitions_skip_network() {
        let (summarizer, calls, _) = summarizer(Reply::Content("unused".to_string()));
        let summary = summarizer.summarize(&job("graph TD", "graph TD")).await;
        assert_eq!(summary, ChangeSummary::new("No changes made", "Diagram unchanged"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_structured_answer_is_used() {
        let (summarizer, calls, _) = summarizer(Reply::Content(
            r#"{"userIntent": "Add database", "technicalChanges": "New participant"}"#.to_string(),
        ));
        let summary = summarizer.summarize(&job("graph TD", "graph LR")).await;
        assert_eq!(summary, ChangeSummary::new("Add database", "New participant"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_free_text_answer_uses_first_two_lines() {
        let (summarizer, _, _) =
            summarizer(Reply::Content("Add database\nNew participant C\nextra".to_string()));
        let summary = summarizer.summarize(&job("a", "b")).await;
        assert_eq!(summary, ChangeSummary::new("Add database", "New participant C"));
    }

    #[tokio::test]
    async fn test_single_line_answer_gets_placeholder_second_line() {
        let (summarizer, _, _) = summarizer(Reply::Content("Only one line".to_string()));
        let summary = summarizer.summarize(&job("a", "b")).await;
        assert_eq!(summary, ChangeSummary::new("Only one line", "See changes in diagram"));
    }

    #[tokio::test]
    async fn test_empty_answer_gets_both_placeholders() {
        let (summarizer, _, _) = summarizer(Reply::Content(String::new()));
        let summary = summarizer.summarize(&job("a", "b")).await;
        assert_eq!(summary, ChangeSummary::new("Parse error", "See changes in diagram"));
    }

    #[tokio::test]
    async fn test_json_missing_a_field_degrades_to_lines() {
        let (summarizer, _, _) = summarizer(Reply::Content(r#"{"userIntent": "x"}"#.to_string()));
        let summary = summarizer.summarize(&job("a", "b")).await;
        assert_eq!(summary.user_intent, r#"{"userIntent": "x"}"#);
        assert_eq!(summary.technical_changes, "See changes in diagram");
    }

    #[tokio::test]
    async fn test_transport_failure_uses_query_fallback() {
        let (summarizer, _, _) = summarizer(Reply::Fail(SummarizeError::Status(500)));
        let summary = summarizer.summarize(&job("a", "b")).await;
        assert_eq!(
            summary,
            ChangeSummary::new("add a database participant...", "Compare diagrams manually")
        );
    }

    #[tokio::test]
    async fn test_malformed_outer_response_uses_query_fallback() {
        let (summarizer, _, _) = summarizer(Reply::NoChoices);
        let summary = summarizer.summarize(&job("a", "b")).await;
        assert_eq!(summary.technical_changes, "Compare diagrams manually");
    }

    #[test]
    fn test_fallback_truncates_query_to_fifty_chars() {
        let long = "é".repeat(80);
        let summary = fallback_summary(&long);
        assert_eq!(summary.user_intent.chars().count(), 53);
        assert!(summary.user_intent.ends_with("..."));

        assert_eq!(fallback_summary("").user_intent, "...");
    }

    #[tokio::test]
    async fn test_request_carries_query_and_both_definitions() {
        let (summarizer, _, last) =
            summarizer(Reply::Content(r#"{"userIntent":"a","technicalChanges":"b"}"#.to_string()));
        summarizer
            .summarize(&job("sequenceDiagram\nA->>B: x", "sequenceDiagram\nA->>C: y"))
            .await;

        let request = last.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        let prompt = &request.messages[1].content;
        assert!(prompt.contains("User's intent: \"add a database participant\""));
        assert!(prompt.contains("Previous:\nsequenceDiagram\nA->>B: x"));
        assert!(prompt.contains("Current:\nsequenceDiagram\nA->>C: y"));
        assert!(prompt.contains("\"technicalChanges\""));
    }

    #[tokio::test]
    async fn test_summarize_into_writes_only_its_own_version() {
        let store = VersionStore::new(EventBus::new(16));
        store.push("a", "");
        store.push("b", "");
        let (summarizer, _, _) = summarizer(Reply::Fail(SummarizeError::Transport(
            "connection refused".to_string(),
        )));

        summarizer.summarize_into(&store, job("a", "b")).await;

        assert!(store.get(VersionId(1)).unwrap().summary().is_none());
        let summary = store.get(VersionId(2)).unwrap().summary().cloned().unwrap();
        assert_eq!(summary.technical_changes, "Compare diagrams manually");
    }

    #[tokio::test]
    async fn test_summarize_into_unknown_version_leaves_store_untouched() {
        let store = VersionStore::new(EventBus::new(16));
        store.push("a", "");
        let (summarizer, _, _) = summarizer(Reply::Fail(SummarizeError::Status(500)));

        summarizer.summarize_into(&store, job("a", "b")).await;

        assert_eq!(store.len(), 1);
        assert!(store.get(VersionId(1)).unwrap().summary().is_none());
    }
}

//! DiagramHistory: append a version, then summarize it.
//!
//! This is the only place summaries are triggered. The first version of a
//! history gets a locally computed description; every later append spawns a
//! single background summarization comparing it to its immediate
//! predecessor. Callers never wait for the summary unless they ask to via
//! [`VersionHandle::settled`].

use std::sync::Arc;

use mermaidai_types::error::HistoryError;
use mermaidai_types::version::{DiagramVersion, VersionId, VersionView};
use tokio::task::JoinHandle;

use super::store::VersionStore;
use crate::conversation::ConversationContext;
use crate::summary::initial::initial_summary;
use crate::summary::{ChangeSummarizer, SummaryJob};

/// Result of an append: the new id and the in-flight summary task, if any.
#[derive(Debug)]
pub struct VersionHandle {
    pub id: VersionId,
    pending: Option<JoinHandle<()>>,
}

impl VersionHandle {
    /// Whether a background summarization was scheduled for this version.
    pub fn is_summarizing(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for this version's summary to be attached.
    pub async fn settled(self) -> VersionId {
        if let Some(task) = self.pending
            && let Err(err) = task.await
        {
            tracing::warn!(version_id = %self.id, error = %err, "Summary task did not finish");
        }
        self.id
    }
}

/// Version history with automatic change summarization.
#[derive(Debug, Clone)]
pub struct DiagramHistory {
    store: Arc<VersionStore>,
    summarizer: Arc<ChangeSummarizer>,
    conversation: ConversationContext,
}

impl DiagramHistory {
    pub fn new(
        store: Arc<VersionStore>,
        summarizer: Arc<ChangeSummarizer>,
        conversation: ConversationContext,
    ) -> Self {
        Self {
            store,
            summarizer,
            conversation,
        }
    }

    /// Append a version and schedule its summary.
    ///
    /// Must be called inside a tokio runtime when the history is non-empty.
    pub fn append(&self, definition: &str, query: &str) -> VersionHandle {
        let appended = self.store.push(definition, query);
        let id = appended.version.id();

        match appended.predecessor {
            None => {
                // First version: described locally, no network.
                let attached = self.store.attach_summary(id, initial_summary(definition));
                debug_assert!(attached.is_ok(), "version {id} vanished right after push");
                VersionHandle { id, pending: None }
            }
            Some(old_definition) => {
                let job = SummaryJob {
                    version_id: id,
                    old_definition,
                    new_definition: definition.to_string(),
                    user_query: self.conversation.last_user_query(),
                };
                let store = Arc::clone(&self.store);
                let summarizer = Arc::clone(&self.summarizer);
                let task = tokio::spawn(async move {
                    summarizer.summarize_into(&store, job).await;
                });
                VersionHandle {
                    id,
                    pending: Some(task),
                }
            }
        }
    }

    pub fn get(&self, id: VersionId) -> Result<DiagramVersion, HistoryError> {
        self.store.get(id)
    }

    pub fn latest(&self) -> Result<DiagramVersion, HistoryError> {
        self.store.latest()
    }

    pub fn restore(&self, id: VersionId) -> Result<String, HistoryError> {
        self.store.restore(id)
    }

    pub fn views(&self) -> Vec<VersionView> {
        self.store.views()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn store(&self) -> &Arc<VersionStore> {
        &self.store
    }
}

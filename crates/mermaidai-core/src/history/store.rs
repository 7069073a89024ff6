//! Append-only store of diagram versions.
//!
//! `VersionStore` owns the ordered log. Ids are assigned here and only here,
//! so they always form the gap-free sequence `1..=N` in append order. After
//! every mutation the full, current list is published on the event bus.

use std::sync::RwLock;

use mermaidai_types::error::HistoryError;
use mermaidai_types::event::SessionEvent;
use mermaidai_types::version::{ChangeSummary, DiagramVersion, VersionId, VersionView};

use crate::event::EventBus;

/// A freshly appended version together with the definition it replaced.
#[derive(Debug, Clone)]
pub struct Appended {
    pub version: DiagramVersion,
    /// Definition of the immediately preceding version, `None` when the
    /// store was empty before this append.
    pub predecessor: Option<String>,
}

/// Thread-safe, append-only version log.
#[derive(Debug)]
pub struct VersionStore {
    versions: RwLock<Vec<DiagramVersion>>,
    events: EventBus,
}

impl VersionStore {
    pub fn new(events: EventBus) -> Self {
        Self {
            versions: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Append a new version with the next sequential id.
    ///
    /// Id assignment and predecessor capture happen under one write lock, so
    /// concurrent appends can never share an id or see the wrong predecessor.
    pub fn push(&self, definition: &str, query: &str) -> Appended {
        let appended = {
            let mut versions = self.versions.write().expect("version store lock poisoned");
            let id = VersionId(versions.len() as u64 + 1);
            let predecessor = versions.last().map(|v| v.definition().to_string());
            let version = DiagramVersion::new(id, definition, query);
            versions.push(version.clone());
            Appended {
                version,
                predecessor,
            }
        };

        tracing::debug!(version_id = %appended.version.id(), "Appended diagram version");
        self.refresh();
        appended
    }

    /// Look up a version by id.
    pub fn get(&self, id: VersionId) -> Result<DiagramVersion, HistoryError> {
        let versions = self.versions.read().expect("version store lock poisoned");
        index_of(id, versions.len())
            .map(|idx| versions[idx].clone())
            .ok_or(HistoryError::NotFound(id))
    }

    /// The most recently appended version.
    pub fn latest(&self) -> Result<DiagramVersion, HistoryError> {
        let versions = self.versions.read().expect("version store lock poisoned");
        versions.last().cloned().ok_or(HistoryError::Empty)
    }

    /// Definition text of a version, for restoring it into the editor.
    ///
    /// Never mutates the store.
    pub fn restore(&self, id: VersionId) -> Result<String, HistoryError> {
        self.get(id).map(|v| v.definition().to_string())
    }

    /// Set the summary of one version.
    ///
    /// Targets exactly one entry by id. Re-attaching overwrites (last write
    /// wins). An unknown id is logged and reported, never a panic. The
    /// presentation is refreshed either way.
    pub fn attach_summary(&self, id: VersionId, summary: ChangeSummary) -> Result<(), HistoryError> {
        let result = {
            let mut versions = self.versions.write().expect("version store lock poisoned");
            match index_of(id, versions.len()) {
                Some(idx) => {
                    versions[idx].attach_summary(summary);
                    Ok(())
                }
                None => Err(HistoryError::NotFound(id)),
            }
        };

        if let Err(err) = &result {
            tracing::warn!(version_id = %id, error = %err, "Dropping summary for unknown version");
        }
        self.refresh();
        result
    }

    /// Number of versions in the store.
    pub fn len(&self) -> usize {
        self.versions.read().expect("version store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every version in append order.
    pub fn versions(&self) -> Vec<DiagramVersion> {
        self.versions.read().expect("version store lock poisoned").clone()
    }

    /// Presentation rows for every version in append order.
    pub fn views(&self) -> Vec<VersionView> {
        self.versions
            .read()
            .expect("version store lock poisoned")
            .iter()
            .map(VersionView::from)
            .collect()
    }

    /// Publish the full, current list to presentation subscribers.
    ///
    /// The list is read at publish time, so a refresh triggered by a late
    /// summary still reflects every append that happened meanwhile.
    pub fn refresh(&self) {
        self.events.publish(SessionEvent::HistoryChanged {
            versions: self.views(),
        });
    }
}

/// Position of `id` in a gap-free `1..=len` sequence.
fn index_of(id: VersionId, len: usize) -> Option<usize> {
    let idx = usize::try_from(id.0).ok()?.checked_sub(1)?;
    (idx < len).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> VersionStore {
        VersionStore::new(EventBus::new(64))
    }

    #[test]
    fn test_ids_are_sequential_from_one() {
        let store = store();
        let ids: Vec<u64> = (0..5)
            .map(|i| store.push(&format!("graph TD\nA{i}"), "").version.id().0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_push_reports_predecessor() {
        let store = store();
        let first = store.push("graph TD\nA", "");
        assert!(first.predecessor.is_none());

        let second = store.push("graph TD\nA-->B", "connect");
        assert_eq!(second.predecessor.as_deref(), Some("graph TD\nA"));
        assert_eq!(second.version.query(), "connect");
    }

    #[test]
    fn test_get_and_latest() {
        let store = store();
        assert_eq!(store.latest().unwrap_err(), HistoryError::Empty);

        store.push("one", "");
        store.push("two", "");
        assert_eq!(store.get(VersionId(1)).unwrap().definition(), "one");
        assert_eq!(store.latest().unwrap().definition(), "two");
        assert_eq!(
            store.get(VersionId(3)).unwrap_err(),
            HistoryError::NotFound(VersionId(3))
        );
        assert_eq!(
            store.get(VersionId(0)).unwrap_err(),
            HistoryError::NotFound(VersionId(0))
        );
    }

    #[test]
    fn test_restore_returns_definition_without_mutation() {
        let store = store();
        store.push("one", "");
        store.push("two", "");

        assert_eq!(store.restore(VersionId(1)).unwrap(), "one");
        assert_eq!(
            store.restore(VersionId(7)).unwrap_err(),
            HistoryError::NotFound(VersionId(7))
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.latest().unwrap().definition(), "two");
    }

    #[test]
    fn test_attach_summary_targets_single_entry() {
        let store = store();
        store.push("one", "");
        store.push("two", "");

        store
            .attach_summary(VersionId(2), ChangeSummary::new("Edit", "Changed"))
            .unwrap();

        assert!(store.get(VersionId(1)).unwrap().summary().is_none());
        assert_eq!(
            store.get(VersionId(2)).unwrap().summary().unwrap().user_intent,
            "Edit"
        );
    }

    #[test]
    fn test_attach_summary_to_unknown_id_is_tolerated() {
        let store = store();
        store.push("one", "");
        let result = store.attach_summary(VersionId(5), ChangeSummary::new("x", "y"));
        assert_eq!(result.unwrap_err(), HistoryError::NotFound(VersionId(5)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_every_mutation_publishes_full_list() {
        let bus = EventBus::new(64);
        let mut rx = bus.subscribe();
        let store = VersionStore::new(bus);

        store.push("one", "");
        store.push("two", "");
        store
            .attach_summary(VersionId(1), ChangeSummary::new("Initial", "Flow"))
            .unwrap();

        let mut snapshots = Vec::new();
        while let Ok(SessionEvent::HistoryChanged { versions }) = rx.try_recv() {
            snapshots.push(versions);
        }
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].len(), 1);
        assert_eq!(snapshots[1].len(), 2);
        // The summary refresh still lists both versions
        assert_eq!(snapshots[2].len(), 2);
        assert!(!snapshots[2][0].pending);
        assert!(snapshots[2][1].pending);
    }
}

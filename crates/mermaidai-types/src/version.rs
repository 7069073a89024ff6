//! Diagram version history types.
//!
//! A [`DiagramVersion`] is one immutable snapshot of a diagram definition.
//! Only its [`ChangeSummary`] is filled in after creation, once the change
//! summarizer resolves.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::diagram::derive_identifier;

/// Placeholder shown for a version whose summary has not resolved yet.
pub const PENDING_SUMMARY_LABEL: &str = "Analyzing changes...";

/// Sequential, 1-based identifier of a version within one history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(pub u64);

impl VersionId {
    /// The id of the first version ever appended to a history.
    pub const FIRST: VersionId = VersionId(1);

    /// The id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VersionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().trim_start_matches('#').parse()?))
    }
}

/// Two-part description of a diagram edit.
///
/// Field names are camelCase on the wire because this is the exact JSON
/// shape the summarization model is asked to answer in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    /// What the user was trying to achieve.
    pub user_intent: String,
    /// What actually changed in the diagram source.
    pub technical_changes: String,
}

impl ChangeSummary {
    pub fn new(user_intent: impl Into<String>, technical_changes: impl Into<String>) -> Self {
        Self {
            user_intent: user_intent.into(),
            technical_changes: technical_changes.into(),
        }
    }
}

/// One point in the diagram's edit history.
///
/// The definition is fixed at construction; the only post-creation mutation
/// is [`DiagramVersion::attach_summary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramVersion {
    id: VersionId,
    timestamp: DateTime<Utc>,
    identifier: String,
    definition: String,
    query: String,
    summary: Option<ChangeSummary>,
}

impl DiagramVersion {
    /// Create a new, not yet summarized version stamped with the current time.
    pub fn new(id: VersionId, definition: impl Into<String>, query: impl Into<String>) -> Self {
        let definition = definition.into();
        Self {
            id,
            timestamp: Utc::now(),
            identifier: derive_identifier(&definition),
            definition,
            query: query.into(),
            summary: None,
        }
    }

    pub fn id(&self) -> VersionId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Cosmetic label derived from the first line of the definition.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// The user intent text this edit was attributed to (possibly empty).
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn summary(&self) -> Option<&ChangeSummary> {
        self.summary.as_ref()
    }

    /// Set (or overwrite) the summary. Last write wins.
    pub fn attach_summary(&mut self, summary: ChangeSummary) {
        self.summary = Some(summary);
    }

    /// Presentation row for this version.
    pub fn view(&self) -> VersionView {
        VersionView::from(self)
    }
}

/// A presentation-ready row of the version history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionView {
    pub id: VersionId,
    /// Local wall-clock time of creation, e.g. `14:03:27`.
    pub time: String,
    /// First summary line, or [`PENDING_SUMMARY_LABEL`] while pending.
    pub headline: String,
    /// Second summary line; absent while pending.
    pub detail: Option<String>,
    pub pending: bool,
}

impl From<&DiagramVersion> for VersionView {
    fn from(version: &DiagramVersion) -> Self {
        let time = version
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string();

        match &version.summary {
            Some(summary) => Self {
                id: version.id,
                time,
                headline: summary.user_intent.clone(),
                detail: Some(summary.technical_changes.clone()),
                pending: false,
            },
            None => Self {
                id: version.id,
                time,
                headline: PENDING_SUMMARY_LABEL.to_string(),
                detail: None,
                pending: true,
            },
        }
    }
}

impl fmt::Display for VersionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} {}", self.id, self.time, self.headline)?;
        if let Some(detail) = &self.detail {
            write!(f, " -- {detail}")?;
        }
        Ok(())
    }
}

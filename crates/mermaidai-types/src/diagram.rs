//! Lightweight inspection of Mermaid diagram source text.
//!
//! Nothing here parses Mermaid properly. These helpers only look at the
//! declaration line and count `participant` lines, which is all the version
//! history needs to label snapshots and describe the very first one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared diagram type, detected by keyword on the first non-empty line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    Sequence,
    Flow,
    Class,
    Generic,
}

impl DiagramKind {
    /// Classify a definition.
    ///
    /// Keywords are matched case-insensitively in priority order:
    /// `sequence`, then `flow`, then `class`. Anything else is generic.
    pub fn classify(definition: &str) -> Self {
        let declaration = definition
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_lowercase();

        if declaration.contains("sequence") {
            DiagramKind::Sequence
        } else if declaration.contains("flow") {
            DiagramKind::Flow
        } else if declaration.contains("class") {
            DiagramKind::Class
        } else {
            DiagramKind::Generic
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::Sequence => write!(f, "sequence"),
            DiagramKind::Flow => write!(f, "flow"),
            DiagramKind::Class => write!(f, "class"),
            DiagramKind::Generic => write!(f, "generic"),
        }
    }
}

/// Count lines declaring a `participant`.
pub fn count_participants(definition: &str) -> usize {
    definition
        .lines()
        .filter(|line| line.contains("participant"))
        .count()
}

/// One-line description of a diagram, used as the technical part of the
/// summary attached to the first version of a history.
pub fn describe(definition: &str) -> String {
    match DiagramKind::classify(definition) {
        DiagramKind::Sequence => format!(
            "Sequence diagram with {} participants",
            count_participants(definition)
        ),
        DiagramKind::Flow => "Flow diagram".to_string(),
        DiagramKind::Class => "Class diagram".to_string(),
        DiagramKind::Generic => "Mermaid diagram".to_string(),
    }
}

/// Short cosmetic label for a definition: its first line with everything
/// except ASCII letters, digits and spaces removed, then trimmed.
pub fn derive_identifier(definition: &str) -> String {
    definition
        .split('\n')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string()
}

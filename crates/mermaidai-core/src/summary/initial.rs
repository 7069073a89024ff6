//! Summary of the first version of a history.
//!
//! The first snapshot has nothing to compare against, so instead of asking
//! a model it is described locally from its declaration line.

use mermaidai_types::diagram::describe;
use mermaidai_types::version::ChangeSummary;

/// User-intent line of every first version.
pub const INITIAL_INTENT: &str = "Initial diagram";

/// Build the summary for the first version of a history.
pub fn initial_summary(definition: &str) -> ChangeSummary {
    ChangeSummary::new(INITIAL_INTENT, describe(definition))
}

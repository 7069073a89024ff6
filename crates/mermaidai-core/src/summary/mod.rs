//! Change summarization.
//!
//! - `SummaryBackend`: port to a remote text-completion service
//! - `ChangeSummarizer`: builds the prompt, parses the answer, and always
//!   resolves to some summary, falling back deterministically on failure
//! - `initial`: the locally computed summary of the first version

pub mod backend;
pub mod initial;
pub mod summarizer;

pub use backend::{BoxSummaryBackend, SummaryBackend};
pub use summarizer::{ChangeSummarizer, SummaryJob};

//! Version history: the append-only store and the service that pairs every
//! append with exactly one summary.

pub mod service;
pub mod store;

pub use service::{DiagramHistory, VersionHandle};
pub use store::{Appended, VersionStore};

//! Tool-call dispatch: assistant capability invocations to local handlers.

pub mod capability;
pub mod dispatcher;

pub use capability::{Capability, ToolCall, UpdateDefinitionArgs};
pub use dispatcher::{DispatchOutcome, ToolDispatcher, ToolResult};

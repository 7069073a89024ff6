//! Event bus for diagram session presentation.
//!
//! Provides an `EventBus` that distributes `SessionEvent` messages to all
//! subscribers via a `tokio::sync::broadcast` channel.

pub mod bus;

pub use bus::EventBus;

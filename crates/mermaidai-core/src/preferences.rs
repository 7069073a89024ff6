//! Durable user preferences port.

use std::future::Future;

use mermaidai_types::error::PreferenceError;
use mermaidai_types::theme::Theme;

/// Persists the display theme across restarts.
///
/// Loading never fails: anything unreadable yields the default theme.
pub trait PreferenceStore: Send + Sync {
    fn load_theme(&self) -> impl Future<Output = Theme> + Send;

    fn save_theme(&self, theme: Theme) -> impl Future<Output = Result<(), PreferenceError>> + Send;
}

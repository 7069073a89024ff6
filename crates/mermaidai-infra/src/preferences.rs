//! JSON-file preference store: `{data_dir}/preferences.json`.
//!
//! The file is a flat JSON object. Only the `theme` key is managed here;
//! other keys are preserved on write.

use std::path::{Path, PathBuf};

use mermaidai_core::preferences::PreferenceStore;
use mermaidai_types::error::PreferenceError;
use mermaidai_types::theme::Theme;
use serde_json::{Map, Value};

const THEME_KEY: &str = "theme";

/// Theme persistence for sessions opened through [`crate::client::open_session`].
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("preferences.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Map<String, Value> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(err) => {
                tracing::warn!("Failed to read {}: {err}", self.path.display());
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!("Ignoring malformed {}", self.path.display());
                Map::new()
            }
        }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    async fn load_theme(&self) -> Theme {
        self.read_map()
            .await
            .remove(THEME_KEY)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    async fn save_theme(&self, theme: Theme) -> Result<(), PreferenceError> {
        let mut map = self.read_map().await;
        map.insert(THEME_KEY.to_string(), Value::String(theme.to_string()));
        let content = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|e| PreferenceError::Encode(e.to_string()))?;

        let write_err = |e: std::io::Error| PreferenceError::Write {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        tokio::fs::write(&self.path, content).await.map_err(write_err)
    }
}

//! Application identity and settings location configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application identity section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSection {
    /// Identity under which global settings are stored.
    #[serde(default = "default_app_id")]
    pub app_id: String,
    /// Overrides the per-user configuration directory.
    ///
    /// When unset, the platform configuration directory is used.
    #[serde(default)]
    pub settings_dir: Option<PathBuf>,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            settings_dir: None,
        }
    }
}

fn default_app_id() -> String {
    "heatlabs-configurator".to_string()
}

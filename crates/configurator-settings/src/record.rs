//! Settings record types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arbitrary JSON object of settings.
pub type SettingsRecord = Map<String, Value>;

/// Per-user application preferences.
///
/// Keys this version does not know about are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Game installation directory; empty when not chosen yet.
    #[serde(default)]
    pub game_path: String,
    /// Whether the last project is reopened on startup.
    #[serde(default = "default_true")]
    pub auto_load: bool,
    /// Unknown keys, preserved on round-trip.
    #[serde(flatten)]
    pub extra: SettingsRecord,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            game_path: String::new(),
            auto_load: true,
            extra: SettingsRecord::new(),
        }
    }
}

impl GlobalSettings {
    /// Shallow-merge a JSON object into these settings.
    ///
    /// Known keys must keep their JSON type; unknown keys are stored as-is
    /// and a `null` removes an unknown key.
    pub fn merge(&self, patch: &SettingsRecord) -> Result<Self, serde_json::Error> {
        let mut merged = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => SettingsRecord::new(),
        };
        for (key, value) in patch {
            if value.is_null() && key != "gamePath" && key != "autoLoad" {
                merged.remove(key);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(Value::Object(merged))
    }
}

fn default_true() -> bool {
    true
}

//! Global and local settings store.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use configurator_core::config::app::AppSection;

use crate::error::SettingsError;
use crate::fs::{ensure_dir, read_json_object, write_json_atomic};
use crate::record::{GlobalSettings, SettingsRecord};

/// File name used at both scopes.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Directory created next to a project file for its local settings.
pub const LOCAL_SETTINGS_DIR: &str = "configurator";

/// Reads and writes settings at the global and project scopes.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Directory holding the global settings file.
    global_dir: PathBuf,
}

impl SettingsStore {
    /// Create a store whose global settings live in `global_dir`.
    pub fn new(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_dir: global_dir.into(),
        }
    }

    /// Create a store from the `[app]` configuration section.
    ///
    /// Uses `settings_dir` when set, otherwise `<config_dir>/<app_id>`.
    pub fn from_config(app: &AppSection) -> Result<Self, SettingsError> {
        let global_dir = match &app.settings_dir {
            Some(dir) => dir.clone(),
            None => dirs::config_dir()
                .ok_or(SettingsError::ConfigDirUnavailable)?
                .join(&app.app_id),
        };
        Ok(Self::new(global_dir))
    }

    /// Path of the global settings file.
    pub fn global_path(&self) -> PathBuf {
        self.global_dir.join(SETTINGS_FILE_NAME)
    }

    /// Path of the local settings file belonging to `project_file`.
    pub fn local_path(project_file: &Path) -> PathBuf {
        local_dir(project_file).join(SETTINGS_FILE_NAME)
    }

    /// Load global settings, or the defaults when none were saved yet.
    ///
    /// A missing file is not created here. Any other failure is returned.
    pub async fn load_global(&self) -> Result<GlobalSettings, SettingsError> {
        let path = self.global_path();
        match read_json_object::<GlobalSettings>(&path).await? {
            Some(settings) => {
                debug!(path = %path.display(), "Loaded global settings");
                Ok(settings)
            }
            None => {
                debug!(path = %path.display(), "No global settings yet, using defaults");
                Ok(GlobalSettings::default())
            }
        }
    }

    /// Persist global settings, creating the directory when needed.
    pub async fn save_global(&self, settings: &GlobalSettings) -> Result<(), SettingsError> {
        let path = self.global_path();
        write_json_atomic(&path, settings).await?;
        info!(path = %path.display(), "Saved global settings");
        Ok(())
    }

    /// Merge `patch` into the stored global settings and persist the result.
    pub async fn update_global(
        &self,
        patch: &SettingsRecord,
    ) -> Result<GlobalSettings, SettingsError> {
        let current = self.load_global().await?;
        let merged = current
            .merge(patch)
            .map_err(|e| SettingsError::InvalidPatch {
                reason: e.to_string(),
            })?;
        self.save_global(&merged).await?;
        Ok(merged)
    }

    /// Load the local settings of `project_file`.
    ///
    /// `Ok(None)` means the project has no local settings yet.
    pub async fn load_local(
        &self,
        project_file: &Path,
    ) -> Result<Option<SettingsRecord>, SettingsError> {
        let path = Self::local_path(project_file);
        let record = read_json_object::<SettingsRecord>(&path).await?;
        debug!(
            path = %path.display(),
            found = record.is_some(),
            "Loaded local settings"
        );
        Ok(record)
    }

    /// Persist the local settings of `project_file`.
    pub async fn save_local(
        &self,
        project_file: &Path,
        record: &SettingsRecord,
    ) -> Result<(), SettingsError> {
        let dir = local_dir(project_file);
        ensure_dir(&dir).await?;
        let path = dir.join(SETTINGS_FILE_NAME);
        write_json_atomic(&path, record).await?;
        info!(path = %path.display(), "Saved local settings");
        Ok(())
    }
}

fn local_dir(project_file: &Path) -> PathBuf {
    let parent = match project_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    parent.join(LOCAL_SETTINGS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> SettingsRecord {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_load_global_defaults_without_creating_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("heatlabs-configurator"));

        let settings = store.load_global().await.unwrap();

        assert_eq!(settings.game_path, "");
        assert!(settings.auto_load);
        assert!(!store.global_path().exists());
        assert!(!dir.path().join("heatlabs-configurator").exists());
    }

    #[tokio::test]
    async fn test_global_round_trip_preserves_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        let raw = json!({"gamePath": "/games/heat", "autoLoad": false, "window": {"w": 1280}});
        tokio::fs::write(store.global_path(), raw.to_string()).await.unwrap();

        let settings = store.load_global().await.unwrap();
        store.save_global(&settings).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(store.global_path()).await.unwrap())
                .unwrap();
        assert_eq!(written, raw);
    }

    #[tokio::test]
    async fn test_save_global_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested"));

        store.save_global(&GlobalSettings::default()).await.unwrap();

        let text = tokio::fs::read_to_string(store.global_path()).await.unwrap();
        assert!(text.contains("\n  \"autoLoad\": true"));
    }

    #[tokio::test]
    async fn test_load_global_parse_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());
        tokio::fs::write(store.global_path(), "{ not json").await.unwrap();

        let err = store.load_global().await.unwrap_err();
        assert!(matches!(err, SettingsError::ParseFailed { .. }));
    }

    #[tokio::test]
    async fn test_update_global_merges() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path());

        let merged = store
            .update_global(&record(json!({"gamePath": "/games/heat"})))
            .await
            .unwrap();
        assert_eq!(merged.game_path, "/games/heat");
        assert!(merged.auto_load);
        assert_eq!(store.load_global().await.unwrap(), merged);
    }

    #[tokio::test]
    async fn test_local_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("tanks.project");
        let store = SettingsStore::new(dir.path().join("global"));

        store.save_local(&project, &record(json!({"a": 1}))).await.unwrap();

        assert_eq!(
            store.load_local(&project).await.unwrap(),
            Some(record(json!({"a": 1})))
        );
        assert!(dir.path().join("configurator").join("settings.json").exists());
    }

    #[tokio::test]
    async fn test_load_local_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("global"));

        let loaded = store
            .load_local(&dir.path().join("fresh.project"))
            .await
            .unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_save_local_directory_create_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        tokio::fs::write(&blocker, "file").await.unwrap();
        let store = SettingsStore::new(dir.path().join("global"));

        let err = store
            .save_local(&blocker.join("tanks.project"), &record(json!({"a": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, SettingsError::DirectoryCreateFailed { .. }));
    }

    #[tokio::test]
    async fn test_save_local_file_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("tanks.project");
        // A directory squatting on the temp path makes the write itself fail.
        tokio::fs::create_dir_all(dir.path().join("configurator").join("settings.json.tmp"))
            .await
            .unwrap();
        let store = SettingsStore::new(dir.path().join("global"));

        let err = store
            .save_local(&project, &record(json!({"a": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, SettingsError::FileWriteFailed { .. }));
    }

    #[test]
    fn test_local_path_for_bare_file_name() {
        assert_eq!(
            SettingsStore::local_path(Path::new("tanks.project")),
            Path::new(".").join("configurator").join("settings.json")
        );
    }

    #[test]
    fn test_from_config_override() {
        let app = AppSection {
            app_id: "x".to_string(),
            settings_dir: Some(PathBuf::from("/srv/settings")),
        };
        let store = SettingsStore::from_config(&app).unwrap();
        assert_eq!(store.global_path(), PathBuf::from("/srv/settings/settings.json"));
    }
}

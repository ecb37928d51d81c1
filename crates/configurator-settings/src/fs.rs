//! JSON file helpers with atomic replacement.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use crate::error::SettingsError;

/// Ensure `dir` exists, creating missing parents.
pub async fn ensure_dir(dir: &Path) -> Result<(), SettingsError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| SettingsError::DirectoryCreateFailed {
            path: dir.to_path_buf(),
            source,
        })
}

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Sibling path used while a replacement is being written.
///
/// Unique per process and per call, so concurrent writers of the same
/// target never share a temp file.
pub fn temp_path(path: &Path) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.{}.{seq}.tmp", std::process::id()))
}

/// Write `value` as pretty JSON, replacing `path` atomically.
///
/// The payload goes to a temp sibling first and is then renamed over the
/// target, so readers see either the old file or the new one.
pub async fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let mut payload = serde_json::to_string_pretty(value)?;
    payload.push('\n');

    let temp = temp_path(path);
    fs::write(&temp, payload.as_bytes())
        .await
        .map_err(|source| SettingsError::FileWriteFailed {
            path: temp.clone(),
            source,
        })?;

    if let Err(source) = fs::rename(&temp, path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(SettingsError::FileWriteFailed {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!(path = %path.display(), bytes = payload.len(), "Wrote settings file");
    Ok(())
}

/// Read a JSON object from `path`.
///
/// Returns `Ok(None)` when the file does not exist. Content that is not a
/// JSON object is a parse failure.
pub async fn read_json_object<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SettingsError> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::FileReadFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let value: Value = serde_json::from_str(&raw).map_err(|e| SettingsError::ParseFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(SettingsError::ParseFailed {
            path: path.to_path_buf(),
            reason: "expected a JSON object".to_string(),
        });
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| SettingsError::ParseFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

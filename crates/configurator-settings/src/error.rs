//! Settings persistence errors.

use std::path::PathBuf;

use configurator_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Why a settings read or write failed.
///
/// Directory creation and file writes are kept apart so callers can tell
/// the user which step to fix.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings directory could not be created.
    #[error("Failed to create settings directory {}: {source}", .path.display())]
    DirectoryCreateFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file could not be written or replaced.
    #[error("Failed to write settings file {}: {source}", .path.display())]
    FileWriteFailed {
        /// File that could not be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file exists but could not be read.
    #[error("Failed to read settings file {}: {source}", .path.display())]
    FileReadFailed {
        /// File that could not be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not a JSON object.
    #[error("Failed to parse settings file {}: {reason}", .path.display())]
    ParseFailed {
        /// File that could not be parsed.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A settings record could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    SerializeFailed(#[from] serde_json::Error),

    /// A settings patch does not fit the known fields.
    #[error("Invalid settings update: {reason}")]
    InvalidPatch {
        /// What did not fit.
        reason: String,
    },

    /// No per-user configuration directory exists on this platform.
    #[error("No per-user configuration directory is available")]
    ConfigDirUnavailable,
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        Self::with_source(ErrorKind::Settings, err.to_string(), err)
    }
}

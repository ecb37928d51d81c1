//! Unified application error types for the Configurator host.
//!
//! Crates map their internal errors into [`AppError`] at their public
//! boundary so binaries can propagate everything with the `?` operator.
//! Presence-channel failures have their own narrow types ([`ConnectError`],
//! [`SendError`]) because the controller reacts to them differently.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// An internal error occurred.
    Internal,
    /// A filesystem I/O error occurred.
    Storage,
    /// A settings file could not be read or written.
    Settings,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The presence channel failed.
    Presence,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Settings => write!(f, "SETTINGS"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Presence => write!(f, "PRESENCE"),
        }
    }
}

/// The unified application error.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// Failure to establish a presence connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// No endpoint accepted the connection.
    #[error("Presence endpoint unreachable: {0}")]
    Unreachable(String),

    /// The endpoint refused the client identity.
    #[error("Presence identity rejected: {0}")]
    IdentityRejected(String),

    /// The handshake did not complete in time.
    #[error("Presence handshake timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The endpoint answered with something that is not a valid frame.
    #[error("Presence protocol error: {0}")]
    Protocol(String),
}

/// Failure to push a status over an established presence connection.
#[derive(Debug, Error)]
pub enum SendError {
    /// The channel has no live connection.
    #[error("Presence channel is not connected")]
    NotConnected,

    /// Writing to or reading from the endpoint failed.
    #[error("Presence I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint did not answer in time.
    #[error("Presence send timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The endpoint answered with an error payload.
    #[error("Presence update rejected: {0}")]
    Rejected(String),

    /// The endpoint answered with something that is not a valid frame.
    #[error("Presence protocol error: {0}")]
    Protocol(String),
}

impl From<ConnectError> for AppError {
    fn from(err: ConnectError) -> Self {
        Self::with_source(ErrorKind::Presence, err.to_string(), err)
    }
}

impl From<SendError> for AppError {
    fn from(err: SendError) -> Self {
        Self::with_source(ErrorKind::Presence, err.to_string(), err)
    }
}

/// Failure of the raw project-file passthrough.
#[derive(Debug, Error)]
pub enum FileIoError {
    /// The file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(std::path::PathBuf),

    /// Any other I/O failure.
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        /// The file being accessed.
        path: std::path::PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl FileIoError {
    /// Classify an I/O error for `path`.
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

impl From<FileIoError> for AppError {
    fn from(err: FileIoError) -> Self {
        let kind = match &err {
            FileIoError::NotFound(_) => ErrorKind::NotFound,
            FileIoError::Io { .. } => ErrorKind::Storage,
        };
        Self::with_source(kind, err.to_string(), err)
    }
}

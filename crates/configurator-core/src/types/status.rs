//! Application status and presence connection state definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// High-level application activity mirrored onto the presence channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum StatusKind {
    /// Nothing open or nothing happening.
    Idle,
    /// A project is open and being edited.
    Editing,
    /// A project file is being opened.
    Loading,
    /// A project file is being written.
    Saving,
}

impl StatusKind {
    /// All kinds, in declaration order.
    pub const ALL: [StatusKind; 4] = [Self::Idle, Self::Editing, Self::Loading, Self::Saving];

    /// Parses from a string, falling back to [`StatusKind::Idle`].
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "idle" => Self::Idle,
            "editing" => Self::Editing,
            "loading" => Self::Loading,
            "saving" => Self::Saving,
            _ => Self::Idle,
        }
    }

    /// Converts to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Editing => "editing",
            Self::Loading => "loading",
            Self::Saving => "saving",
        }
    }

    /// The canonical `(details, state)` text pair shown for this kind.
    pub fn canonical_text(&self) -> (&'static str, &'static str) {
        match self {
            Self::Idle => ("Using HEAT Labs Configurator", "Idle"),
            Self::Editing => ("Editing configuration", "Making changes"),
            Self::Loading => ("Loading project", "Opening file"),
            Self::Saving => ("Saving project", "Writing changes"),
        }
    }
}

impl From<String> for StatusKind {
    fn from(value: String) -> Self {
        Self::from_str_or_default(&value)
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of the presence connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection and no attempt in flight.
    #[default]
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// Connected and accepting status updates.
    Connected,
}

impl ConnectionState {
    /// Converts to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Inbound messages from the UI/IPC layer.
//!
//! The UI process reports what happened ([`UiEvent`]) and asks the host to
//! perform file work ([`HostCommand`]). Both arrive as one JSON object per
//! line and are told apart by their tag field.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::status::StatusKind;

/// Something the UI layer observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum UiEvent {
    /// The UI switched to a named status.
    StatusChanged {
        /// The status kind; unknown names mean idle.
        kind: StatusKind,
    },
    /// A project file was picked in the open dialog.
    FileOpened,
    /// A project file was read successfully.
    FileLoaded {
        /// Display name of the file.
        name: String,
    },
    /// A save is about to start.
    FileSaving,
    /// A save completed successfully.
    FileSaved {
        /// Display name of the file.
        name: String,
    },
    /// Free-form status text.
    CustomStatus {
        /// First text line.
        details: String,
        /// Second text line.
        state: String,
    },
}

/// Work the UI layer asks the host to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum HostCommand {
    /// Open a project file.
    Open {
        /// The file chosen by the user.
        path: PathBuf,
    },
    /// Save the open project in place.
    Save {
        /// New file content.
        content: String,
    },
    /// Save the open project under a new path.
    SaveAs {
        /// The target chosen by the user.
        path: PathBuf,
        /// New file content.
        content: String,
    },
    /// Start the presence controller again after it dropped.
    RestartPresence,
    /// Shut the host down.
    Quit,
}

/// One inbound line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InboundMessage {
    /// A UI observation.
    Event(UiEvent),
    /// A host command.
    Command(HostCommand),
}

impl InboundMessage {
    /// Parse a single JSON line.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

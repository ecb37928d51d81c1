//! Maps file operations and UI events onto presence statuses.

use std::path::Path;

use configurator_core::events::UiEvent;
use configurator_core::types::presence::PresenceEvent;
use configurator_core::types::status::StatusKind;

use crate::controller::PresenceController;

/// State line shown while a named project is edited.
const EDITING_STATE: &str = "Making changes";

/// Outcome of a file operation, as reported by the file layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The open dialog returned a file; `false` means it was cancelled.
    Opened { picked: bool },
    /// A project file was read.
    Read {
        /// Display name of the file, when known.
        file_name: Option<String>,
        succeeded: bool,
    },
    /// A save is about to start.
    Saving,
    /// A save finished.
    Saved {
        /// Display name of the file, when known.
        file_name: Option<String>,
        succeeded: bool,
    },
}

/// Translate a file outcome. Failed or cancelled operations yield nothing.
pub fn translate_outcome(outcome: &FileOutcome) -> Option<PresenceEvent> {
    match outcome {
        FileOutcome::Opened { picked: true } => Some(PresenceEvent::new(StatusKind::Loading)),
        FileOutcome::Opened { picked: false } => None,
        FileOutcome::Read {
            file_name,
            succeeded: true,
        }
        | FileOutcome::Saved {
            file_name,
            succeeded: true,
        } => Some(editing(file_name.as_deref())),
        FileOutcome::Read { .. } | FileOutcome::Saved { .. } => None,
        FileOutcome::Saving => Some(PresenceEvent::new(StatusKind::Saving)),
    }
}

/// Translate an inbound UI event.
pub fn translate_ui_event(event: &UiEvent) -> PresenceEvent {
    match event {
        UiEvent::StatusChanged { kind } => PresenceEvent::new(*kind),
        UiEvent::FileOpened => PresenceEvent::new(StatusKind::Loading),
        UiEvent::FileLoaded { name } | UiEvent::FileSaved { name } => editing(Some(name)),
        UiEvent::FileSaving => PresenceEvent::new(StatusKind::Saving),
        UiEvent::CustomStatus { details, state } => {
            PresenceEvent::with_text(StatusKind::Idle, details.clone(), state.clone())
        }
    }
}

/// Display name of a project path.
pub fn display_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn editing(file_name: Option<&str>) -> PresenceEvent {
    match file_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => PresenceEvent::with_text(
            StatusKind::Editing,
            format!("Editing: {name}"),
            EDITING_STATE,
        ),
        None => PresenceEvent::new(StatusKind::Editing),
    }
}

/// Forwards translated events to the presence controller.
///
/// A disabled bridge accepts everything and forwards nothing, so callers do
/// not need to care whether presence runs at all.
#[derive(Debug, Clone, Default)]
pub struct AppStatusBridge {
    controller: Option<PresenceController>,
}

impl AppStatusBridge {
    pub fn new(controller: PresenceController) -> Self {
        Self {
            controller: Some(controller),
        }
    }

    /// A bridge with no controller behind it.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// The controller events are forwarded to, if any.
    pub fn controller(&self) -> Option<&PresenceController> {
        self.controller.as_ref()
    }

    pub fn on_file_outcome(&self, outcome: &FileOutcome) {
        if let Some(event) = translate_outcome(outcome) {
            self.forward(event);
        }
    }

    pub fn on_ui_event(&self, event: &UiEvent) {
        self.forward(translate_ui_event(event));
    }

    fn forward(&self, event: PresenceEvent) {
        match &self.controller {
            Some(controller) => controller.on_event(event),
            None => tracing::trace!("Presence disabled, dropping {} status", event.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::memory::MemoryChannel;
    use crate::controller::ControllerSettings;
    use configurator_core::types::presence::PresenceProfile;
    use std::time::Duration;

    #[test]
    fn test_file_outcomes() {
        assert_eq!(
            translate_outcome(&FileOutcome::Opened { picked: true }),
            Some(PresenceEvent::new(StatusKind::Loading))
        );
        assert_eq!(
            translate_outcome(&FileOutcome::Read {
                file_name: Some("tanks.project".to_string()),
                succeeded: true,
            }),
            Some(PresenceEvent::with_text(
                StatusKind::Editing,
                "Editing: tanks.project",
                "Making changes"
            ))
        );
        assert_eq!(
            translate_outcome(&FileOutcome::Saving),
            Some(PresenceEvent::new(StatusKind::Saving))
        );
        assert_eq!(
            translate_outcome(&FileOutcome::Read {
                file_name: None,
                succeeded: true,
            }),
            Some(PresenceEvent::new(StatusKind::Editing))
        );
    }

    #[test]
    fn test_failures_produce_nothing() {
        assert_eq!(translate_outcome(&FileOutcome::Opened { picked: false }), None);
        assert_eq!(
            translate_outcome(&FileOutcome::Read {
                file_name: Some("a.project".to_string()),
                succeeded: false,
            }),
            None
        );
        assert_eq!(
            translate_outcome(&FileOutcome::Saved {
                file_name: Some("a.project".to_string()),
                succeeded: false,
            }),
            None
        );
    }

    #[test]
    fn test_ui_events() {
        assert_eq!(
            translate_ui_event(&UiEvent::CustomStatus {
                details: "Tuning armor".to_string(),
                state: "Tier X".to_string(),
            }),
            PresenceEvent::with_text(StatusKind::Idle, "Tuning armor", "Tier X")
        );
        assert_eq!(
            translate_ui_event(&UiEvent::FileSaved {
                name: "  ".to_string()
            }),
            PresenceEvent::new(StatusKind::Editing)
        );
        assert_eq!(
            translate_ui_event(&UiEvent::StatusChanged {
                kind: StatusKind::Loading
            }),
            PresenceEvent::new(StatusKind::Loading)
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            display_name(Path::new("/games/heat/tanks.project")).as_deref(),
            Some("tanks.project")
        );
        assert_eq!(display_name(Path::new("/")), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bridge_forwards_to_controller() {
        let channel = MemoryChannel::new();
        let settings = ControllerSettings {
            identity: "1234".to_string(),
            refresh_interval: Duration::from_secs(15),
            retry_delay: Duration::from_secs(30),
            profile: PresenceProfile::default(),
        };
        let (controller, _task) = PresenceController::spawn(channel.clone(), settings);
        let bridge = AppStatusBridge::new(controller.clone());

        controller.start();
        channel.wait_until(|calls| calls.len() >= 2).await;

        bridge.on_file_outcome(&FileOutcome::Saving);
        bridge.on_file_outcome(&FileOutcome::Saved {
            file_name: Some("tanks.project".to_string()),
            succeeded: false,
        });
        bridge.on_ui_event(&UiEvent::FileLoaded {
            name: "tanks.project".to_string(),
        });
        channel.wait_until(|calls| calls.len() >= 4).await;
        tokio::time::sleep(Duration::from_millis(1)).await;

        let states: Vec<_> = channel.statuses().into_iter().map(|s| s.state).collect();
        assert_eq!(states, ["Idle", "Writing changes", "Making changes"]);
        controller.shutdown().await;
    }

    #[test]
    fn test_disabled_bridge_is_silent() {
        let bridge = AppStatusBridge::disabled();
        assert!(bridge.controller().is_none());
        bridge.on_ui_event(&UiEvent::FileOpened);
    }
}

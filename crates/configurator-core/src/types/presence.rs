//! Presence status values pushed to the external status channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::StatusKind;

/// Artwork keys and hover texts shown next to the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Imagery {
    /// Asset key of the large image.
    pub large_key: String,
    /// Hover text of the large image.
    pub large_text: String,
    /// Asset key of the small image.
    pub small_key: String,
    /// Hover text of the small image.
    pub small_text: String,
}

impl Default for Imagery {
    fn default() -> Self {
        Self {
            large_key: "heatlabs_logo".to_string(),
            large_text: "HEAT Labs Configurator".to_string(),
            small_key: "editing_icon".to_string(),
            small_text: "World of Tanks: HEAT".to_string(),
        }
    }
}

/// A labelled link button shown under the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceLink {
    /// Button label.
    pub label: String,
    /// Target URL.
    pub url: String,
}

impl PresenceLink {
    /// Create a new link.
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// The static parts of every status: imagery and links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceProfile {
    /// Artwork shown with every status.
    #[serde(default)]
    pub imagery: Imagery,
    /// Link buttons shown with every status, in order.
    #[serde(default = "default_links")]
    pub links: Vec<PresenceLink>,
}

impl Default for PresenceProfile {
    fn default() -> Self {
        Self {
            imagery: Imagery::default(),
            links: default_links(),
        }
    }
}

fn default_links() -> Vec<PresenceLink> {
    vec![
        PresenceLink::new("Visit HEAT Labs", "https://heatlabs.net"),
        PresenceLink::new("Join The Community", "https://discord.heatlabs.net"),
    ]
}

/// A requested status change: a kind plus optional text overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    /// The named status.
    pub kind: StatusKind,
    /// Replaces the kind's canonical details line when non-empty.
    pub details: Option<String>,
    /// Replaces the kind's canonical state line when non-empty.
    pub state: Option<String>,
}

impl PresenceEvent {
    /// An event using the kind's canonical text.
    pub fn new(kind: StatusKind) -> Self {
        Self {
            kind,
            details: None,
            state: None,
        }
    }

    /// An event overriding both text lines.
    pub fn with_text(kind: StatusKind, details: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            kind,
            details: Some(details.into()),
            state: Some(state.into()),
        }
    }
}

/// Snapshot of what the external channel should display.
///
/// A fresh value is built for every update; `started_at` is carried over
/// from the connection so elapsed time keeps counting from the connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceStatus {
    /// First text line.
    pub details: String,
    /// Second text line.
    pub state: String,
    /// Start of the elapsed-time display.
    pub started_at: DateTime<Utc>,
    /// Artwork.
    pub imagery: Imagery,
    /// Link buttons, in order.
    pub links: Vec<PresenceLink>,
}

impl PresenceStatus {
    /// Build a status from an event, the connection start, and the profile.
    pub fn build(event: &PresenceEvent, started_at: DateTime<Utc>, profile: &PresenceProfile) -> Self {
        let (details, state) = event.kind.canonical_text();
        Self {
            details: pick(event.details.as_deref(), details),
            state: pick(event.state.as_deref(), state),
            started_at,
            imagery: profile.imagery.clone(),
            links: profile.links.clone(),
        }
    }
}

fn pick(custom: Option<&str>, canonical: &str) -> String {
    match custom {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => canonical.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_uses_canonical_text() {
        let now = Utc::now();
        let status = PresenceStatus::build(
            &PresenceEvent::new(StatusKind::Loading),
            now,
            &PresenceProfile::default(),
        );
        assert_eq!(status.details, "Loading project");
        assert_eq!(status.state, "Opening file");
        assert_eq!(status.started_at, now);
        assert_eq!(status.links.len(), 2);
        assert_eq!(status.links[0].label, "Visit HEAT Labs");
    }

    #[test]
    fn test_build_applies_overrides() {
        let event = PresenceEvent::with_text(StatusKind::Editing, "Editing: a.project", "");
        let status = PresenceStatus::build(&event, Utc::now(), &PresenceProfile::default());
        assert_eq!(status.details, "Editing: a.project");
        // Empty override keeps the canonical line.
        assert_eq!(status.state, "Making changes");
    }
}

//! Core type definitions used across the Configurator workspace.

pub mod presence;
pub mod status;

pub use presence::{Imagery, PresenceEvent, PresenceLink, PresenceProfile, PresenceStatus};
pub use status::{ConnectionState, StatusKind};

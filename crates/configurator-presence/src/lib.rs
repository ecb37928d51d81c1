//! # configurator-presence
//!
//! Rich presence for the Configurator host. Provides:
//!
//! - The Discord local-IPC presence channel and an in-memory channel
//! - The presence controller: connect, retry, keep-alive refresh, teardown
//! - The status bridge mapping file outcomes and UI events to statuses

pub mod bridge;
pub mod channel;
pub mod controller;

pub use bridge::{AppStatusBridge, FileOutcome};
pub use channel::discord::DiscordIpcChannel;
pub use channel::memory::MemoryChannel;
pub use controller::{ControllerSettings, PresenceController};

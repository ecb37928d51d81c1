//! Core traits defined in `configurator-core` and implemented by other crates.

pub mod file_host;
pub mod presence;

pub use file_host::{DialogFilter, FileDialogs, FileIo, OpenDialogOptions};
pub use presence::PresenceChannel;

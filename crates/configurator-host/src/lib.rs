//! # configurator-host
//!
//! The headless Configurator host. Provides:
//!
//! - `LocalFileIo`, the tokio-fs file passthrough
//! - `SuppliedPath`, dialogs answered by paths carried in host commands
//! - `ProjectSession`, which drives open/save through the status bridge
//! - The inbound NDJSON event loop and its replies
//! - Logging initialisation and the shutdown signal

pub mod dialogs;
pub mod file_io;
pub mod inbound;
pub mod logging;
pub mod reply;
pub mod session;
pub mod signal;

pub use dialogs::SuppliedPath;
pub use file_io::LocalFileIo;
pub use inbound::{Exit, Host};
pub use reply::HostReply;
pub use session::{OpenProject, ProjectSession};

//! Two-tier settings persistence for the Configurator host.
//!
//! - Global settings live once per user under the platform configuration
//!   directory (`<config_dir>/<app_id>/settings.json`).
//! - Local settings live next to the open project file
//!   (`<project_dir>/configurator/settings.json`).
//!
//! Both are pretty-printed JSON objects written atomically.

pub mod error;
pub mod fs;
pub mod record;
pub mod store;

pub use error::SettingsError;
pub use record::{GlobalSettings, SettingsRecord};
pub use store::SettingsStore;

//! # configurator-core
//!
//! Core crate for the HEAT Labs Configurator host. Contains configuration
//! schemas, presence value types, the collaborator traits implemented by
//! the other crates, inbound UI events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Configurator crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

//! Presence channel implementations.

pub mod discord;
pub mod memory;

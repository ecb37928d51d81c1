//! Rich presence configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::presence::PresenceProfile;

/// Rich presence broadcaster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Whether the host starts the presence controller at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Application client identity presented to the presence endpoint.
    ///
    /// Presence stays off while this is empty.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Interval between keep-alive re-sends of the last status.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// Delay before retrying a failed connect.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,
    /// Upper bound on any single channel exchange.
    #[serde(default = "default_io_timeout")]
    pub io_timeout_seconds: u64,
    /// Imagery and links attached to every status.
    #[serde(default)]
    pub profile: PresenceProfile,
}

impl PresenceConfig {
    /// Whether presence should run: enabled and a client identity is set.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.client_id.trim().is_empty()
    }

    /// Keep-alive interval as a [`Duration`].
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    /// Reconnect delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    /// Channel I/O timeout as a [`Duration`].
    pub fn io_timeout(&self) -> Duration {
        Duration::from_secs(self.io_timeout_seconds)
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            client_id: default_client_id(),
            refresh_interval_seconds: default_refresh_interval(),
            retry_delay_seconds: default_retry_delay(),
            io_timeout_seconds: default_io_timeout(),
            profile: PresenceProfile::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_client_id() -> String {
    String::new()
}

fn default_refresh_interval() -> u64 {
    15
}

fn default_retry_delay() -> u64 {
    30
}

fn default_io_timeout() -> u64 {
    5
}

//! In-memory presence channel.
//!
//! Records every call with the tokio clock time it happened at and can be
//! told to fail upcoming connects or sends. Used by tests and by the host's
//! dry-run mode.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::info;

use configurator_core::error::{ConnectError, SendError};
use configurator_core::traits::presence::PresenceChannel;
use configurator_core::types::presence::PresenceStatus;

/// What was asked of the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelOp {
    /// A connect attempt, successful or not.
    Connect {
        /// Identity presented.
        identity: String,
    },
    /// A status update, successful or not.
    SetStatus(PresenceStatus),
    /// A teardown request.
    ClearAndDisconnect,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelCall {
    /// Tokio clock time of the call.
    pub at: Instant,
    /// The operation.
    pub op: ChannelOp,
}

#[derive(Debug, Default)]
struct MemoryState {
    calls: Vec<ChannelCall>,
    fail_connects: usize,
    fail_sends: usize,
    connect_delay: Option<Duration>,
    connected: bool,
}

/// Presence channel that keeps everything in memory.
///
/// Clones share state, so a test can keep one clone while the controller
/// owns another.
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    state: Arc<watch::Sender<MemoryState>>,
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self {
            state: Arc::new(watch::channel(MemoryState::default()).0),
        }
    }

    /// Make the next `count` connects fail as unreachable.
    pub fn fail_next_connects(&self, count: usize) {
        self.state.send_modify(|s| s.fail_connects = count);
    }

    /// Make the next `count` status updates fail with an I/O error.
    pub fn fail_next_sends(&self, count: usize) {
        self.state.send_modify(|s| s.fail_sends = count);
    }

    /// Hold every connect for `delay` before it resolves.
    pub fn set_connect_delay(&self, delay: Option<Duration>) {
        self.state.send_modify(|s| s.connect_delay = delay);
    }

    /// Whether a connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<ChannelCall> {
        self.state.borrow().calls.clone()
    }

    /// Statuses passed to `set_status`, oldest first.
    pub fn statuses(&self) -> Vec<PresenceStatus> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match &call.op {
                ChannelOp::SetStatus(status) => Some(status.clone()),
                _ => None,
            })
            .collect()
    }

    /// Times of every connect attempt.
    pub fn connect_times(&self) -> Vec<Instant> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| matches!(call.op, ChannelOp::Connect { .. }))
            .map(|call| call.at)
            .collect()
    }

    /// Wait until the recorded calls satisfy `predicate`.
    pub async fn wait_until(&self, predicate: impl Fn(&[ChannelCall]) -> bool) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|s| predicate(s.calls.as_slice())).await;
    }

    fn record(&self, op: ChannelOp) {
        let at = Instant::now();
        self.state.send_modify(|s| s.calls.push(ChannelCall { at, op }));
    }
}

#[async_trait]
impl PresenceChannel for MemoryChannel {
    fn channel_type(&self) -> &str {
        "memory"
    }

    async fn connect(&mut self, identity: &str) -> Result<(), ConnectError> {
        self.record(ChannelOp::Connect {
            identity: identity.to_string(),
        });

        let delay = self.state.borrow().connect_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut failed = false;
        self.state.send_modify(|s| {
            if s.fail_connects > 0 {
                s.fail_connects -= 1;
                failed = true;
            } else {
                s.connected = true;
            }
        });

        if failed {
            return Err(ConnectError::Unreachable("memory channel refused".to_string()));
        }
        info!(identity = %identity, "Memory presence channel connected");
        Ok(())
    }

    async fn set_status(&mut self, status: &PresenceStatus) -> Result<(), SendError> {
        self.record(ChannelOp::SetStatus(status.clone()));

        let mut outcome = Ok(());
        self.state.send_modify(|s| {
            if !s.connected {
                outcome = Err(SendError::NotConnected);
            } else if s.fail_sends > 0 {
                s.fail_sends -= 1;
                s.connected = false;
                outcome = Err(SendError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "memory channel dropped",
                )));
            }
        });

        if outcome.is_ok() {
            info!(details = %status.details, state = %status.state, "Presence status");
        }
        outcome
    }

    async fn clear_and_disconnect(&mut self) {
        if !self.is_connected() {
            return;
        }
        self.record(ChannelOp::ClearAndDisconnect);
        self.state.send_modify(|s| s.connected = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use configurator_core::types::presence::{PresenceEvent, PresenceProfile};
    use configurator_core::types::status::StatusKind;

    fn idle() -> PresenceStatus {
        PresenceStatus::build(
            &PresenceEvent::new(StatusKind::Idle),
            Utc::now(),
            &PresenceProfile::default(),
        )
    }

    #[tokio::test]
    async fn test_send_requires_connection() {
        let mut channel = MemoryChannel::new();
        assert!(matches!(
            channel.set_status(&idle()).await,
            Err(SendError::NotConnected)
        ));

        channel.connect("id").await.unwrap();
        channel.set_status(&idle()).await.unwrap();
        assert_eq!(channel.statuses().len(), 2);
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let mut channel = MemoryChannel::new();
        channel.fail_next_connects(1);
        assert!(channel.connect("id").await.is_err());
        channel.connect("id").await.unwrap();

        channel.fail_next_sends(1);
        assert!(matches!(channel.set_status(&idle()).await, Err(SendError::Io(_))));
        assert!(!channel.is_connected());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let mut channel = MemoryChannel::new();
        channel.clear_and_disconnect().await;
        channel.connect("id").await.unwrap();
        channel.clear_and_disconnect().await;
        channel.clear_and_disconnect().await;

        let clears = channel
            .calls()
            .into_iter()
            .filter(|c| c.op == ChannelOp::ClearAndDisconnect)
            .count();
        assert_eq!(clears, 1);
    }
}

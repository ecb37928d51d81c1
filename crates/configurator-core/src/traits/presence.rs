//! Presence channel trait for the external status broadcaster.

use async_trait::async_trait;

use crate::error::{ConnectError, SendError};
use crate::types::presence::PresenceStatus;

/// Connection to the external status-broadcast service.
///
/// The channel is owned by exactly one presence controller, which is why
/// every operation takes `&mut self`. Implementations must bound all I/O
/// so that a silently dropped endpoint surfaces as an error instead of a
/// hang.
#[async_trait]
pub trait PresenceChannel: Send + 'static {
    /// Return the channel type name (e.g., "discord-ipc", "memory").
    fn channel_type(&self) -> &str;

    /// Open a connection and identify as `identity`.
    async fn connect(&mut self, identity: &str) -> Result<(), ConnectError>;

    /// Replace the displayed status.
    async fn set_status(&mut self, status: &PresenceStatus) -> Result<(), SendError>;

    /// Clear the displayed status and close the connection.
    ///
    /// Idempotent: a no-op on a channel that is not connected.
    async fn clear_and_disconnect(&mut self);
}

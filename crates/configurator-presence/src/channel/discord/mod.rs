//! Discord rich presence over the client's local IPC socket.

pub mod frame;
pub mod transport;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use configurator_core::error::{ConnectError, SendError};
use configurator_core::traits::presence::PresenceChannel;
use configurator_core::types::presence::PresenceStatus;

use self::frame::{FrameError, Opcode, read_frame, write_frame};
use self::transport::IpcStream;

/// Discord shows at most two buttons.
const MAX_BUTTONS: usize = 2;

/// Presence channel speaking the Discord local RPC protocol.
pub struct DiscordIpcChannel {
    /// Endpoints probed in order on connect.
    endpoints: Vec<PathBuf>,
    /// Upper bound on each connect and each request/reply exchange.
    io_timeout: Duration,
    /// Live stream after a successful handshake.
    stream: Option<Box<dyn IpcStream>>,
    /// Endpoint of the live stream.
    endpoint: Option<PathBuf>,
}

impl std::fmt::Debug for DiscordIpcChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordIpcChannel")
            .field("endpoint", &self.endpoint)
            .field("connected", &self.stream.is_some())
            .finish()
    }
}

impl DiscordIpcChannel {
    /// Channel probing the platform's default endpoints.
    pub fn new(io_timeout: Duration) -> Self {
        Self::with_endpoints(transport::default_endpoints(), io_timeout)
    }

    /// Channel probing an explicit endpoint list.
    pub fn with_endpoints(endpoints: Vec<PathBuf>, io_timeout: Duration) -> Self {
        Self {
            endpoints,
            io_timeout,
            stream: None,
            endpoint: None,
        }
    }

    async fn open_first(&self) -> Result<(PathBuf, Box<dyn IpcStream>), ConnectError> {
        let mut last_error = None;
        for endpoint in &self.endpoints {
            match timeout(self.io_timeout, transport::open(endpoint)).await {
                Ok(Ok(stream)) => return Ok((endpoint.clone(), stream)),
                Ok(Err(e)) => last_error = Some(format!("{}: {e}", endpoint.display())),
                Err(_) => last_error = Some(format!("{}: timed out", endpoint.display())),
            }
        }
        Err(ConnectError::Unreachable(
            last_error.unwrap_or_else(|| "no IPC endpoints configured".to_string()),
        ))
    }

    async fn handshake(stream: &mut Box<dyn IpcStream>, identity: &str) -> Result<(), ConnectError> {
        let hello = json!({ "v": 1, "client_id": identity });
        write_frame(stream.as_mut(), Opcode::Handshake, &hello)
            .await
            .map_err(|e| ConnectError::Unreachable(e.to_string()))?;

        let (opcode, payload) = read_frame(stream.as_mut())
            .await
            .map_err(|e| ConnectError::Protocol(e.to_string()))?;

        match opcode {
            Opcode::Frame if payload["evt"] == "READY" => Ok(()),
            Opcode::Frame if payload["evt"] == "ERROR" => Err(ConnectError::IdentityRejected(
                error_message(&payload),
            )),
            Opcode::Close => Err(ConnectError::IdentityRejected(error_message(&payload))),
            other => Err(ConnectError::Protocol(format!(
                "unexpected handshake reply {other:?}"
            ))),
        }
    }

    /// Send a command and wait for the reply carrying the same nonce.
    async fn request(&mut self, command: &str, args: Value) -> Result<Value, SendError> {
        let stream = self.stream.as_mut().ok_or(SendError::NotConnected)?;
        let nonce = Uuid::new_v4().to_string();
        let body = json!({ "cmd": command, "args": args, "nonce": nonce });

        let exchange = async {
            write_frame(stream.as_mut(), Opcode::Frame, &body).await?;
            loop {
                let (opcode, payload) = read_frame(stream.as_mut()).await?;
                match opcode {
                    Opcode::Frame if payload["nonce"] == nonce.as_str() => {
                        return Ok::<_, FrameError>(Some(payload));
                    }
                    Opcode::Ping => write_frame(stream.as_mut(), Opcode::Pong, &payload).await?,
                    Opcode::Close => return Ok(None),
                    _ => debug!(?opcode, "Skipping unrelated IPC frame"),
                }
            }
        };

        let timed = timeout(self.io_timeout, exchange).await;
        let outcome: Result<Option<Value>, FrameError> = match timed {
            Ok(outcome) => outcome,
            Err(_) => {
                self.drop_stream();
                return Err(SendError::Timeout(self.io_timeout));
            }
        };

        match outcome {
            Ok(Some(reply)) if reply["evt"] == "ERROR" => Err(SendError::Rejected(error_message(&reply))),
            Ok(Some(reply)) => Ok(reply),
            Ok(None) => {
                self.drop_stream();
                Err(SendError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "endpoint closed the connection",
                )))
            }
            Err(e) => {
                self.drop_stream();
                Err(match e {
                    FrameError::Io(io) => SendError::Io(io),
                    other => SendError::Protocol(other.to_string()),
                })
            }
        }
    }

    fn drop_stream(&mut self) {
        if self.stream.take().is_some() {
            debug!(endpoint = ?self.endpoint, "Dropped Discord IPC stream");
        }
        self.endpoint = None;
    }
}

#[async_trait]
impl PresenceChannel for DiscordIpcChannel {
    fn channel_type(&self) -> &str {
        "discord-ipc"
    }

    async fn connect(&mut self, identity: &str) -> Result<(), ConnectError> {
        self.drop_stream();

        let (endpoint, mut stream) = self.open_first().await?;
        match timeout(self.io_timeout, Self::handshake(&mut stream, identity)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(ConnectError::Timeout(self.io_timeout)),
        }

        info!(endpoint = %endpoint.display(), "Connected to Discord IPC");
        self.stream = Some(stream);
        self.endpoint = Some(endpoint);
        Ok(())
    }

    async fn set_status(&mut self, status: &PresenceStatus) -> Result<(), SendError> {
        let args = json!({
            "pid": std::process::id(),
            "activity": activity_payload(status),
        });
        self.request("SET_ACTIVITY", args).await.map(|_| ())
    }

    async fn clear_and_disconnect(&mut self) {
        if self.stream.is_none() {
            return;
        }

        let clear = json!({ "pid": std::process::id() });
        if let Err(e) = self.request("SET_ACTIVITY", clear).await {
            warn!(error = %e, "Failed to clear Discord activity");
        }

        if let Some(mut stream) = self.stream.take() {
            let close = timeout(
                self.io_timeout,
                write_frame(stream.as_mut(), Opcode::Close, &json!({})),
            )
            .await;
            if !matches!(close, Ok(Ok(()))) {
                debug!("Discord IPC close frame not delivered");
            }
        }
        self.endpoint = None;
        info!("Disconnected from Discord IPC");
    }
}

/// The `activity` object of a SET_ACTIVITY command.
pub fn activity_payload(status: &PresenceStatus) -> Value {
    let buttons: Vec<Value> = status
        .links
        .iter()
        .take(MAX_BUTTONS)
        .map(|link| json!({ "label": link.label, "url": link.url }))
        .collect();

    json!({
        "details": status.details,
        "state": status.state,
        "timestamps": { "start": status.started_at.timestamp() },
        "assets": {
            "large_image": status.imagery.large_key,
            "large_text": status.imagery.large_text,
            "small_image": status.imagery.small_key,
            "small_text": status.imagery.small_text,
        },
        "buttons": buttons,
        "instance": false,
    })
}

fn error_message(payload: &Value) -> String {
    payload["data"]["message"]
        .as_str()
        .or_else(|| payload["message"].as_str())
        .unwrap_or("no reason given")
        .to_string()
}

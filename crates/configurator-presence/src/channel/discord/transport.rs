//! Local IPC endpoints of the Discord client.

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncWrite};

/// Number of `discord-ipc-N` slots probed.
pub const IPC_SLOTS: u8 = 10;

/// A connected IPC byte stream.
pub trait IpcStream: AsyncRead + AsyncWrite + Unpin + Send + Sync {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send + Sync> IpcStream for T {}

/// Endpoints to probe on this platform, in order.
pub fn default_endpoints() -> Vec<PathBuf> {
    if cfg!(windows) {
        windows_endpoints()
    } else {
        unix_endpoints(|key| std::env::var(key).ok())
    }
}

/// Unix socket endpoints under the first set runtime/temp directory.
pub fn unix_endpoints(env: impl Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    let base = ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"]
        .iter()
        .find_map(|key| env(key).filter(|value| !value.is_empty()))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"));

    (0..IPC_SLOTS)
        .map(|slot| base.join(format!("discord-ipc-{slot}")))
        .collect()
}

/// Named pipe endpoints.
pub fn windows_endpoints() -> Vec<PathBuf> {
    (0..IPC_SLOTS)
        .map(|slot| PathBuf::from(format!(r"\\.\pipe\discord-ipc-{slot}")))
        .collect()
}

/// Open a stream to `endpoint`.
#[cfg(unix)]
pub async fn open(endpoint: &Path) -> io::Result<Box<dyn IpcStream>> {
    let stream = tokio::net::UnixStream::connect(endpoint).await?;
    Ok(Box::new(stream))
}

/// Open a stream to `endpoint`.
#[cfg(windows)]
pub async fn open(endpoint: &Path) -> io::Result<Box<dyn IpcStream>> {
    let client = tokio::net::windows::named_pipe::ClientOptions::new().open(endpoint)?;
    Ok(Box::new(client))
}

/// Open a stream to `endpoint`.
#[cfg(not(any(unix, windows)))]
pub async fn open(endpoint: &Path) -> io::Result<Box<dyn IpcStream>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("no IPC transport for {}", endpoint.display()),
    ))
}

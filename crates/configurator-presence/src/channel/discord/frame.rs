//! Discord IPC framing: `opcode: u32 LE`, `length: u32 LE`, JSON payload.

use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest payload accepted in either direction.
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

const HEADER_BYTES: usize = 8;

/// Frame opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Client identification.
    Handshake,
    /// Command or event payload.
    Frame,
    /// Connection is being closed.
    Close,
    /// Keep-alive request.
    Ping,
    /// Keep-alive answer.
    Pong,
}

impl Opcode {
    fn code(self) -> u32 {
        match self {
            Self::Handshake => 0,
            Self::Frame => 1,
            Self::Close => 2,
            Self::Ping => 3,
            Self::Pong => 4,
        }
    }

    fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Handshake),
            1 => Some(Self::Frame),
            2 => Some(Self::Close),
            3 => Some(Self::Ping),
            4 => Some(Self::Pong),
            _ => None,
        }
    }
}

/// Framing failures.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The underlying stream failed or closed.
    #[error("IPC stream error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload exceeds [`MAX_FRAME_BYTES`].
    #[error("IPC frame of {0} bytes exceeds the limit")]
    TooLarge(usize),

    /// The header carries an opcode outside 0..=4.
    #[error("Unknown IPC opcode {0}")]
    UnknownOpcode(u32),

    /// The payload is not valid JSON.
    #[error("Invalid IPC payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode one frame.
pub fn encode_frame(opcode: Opcode, payload: &Value) -> Result<Vec<u8>, FrameError> {
    let body = serde_json::to_vec(payload)?;
    if body.len() > MAX_FRAME_BYTES {
        return Err(FrameError::TooLarge(body.len()));
    }

    let mut frame = Vec::with_capacity(HEADER_BYTES + body.len());
    frame.extend_from_slice(&opcode.code().to_le_bytes());
    frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Write one frame and flush.
pub async fn write_frame<W>(writer: &mut W, opcode: Opcode, payload: &Value) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let frame = encode_frame(opcode, payload)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame.
pub async fn read_frame<R>(reader: &mut R) -> Result<(Opcode, Value), FrameError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut header = [0u8; HEADER_BYTES];
    reader.read_exact(&mut header).await?;

    let code = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;

    let opcode = Opcode::from_code(code).ok_or(FrameError::UnknownOpcode(code))?;
    if len > MAX_FRAME_BYTES {
        return Err(FrameError::TooLarge(len));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)?
    };
    Ok((opcode, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_layout() {
        let frame = encode_frame(Opcode::Handshake, &json!({"v": 1})).unwrap();
        let body = br#"{"v":1}"#;
        assert_eq!(&frame[0..4], &[0, 0, 0, 0]);
        assert_eq!(&frame[4..8], &(body.len() as u32).to_le_bytes());
        assert_eq!(&frame[8..], body);
    }

    #[tokio::test]
    async fn test_read_back_over_duplex() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        write_frame(&mut client, Opcode::Ping, &json!({"n": 7})).await.unwrap();

        let (opcode, payload) = read_frame(&mut server).await.unwrap();
        assert_eq!(opcode, Opcode::Ping);
        assert_eq!(payload, json!({"n": 7}));
    }

    #[tokio::test]
    async fn test_rejects_unknown_opcode_and_oversized_length() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        client.write_all(&9u32.to_le_bytes()).await.unwrap();
        client.write_all(&0u32.to_le_bytes()).await.unwrap();
        assert!(matches!(
            read_frame(&mut server).await,
            Err(FrameError::UnknownOpcode(9))
        ));

        client.write_all(&1u32.to_le_bytes()).await.unwrap();
        client
            .write_all(&((MAX_FRAME_BYTES + 1) as u32).to_le_bytes())
            .await
            .unwrap();
        assert!(matches!(
            read_frame(&mut server).await,
            Err(FrameError::TooLarge(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_stream_is_io_error() {
        let (client, mut server) = tokio::io::duplex(64);
        drop(client);
        assert!(matches!(read_frame(&mut server).await, Err(FrameError::Io(_))));
    }
}

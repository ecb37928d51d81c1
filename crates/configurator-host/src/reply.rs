//! Replies written to stdout for host commands.

use std::path::PathBuf;

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use configurator_settings::SettingsRecord;

/// One reply line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reply", rename_all = "kebab-case")]
pub enum HostReply {
    /// A project was opened.
    Opened {
        path: PathBuf,
        content: String,
        /// Local settings, `null` when the project has none yet.
        local_settings: Option<SettingsRecord>,
    },
    /// The project was written.
    Saved { path: PathBuf },
    /// No file was chosen.
    Cancelled,
    /// The command failed.
    Error { message: String },
}

/// Write `reply` as a single JSON line and flush.
pub async fn write_reply<W>(writer: &mut W, reply: &HostReply) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(reply)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_reply_lines() {
        let mut out = Vec::new();
        write_reply(
            &mut out,
            &HostReply::Saved {
                path: PathBuf::from("/tmp/a.project"),
            },
        )
        .await
        .unwrap();
        write_reply(&mut out, &HostReply::Cancelled).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0], json!({"reply": "saved", "path": "/tmp/a.project"}));
        assert_eq!(lines[1], json!({"reply": "cancelled"}));
    }
}

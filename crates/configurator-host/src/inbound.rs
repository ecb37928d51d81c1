//! Inbound event loop.
//!
//! Reads one JSON message per line, forwards UI events to the status bridge
//! and executes host commands against the project session. Malformed lines
//! are logged and skipped.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite};

use configurator_core::events::{HostCommand, InboundMessage};
use configurator_core::result::AppResult;
use configurator_core::traits::file_host::FileIo;
use configurator_presence::bridge::AppStatusBridge;

use crate::dialogs::SuppliedPath;
use crate::reply::{HostReply, write_reply};
use crate::session::ProjectSession;

/// Why the event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The input stream ended.
    EndOfInput,
    /// A `quit` command was received.
    Quit,
    /// The shutdown signal fired.
    Signal,
}

/// The headless host: a project session plus a reply sink.
pub struct Host<F, W> {
    session: ProjectSession<F>,
    bridge: AppStatusBridge,
    replies: W,
}

impl<F, W> Host<F, W>
where
    F: FileIo,
    W: AsyncWrite + Unpin,
{
    pub fn new(session: ProjectSession<F>, bridge: AppStatusBridge, replies: W) -> Self {
        Self {
            session,
            bridge,
            replies,
        }
    }

    /// The reply sink.
    pub fn replies(&self) -> &W {
        &self.replies
    }

    /// Process `input` until it ends, a `quit` arrives, or `shutdown` fires.
    pub async fn run<R, S>(&mut self, input: R, shutdown: S) -> Exit
    where
        R: AsyncBufRead + Unpin,
        S: Future<Output = ()>,
    {
        let mut lines = input.lines();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if let Some(exit) = self.handle_line(&line).await {
                            return exit;
                        }
                    }
                    Ok(None) => {
                        tracing::info!("Input closed");
                        return Exit::EndOfInput;
                    }
                    Err(e) => {
                        tracing::error!("Failed to read input: {}", e);
                        return Exit::EndOfInput;
                    }
                },
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received");
                    return Exit::Signal;
                }
            }
        }
    }

    /// Handle a single input line. Returns `Some` when the host should stop.
    pub async fn handle_line(&mut self, line: &str) -> Option<Exit> {
        if line.trim().is_empty() {
            return None;
        }

        match InboundMessage::parse(line) {
            Ok(InboundMessage::Event(event)) => {
                tracing::debug!("UI event: {:?}", event);
                self.bridge.on_ui_event(&event);
                None
            }
            Ok(InboundMessage::Command(command)) => self.handle_command(command).await,
            Err(e) => {
                tracing::warn!("Skipping malformed input line: {}", e);
                None
            }
        }
    }

    async fn handle_command(&mut self, command: HostCommand) -> Option<Exit> {
        let reply = match command {
            HostCommand::Open { path } => {
                let result = self.session.open(&SuppliedPath::new(path)).await;
                opened_reply(result.map(|p| p.cloned()))
            }
            HostCommand::Save { content } => {
                saved_reply(self.session.save(&SuppliedPath::cancelled(), content).await)
            }
            HostCommand::SaveAs { path, content } => {
                saved_reply(self.session.save_as(&SuppliedPath::new(path), content).await)
            }
            HostCommand::RestartPresence => {
                match self.bridge.controller() {
                    Some(controller) => controller.start(),
                    None => tracing::warn!("Presence is disabled, nothing to restart"),
                }
                return None;
            }
            HostCommand::Quit => return Some(Exit::Quit),
        };

        if let Err(e) = write_reply(&mut self.replies, &reply).await {
            tracing::warn!("Failed to write reply: {}", e);
        }
        None
    }
}

fn opened_reply(result: AppResult<Option<crate::session::OpenProject>>) -> HostReply {
    match result {
        Ok(Some(project)) => HostReply::Opened {
            path: project.path,
            content: project.content,
            local_settings: project.local_settings,
        },
        Ok(None) => HostReply::Cancelled,
        Err(e) => failed(e),
    }
}

fn saved_reply(result: AppResult<Option<std::path::PathBuf>>) -> HostReply {
    match result {
        Ok(Some(path)) => HostReply::Saved { path },
        Ok(None) => HostReply::Cancelled,
        Err(e) => failed(e),
    }
}

fn failed(e: configurator_core::AppError) -> HostReply {
    tracing::warn!("Command failed: {}", e);
    HostReply::Error {
        message: e.to_string(),
    }
}

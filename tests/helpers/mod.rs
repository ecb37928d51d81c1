//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use configurator_core::types::presence::PresenceProfile;
use configurator_core::types::presence::PresenceStatus;
use configurator_host::{Host, LocalFileIo, ProjectSession};
use configurator_presence::channel::memory::ChannelOp;
use configurator_presence::{AppStatusBridge, ControllerSettings, MemoryChannel, PresenceController};
use configurator_settings::SettingsStore;

/// A host wired to an in-memory presence channel inside a temp directory
pub struct TestHost {
    /// Root of all files the test touches
    pub dir: TempDir,
    /// Shared view of the presence channel
    pub channel: MemoryChannel,
    /// Presence controller handle
    pub controller: PresenceController,
    /// Controller task
    pub task: JoinHandle<()>,
    /// The host under test; replies are collected in memory
    pub host: Host<LocalFileIo, Vec<u8>>,
}

impl TestHost {
    /// Create a host and wait until presence shows the idle status
    pub async fn connected() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let channel = MemoryChannel::new();
        let settings = ControllerSettings {
            identity: "1234".to_string(),
            // Refresh re-sends would interleave with the asserted sequence.
            refresh_interval: Duration::ZERO,
            retry_delay: Duration::from_secs(30),
            profile: PresenceProfile::default(),
        };
        let (controller, task) = PresenceController::spawn(channel.clone(), settings);
        let bridge = AppStatusBridge::new(controller.clone());
        let session = ProjectSession::new(
            LocalFileIo,
            SettingsStore::new(dir.path().join("global")),
            bridge.clone(),
        );
        let host = Host::new(session, bridge, Vec::new());

        controller.start();
        let test_host = Self {
            dir,
            channel,
            controller,
            task,
            host,
        };
        test_host.wait_for_statuses(1).await;
        test_host
    }

    /// Path inside the temp directory
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a project file
    pub async fn write_project(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.expect("Failed to create dir");
        }
        tokio::fs::write(&path, content)
            .await
            .expect("Failed to write project");
        path
    }

    /// Wait until at least `count` status updates reached the channel
    pub async fn wait_for_statuses(&self, count: usize) {
        self.channel
            .wait_until(|calls| {
                calls
                    .iter()
                    .filter(|c| matches!(c.op, ChannelOp::SetStatus(_)))
                    .count()
                    >= count
            })
            .await;
    }

    /// `(details, state)` of every status sent so far
    pub fn texts(&self) -> Vec<(String, String)> {
        self.channel
            .statuses()
            .into_iter()
            .map(|s: PresenceStatus| (s.details, s.state))
            .collect()
    }

    /// Replies written by the host, parsed
    pub fn replies(&self) -> Vec<Value> {
        String::from_utf8(self.host.replies().clone())
            .expect("Replies are not UTF-8")
            .lines()
            .map(|l| serde_json::from_str(l).expect("Reply is not JSON"))
            .collect()
    }
}

/// Build NDJSON input from values
pub fn ndjson(lines: &[Value]) -> String {
    lines.iter().map(|l| format!("{l}\n")).collect()
}

/// Shorthand for a `(details, state)` pair
pub fn text(details: &str, state: &str) -> (String, String) {
    (details.to_string(), state.to_string())
}

/// Location of the local settings file of `project`
pub fn local_settings_file(project: &Path) -> PathBuf {
    SettingsStore::local_path(project)
}

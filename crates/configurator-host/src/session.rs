//! The open project and its file operations.
//!
//! Every operation reports its progress through the [`AppStatusBridge`].
//! Failures of the file layer are returned to the caller and never turn
//! into a presence status.

use std::path::{Path, PathBuf};

use configurator_core::error::AppError;
use configurator_core::result::AppResult;
use configurator_core::traits::file_host::{FileDialogs, FileIo, OpenDialogOptions};
use configurator_presence::bridge::{AppStatusBridge, FileOutcome, display_name};
use configurator_settings::{SettingsRecord, SettingsStore};

/// Name suggested by the save dialog when nothing is open.
const UNTITLED_PROJECT: &str = "untitled.project";

/// A project file loaded into the session.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenProject {
    /// Where the project lives.
    pub path: PathBuf,
    /// Content as last read or written.
    pub content: String,
    /// Local settings stored next to the project, if any.
    pub local_settings: Option<SettingsRecord>,
}

/// Owns the currently open project.
pub struct ProjectSession<F> {
    files: F,
    store: SettingsStore,
    bridge: AppStatusBridge,
    current: Option<OpenProject>,
}

impl<F: FileIo> ProjectSession<F> {
    pub fn new(files: F, store: SettingsStore, bridge: AppStatusBridge) -> Self {
        Self {
            files,
            store,
            bridge,
            current: None,
        }
    }

    /// The open project, if any.
    pub fn current(&self) -> Option<&OpenProject> {
        self.current.as_ref()
    }

    /// Pick a project through `dialogs` and load it.
    ///
    /// Returns `Ok(None)` when the dialog was cancelled. Unreadable local
    /// settings are logged and the project opens without them.
    pub async fn open(&mut self, dialogs: &dyn FileDialogs) -> AppResult<Option<&OpenProject>> {
        let picked = dialogs
            .open_file_dialog(&OpenDialogOptions::project_files())
            .await;
        self.bridge.on_file_outcome(&FileOutcome::Opened {
            picked: picked.is_some(),
        });
        let Some(path) = picked else {
            return Ok(None);
        };

        let file_name = display_name(&path);
        let content = match self.files.read_file(&path).await {
            Ok(content) => content,
            Err(e) => {
                self.bridge.on_file_outcome(&FileOutcome::Read {
                    file_name,
                    succeeded: false,
                });
                return Err(e.into());
            }
        };

        let local_settings = match self.store.load_local(&path).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Ignoring local settings of {}: {}", path.display(), e);
                None
            }
        };

        self.bridge.on_file_outcome(&FileOutcome::Read {
            file_name,
            succeeded: true,
        });
        tracing::info!("Opened project {}", path.display());

        Ok(Some(&*self.current.insert(OpenProject {
            path,
            content,
            local_settings,
        })))
    }

    /// Write `content` to the open project, asking for a path when nothing
    /// is open.
    ///
    /// Returns the written path, or `Ok(None)` when the dialog was cancelled.
    pub async fn save(
        &mut self,
        dialogs: &dyn FileDialogs,
        content: String,
    ) -> AppResult<Option<PathBuf>> {
        match self.current.as_ref().map(|p| p.path.clone()) {
            Some(path) => self.write(path, content).await.map(Some),
            None => self.save_as(dialogs, content).await,
        }
    }

    /// Write `content` to a path picked through `dialogs`.
    ///
    /// Local settings of the open project are carried over when the new
    /// location is in another directory.
    pub async fn save_as(
        &mut self,
        dialogs: &dyn FileDialogs,
        content: String,
    ) -> AppResult<Option<PathBuf>> {
        let suggested = self
            .current
            .as_ref()
            .and_then(|p| display_name(&p.path))
            .unwrap_or_else(|| UNTITLED_PROJECT.to_string());

        match dialogs.save_file_dialog(&suggested).await {
            Some(path) => self.write(path, content).await.map(Some),
            None => Ok(None),
        }
    }

    async fn write(&mut self, path: PathBuf, content: String) -> AppResult<PathBuf> {
        let file_name = display_name(&path);
        self.bridge.on_file_outcome(&FileOutcome::Saving);

        if let Err(e) = self.files.write_file(&path, &content).await {
            self.bridge.on_file_outcome(&FileOutcome::Saved {
                file_name,
                succeeded: false,
            });
            return Err(AppError::from(e));
        }

        let previous = self.current.take();
        let moved = previous.as_ref().is_some_and(|p| {
            SettingsStore::local_path(&p.path) != SettingsStore::local_path(&path)
        });
        let local_settings = previous.and_then(|p| p.local_settings);
        if let (true, Some(record)) = (moved, &local_settings) {
            self.preserve_local_settings(&path, record).await;
        }

        self.bridge.on_file_outcome(&FileOutcome::Saved {
            file_name,
            succeeded: true,
        });
        tracing::info!("Saved project {}", path.display());

        self.current = Some(OpenProject {
            path: path.clone(),
            content,
            local_settings,
        });
        Ok(path)
    }

    async fn preserve_local_settings(&self, path: &Path, record: &SettingsRecord) {
        if let Err(e) = self.store.save_local(path, record).await {
            tracing::warn!("Failed to keep local settings for {}: {}", path.display(), e);
        }
    }
}

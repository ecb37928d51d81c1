//! File dialog and file I/O collaborator traits.
//!
//! The dialogs belong to the UI layer; the host only depends on these
//! contracts.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FileIoError;

/// A named extension filter shown in a file dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogFilter {
    /// Display name of the filter.
    pub name: String,
    /// Accepted extensions without the dot; `*` accepts everything.
    pub extensions: Vec<String>,
}

impl DialogFilter {
    /// Whether `path` passes this filter.
    pub fn accepts(&self, path: &Path) -> bool {
        if self.extensions.iter().any(|ext| ext == "*") {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Options for the open-file dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDialogOptions {
    /// Filters offered to the user.
    pub filters: Vec<DialogFilter>,
}

impl OpenDialogOptions {
    /// The project-file filters: `*.project` first, then everything.
    pub fn project_files() -> Self {
        Self {
            filters: vec![
                DialogFilter {
                    name: "Project Files".to_string(),
                    extensions: vec!["project".to_string()],
                },
                DialogFilter {
                    name: "All Files".to_string(),
                    extensions: vec!["*".to_string()],
                },
            ],
        }
    }
}

impl Default for OpenDialogOptions {
    fn default() -> Self {
        Self::project_files()
    }
}

/// File pickers provided by the UI layer.
///
/// `None` means the user cancelled.
#[async_trait]
pub trait FileDialogs: Send + Sync {
    /// Ask the user for a file to open.
    async fn open_file_dialog(&self, options: &OpenDialogOptions) -> Option<PathBuf>;

    /// Ask the user where to save, suggesting `default_name`.
    async fn save_file_dialog(&self, default_name: &str) -> Option<PathBuf>;
}

/// Raw UTF-8 file passthrough.
#[async_trait]
pub trait FileIo: Send + Sync {
    /// Read a whole file as UTF-8.
    async fn read_file(&self, path: &Path) -> Result<String, FileIoError>;

    /// Replace a file's content.
    async fn write_file(&self, path: &Path, content: &str) -> Result<(), FileIoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_filter() {
        let options = OpenDialogOptions::project_files();
        assert!(options.filters[0].accepts(Path::new("/a/tanks.project")));
        assert!(options.filters[0].accepts(Path::new("/a/TANKS.PROJECT")));
        assert!(!options.filters[0].accepts(Path::new("/a/tanks.json")));
        assert!(options.filters[1].accepts(Path::new("/a/no_extension")));
    }
}

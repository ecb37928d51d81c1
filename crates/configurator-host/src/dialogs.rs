//! File dialogs for the headless host.
//!
//! There is no window to show a picker in, so the "user's choice" is the
//! path carried by the inbound command.

use std::path::PathBuf;

use async_trait::async_trait;

use configurator_core::traits::file_host::{FileDialogs, OpenDialogOptions};

/// Dialogs that answer with a path fixed up front, or cancel when there is
/// none.
#[derive(Debug, Clone, Default)]
pub struct SuppliedPath {
    path: Option<PathBuf>,
}

impl SuppliedPath {
    /// Dialogs answering with `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Dialogs that always cancel.
    pub fn cancelled() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileDialogs for SuppliedPath {
    async fn open_file_dialog(&self, options: &OpenDialogOptions) -> Option<PathBuf> {
        let path = self.path.as_ref()?;
        if options.filters.is_empty() || options.filters.iter().any(|f| f.accepts(path)) {
            Some(path.clone())
        } else {
            tracing::debug!("{} rejected by every dialog filter", path.display());
            None
        }
    }

    async fn save_file_dialog(&self, _default_name: &str) -> Option<PathBuf> {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configurator_core::traits::file_host::DialogFilter;

    #[tokio::test]
    async fn test_open_respects_filters() {
        let only_projects = OpenDialogOptions {
            filters: vec![DialogFilter {
                name: "Project Files".to_string(),
                extensions: vec!["project".to_string()],
            }],
        };
        let dialogs = SuppliedPath::new("/games/heat/tanks.txt");

        assert_eq!(dialogs.open_file_dialog(&only_projects).await, None);
        assert_eq!(
            dialogs
                .open_file_dialog(&OpenDialogOptions::project_files())
                .await,
            Some(PathBuf::from("/games/heat/tanks.txt"))
        );
    }

    #[tokio::test]
    async fn test_cancelled() {
        let dialogs = SuppliedPath::cancelled();
        assert_eq!(dialogs.open_file_dialog(&OpenDialogOptions::default()).await, None);
        assert_eq!(dialogs.save_file_dialog("tanks.project").await, None);
    }
}

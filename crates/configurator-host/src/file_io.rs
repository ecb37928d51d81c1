//! UTF-8 file passthrough on the local filesystem.

use std::path::Path;

use async_trait::async_trait;

use configurator_core::error::FileIoError;
use configurator_core::traits::file_host::FileIo;

/// [`FileIo`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileIo;

#[async_trait]
impl FileIo for LocalFileIo {
    async fn read_file(&self, path: &Path) -> Result<String, FileIoError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FileIoError::from_io(path, e))
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<(), FileIoError> {
        tokio::fs::write(path, content)
            .await
            .map_err(|e| FileIoError::from_io(path, e))?;
        tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

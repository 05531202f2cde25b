// file: src/storage/files.rs
// description: stores uploaded pdf bytes under generated names
// reference: https://docs.rs/tokio/latest/tokio/fs

use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persists `bytes` and returns where they were written.
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf>;

    /// Removes a stored file. Missing files are not an error.
    async fn delete(&self, path: &Path) -> Result<()>;
}

pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            PipelineError::Storage(format!(
                "Failed to create upload directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let path = self.root.join(format!("{}.pdf", Uuid::new_v4()));
        if let Err(e) = fs::write(&path, bytes).await {
            remove_partial(&path).await;
            return Err(PipelineError::Storage(format!(
                "Failed to store {}: {}",
                original_name, e
            )));
        }

        info!(
            "Stored {} ({} bytes) as {}",
            original_name,
            bytes.len(),
            path.display()
        );
        Ok(path)
    }

    async fn delete(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!("Deleted stored file {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PipelineError::Storage(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

// A failed write may leave a truncated file behind.
async fn remove_partial(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => debug!("Removed partially written {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove partial file {}: {}", path.display(), e),
    }
}

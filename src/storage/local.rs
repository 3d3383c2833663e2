//! Local filesystem storage implementation.
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the
//! target, so a crash mid-write leaves the previous content intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::VisitedSet;
use crate::storage::VisitedStore;

/// Visited set stored as a JSON file on local disk.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl VisitedStore for LocalStorage {
    async fn load(&self) -> Result<VisitedSet> {
        let bytes = self
            .read_bytes()
            .await
            .map_err(|e| AppError::store(format!("reading {}: {e}", self.path.display())))?;

        match bytes {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::store(format!("malformed {}: {e}", self.path.display()))
            }),
            None => {
                log::info!(
                    "No visited set at {}, starting fresh",
                    self.path.display()
                );
                Ok(VisitedSet::new())
            }
        }
    }

    async fn save(&self, visited: &VisitedSet) -> Result<()> {
        let bytes = serde_json::to_vec(visited)?;
        self.write_bytes(&bytes)
            .await
            .map_err(|e| AppError::store(format!("writing {}: {e}", self.path.display())))?;
        log::debug!(
            "Saved {} visited ids to {}",
            visited.len(),
            self.path.display()
        );
        Ok(())
    }
}

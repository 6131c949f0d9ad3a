//! Local filesystem history store.
//!
//! Writes go to a sibling temp file first and are renamed into place, so
//! an interrupted save leaves the previous history intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::History;
use crate::storage::HistoryStore;

/// JSON file history backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a store backed by the given JSON file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                tokio::fs::create_dir_all(parent).await?;
            }
            _ => {}
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
impl HistoryStore for LocalStorage {
    async fn load(&self) -> Result<History> {
        match self.read_bytes().await? {
            Some(bytes) => {
                let history: History = serde_json::from_slice(&bytes)?;
                log::debug!(
                    "Loaded {} history entries from {}",
                    history.len(),
                    self.path.display()
                );
                Ok(history)
            }
            None => {
                log::info!(
                    "No history at {}; starting empty",
                    self.path.display()
                );
                Ok(History::new())
            }
        }
    }

    async fn save(&self, history: &History) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(history)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "History saved to {} ({} entries)",
            self.path.display(),
            history.len()
        );
        Ok(())
    }
}

//! Local filesystem state store.
//!
//! Writes go to a temporary sibling file which is flushed, synced and then
//! renamed over the record, so a reader sees either the old or the new state.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ServerStatus;
use crate::storage::{StateStore, state_file_name};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    root_dir: PathBuf,
}

impl LocalStateStore {
    /// Create a new LocalStateStore rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Full path of the record for `key`.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(state_file_name(key))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let written = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            file.sync_all().await?;
            Ok::<_, std::io::Error>(())
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Io(e));
        }

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl StateStore for LocalStateStore {
    async fn load(&self, key: &str) -> Result<Option<ServerStatus>> {
        match self.read_bytes(&self.path(key)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, server: &ServerStatus) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(server)?;
        self.write_bytes(&self.path(key), &bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn faerie(status: &str) -> ServerStatus {
        ServerStatus {
            name: "Faerie".to_string(),
            status: status.to_string(),
            congestion: "Standard".to_string(),
            creation: "2023-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path());

        assert!(store.load("Faerie").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path());

        store.save("Faerie", &faerie("Online")).await.unwrap();

        assert_eq!(store.load("Faerie").await.unwrap(), Some(faerie("Online")));
        assert!(tmp.path().join(".status-checker_state_Faerie.json").exists());
    }

    #[tokio::test]
    async fn test_save_overwrites_and_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path());

        store.save("Faerie", &faerie("Online")).await.unwrap();
        store.save("Faerie", &faerie("Maintenance")).await.unwrap();

        assert_eq!(store.load("Faerie").await.unwrap(), Some(faerie("Maintenance")));
        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_error() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path());
        std::fs::write(store.path("Faerie"), b"{\"name\": \"Fae").unwrap();

        assert!(matches!(store.load("Faerie").await, Err(AppError::Json(_))));
    }

    #[tokio::test]
    async fn test_save_creates_state_dir() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path().join("nested/state"));

        store.save("Faerie", &faerie("Online")).await.unwrap();
        assert!(store.load("Faerie").await.unwrap().is_some());
    }
}

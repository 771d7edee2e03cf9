//! Byte-level file storage used by the manager
//!
//! The manager never touches the filesystem directly; it goes through the
//! [`Storage`] trait so hosts can redirect persistence and tests can inject
//! failures.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

/// Storage backend for the configuration file
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether a file exists at `path`
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Create an empty file at `path` if none exists
    async fn create(&self, path: &Path) -> io::Result<()>;

    /// Read the whole file
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the file's contents
    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Local filesystem storage
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStorage;

#[async_trait]
impl Storage for FileStorage {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        match tokio::fs::metadata(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, path: &Path) -> io::Result<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let result = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await;

        match result {
            Ok(_) => {
                debug!("Created empty configuration file at {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let bytes = tokio::fs::read(path).await?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(bytes)
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_makes_parents_and_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("app.json");

        assert!(!FileStorage.exists(&path).await.unwrap());
        FileStorage.create(&path).await.unwrap();

        assert!(FileStorage.exists(&path).await.unwrap());
        assert!(FileStorage.read(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_keeps_existing_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.json");
        FileStorage.write(&path, b"{}").await.unwrap();

        FileStorage.create(&path).await.unwrap();

        assert_eq!(FileStorage.read(&path).await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_write_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.yaml");

        FileStorage.write(&path, b"a: 1\nb: 2\n").await.unwrap();
        FileStorage.write(&path, b"c: 3\n").await.unwrap();

        assert_eq!(FileStorage.read(&path).await.unwrap(), b"c: 3\n");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = FileStorage
            .read(&temp_dir.path().join("missing.toml"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

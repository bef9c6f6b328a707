//! Capability-scoped filesystem blob storage.
//!
//! All I/O goes through a `cap-std` directory handle, so no path handed to
//! the adapter can reach outside the upload root.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use crate::storage::{
    domain::{BlobFileName, StoredBlob, ensure_single_component, unique_storage_path},
    ports::{BlobStorage, BlobStorageError, BlobStorageResult},
};

/// Blob storage rooted at a single directory.
#[derive(Debug, Clone)]
pub struct FilesystemBlobStorage {
    root: Arc<Dir>,
}

impl FilesystemBlobStorage {
    /// Opens the upload root, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStorageError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(root: &Utf8Path) -> BlobStorageResult<Self> {
        std::fs::create_dir_all(root).map_err(BlobStorageError::io)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(BlobStorageError::io)?;
        Ok(Self::from_dir(dir))
    }

    /// Wraps an already opened directory handle.
    #[must_use]
    pub fn from_dir(dir: Dir) -> Self {
        Self {
            root: Arc::new(dir),
        }
    }
}

#[async_trait]
impl BlobStorage for FilesystemBlobStorage {
    async fn store(&self, file_name: &BlobFileName, bytes: &[u8]) -> BlobStorageResult<StoredBlob> {
        let path = unique_storage_path(file_name);
        let root = Arc::clone(&self.root);
        let target = path.clone();
        let contents = bytes.to_vec();

        tokio::task::spawn_blocking(move || root.write(target.as_str(), contents))
            .await
            .map_err(BlobStorageError::io)?
            .map_err(BlobStorageError::io)?;

        tracing::debug!(path = %path, size = bytes.len(), "stored attachment blob");
        Ok(StoredBlob::new(file_name.clone(), path))
    }

    async fn retrieve(&self, path: &str) -> BlobStorageResult<Vec<u8>> {
        ensure_single_component(path)?;
        let root = Arc::clone(&self.root);
        let target = path.to_owned();

        tokio::task::spawn_blocking(move || root.read(target.as_str()))
            .await
            .map_err(BlobStorageError::io)?
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => BlobStorageError::NotFound(path.to_owned()),
                _ => BlobStorageError::io(err),
            })
    }

    async fn remove(&self, path: &str) -> BlobStorageResult<()> {
        ensure_single_component(path)?;
        let root = Arc::clone(&self.root);
        let target = path.to_owned();

        let removed = tokio::task::spawn_blocking(move || root.remove_file(target.as_str()))
            .await
            .map_err(BlobStorageError::io)?;
        match removed {
            Ok(()) => {
                tracing::debug!(path = %path, "removed attachment blob");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(BlobStorageError::io(err)),
        }
    }
}

//! In-memory blob storage for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::storage::{
    domain::{BlobFileName, StoredBlob, ensure_single_component, unique_storage_path},
    ports::{BlobStorage, BlobStorageError, BlobStorageResult},
};

/// Thread-safe map-backed blob storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStorage {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryBlobStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn store(&self, file_name: &BlobFileName, bytes: &[u8]) -> BlobStorageResult<StoredBlob> {
        let path = unique_storage_path(file_name);
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| BlobStorageError::io(std::io::Error::other(err.to_string())))?;
        blobs.insert(path.clone(), bytes.to_vec());
        Ok(StoredBlob::new(file_name.clone(), path))
    }

    async fn retrieve(&self, path: &str) -> BlobStorageResult<Vec<u8>> {
        ensure_single_component(path)?;
        let blobs = self
            .blobs
            .read()
            .map_err(|err| BlobStorageError::io(std::io::Error::other(err.to_string())))?;
        blobs
            .get(path)
            .cloned()
            .ok_or_else(|| BlobStorageError::NotFound(path.to_owned()))
    }

    async fn remove(&self, path: &str) -> BlobStorageResult<()> {
        ensure_single_component(path)?;
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| BlobStorageError::io(std::io::Error::other(err.to_string())))?;
        blobs.remove(path);
        Ok(())
    }
}

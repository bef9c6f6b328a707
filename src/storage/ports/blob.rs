//! Blob storage port.

use crate::storage::domain::{BlobFileName, StorageDomainError, StoredBlob};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for blob storage operations.
pub type BlobStorageResult<T> = Result<T, BlobStorageError>;

/// Storage for attachment bytes.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores `bytes` under a new path derived from `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStorageError::Io`] when the bytes cannot be written.
    async fn store(&self, file_name: &BlobFileName, bytes: &[u8]) -> BlobStorageResult<StoredBlob>;

    /// Reads the bytes stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStorageError::NotFound`] when nothing is stored at
    /// `path`, or [`BlobStorageError::Invalid`] when `path` is not a storage
    /// path this backend could have produced.
    async fn retrieve(&self, path: &str) -> BlobStorageResult<Vec<u8>>;

    /// Deletes the bytes stored at `path`.
    ///
    /// Deleting a path that holds nothing succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`BlobStorageError::Invalid`] when `path` is not a storage
    /// path, or [`BlobStorageError::Io`] when the backend cannot delete it.
    async fn remove(&self, path: &str) -> BlobStorageResult<()>;
}

/// Errors returned by blob storage implementations.
#[derive(Debug, Clone, Error)]
pub enum BlobStorageError {
    /// No blob exists at the path.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The path or file name was rejected.
    #[error(transparent)]
    Invalid(#[from] StorageDomainError),

    /// Filesystem or backend failure.
    #[error("blob storage I/O error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),
}

impl BlobStorageError {
    /// Wraps a backend error.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }
}

//! Error types for blob storage values.

use thiserror::Error;

/// Errors returned while validating blob storage values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageDomainError {
    /// The uploaded file name has no usable final component.
    #[error("invalid file name '{0}'")]
    InvalidFileName(String),

    /// The storage path is not a single path component.
    #[error("invalid storage path '{0}'")]
    InvalidStoragePath(String),
}

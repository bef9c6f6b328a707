//! Sanitized upload names and stored blob descriptors.

use super::StorageDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_FILE_NAME_CHARS: usize = 200;

/// Client-supplied file name reduced to a safe final path component.
///
/// Directory prefixes from either separator style are discarded, so
/// `../../etc/passwd` becomes `passwd` and `C:\photos\leak.png` becomes
/// `leak.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobFileName(String);

impl BlobFileName {
    /// Sanitizes a client-supplied file name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageDomainError::InvalidFileName`] when nothing usable
    /// remains after stripping directories and control characters.
    pub fn new(raw: &str) -> Result<Self, StorageDomainError> {
        let last = raw.rsplit(['/', '\\']).next().unwrap_or_default();
        let cleaned: String = last
            .chars()
            .filter(|ch| !ch.is_control())
            .take(MAX_FILE_NAME_CHARS)
            .collect();
        let trimmed = cleaned.trim();

        if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
            return Err(StorageDomainError::InvalidFileName(raw.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the sanitized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BlobFileName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BlobFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    file_name: BlobFileName,
    path: String,
}

impl StoredBlob {
    /// Creates a stored blob descriptor.
    #[must_use]
    pub fn new(file_name: BlobFileName, path: impl Into<String>) -> Self {
        Self {
            file_name,
            path: path.into(),
        }
    }

    /// Returns the sanitized original file name.
    #[must_use]
    pub const fn file_name(&self) -> &BlobFileName {
        &self.file_name
    }

    /// Returns the storage path used to retrieve the blob.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Checks that a storage path is one plain component.
///
/// # Errors
///
/// Returns [`StorageDomainError::InvalidStoragePath`] for empty paths,
/// separators and relative components.
pub(crate) fn ensure_single_component(path: &str) -> Result<(), StorageDomainError> {
    let is_valid = !path.is_empty()
        && path != "."
        && path != ".."
        && !path.contains(['/', '\\'])
        && !path.chars().any(char::is_control);
    if is_valid {
        Ok(())
    } else {
        Err(StorageDomainError::InvalidStoragePath(path.to_owned()))
    }
}

/// Builds a collision-free storage path for a sanitized name.
pub(crate) fn unique_storage_path(file_name: &BlobFileName) -> String {
    format!("{}-{}", uuid::Uuid::new_v4(), file_name.as_str())
}

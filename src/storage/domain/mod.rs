//! Blob storage value types.

mod error;
mod file_name;

pub use error::StorageDomainError;
pub use file_name::{BlobFileName, StoredBlob};
pub(crate) use file_name::{ensure_single_component, unique_storage_path};

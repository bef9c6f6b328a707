//! Port contract for attachment blob storage.

pub mod blob;

pub use blob::{BlobStorage, BlobStorageError, BlobStorageResult};

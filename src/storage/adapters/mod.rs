//! Blob storage adapters.
//!
//! - [`filesystem::FilesystemBlobStorage`]: files under one capability-scoped
//!   directory
//! - [`memory::InMemoryBlobStorage`]: map-backed storage for tests

pub mod filesystem;
pub mod memory;

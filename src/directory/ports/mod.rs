//! Port contract for the external directory.

pub mod directory;

pub use directory::{Directory, DirectoryError, DirectoryResult};

//! Port contract for committing conversions.

pub mod repository;

pub use repository::{
    ConversionRepository, ConversionRepositoryError, ConversionRepositoryResult,
};

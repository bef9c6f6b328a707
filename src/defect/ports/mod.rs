//! Port contract for defect persistence.

pub mod repository;

pub use repository::{DefectRepository, DefectRepositoryError, DefectRepositoryResult};

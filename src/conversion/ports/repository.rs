//! Atomic commit port for conversions.

use crate::defect::domain::{Defect, DefectId};
use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for conversion commits.
pub type ConversionRepositoryResult<T> = Result<T, ConversionRepositoryError>;

/// Persists a conversion as one unit.
#[async_trait]
pub trait ConversionRepository: Send + Sync {
    /// Inserts `task` and writes the status, link and update timestamp of
    /// `defect`, or does neither.
    ///
    /// The defect write only applies while the stored defect has no task
    /// link.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionRepositoryError::AlreadyConverted`] when the stored
    /// defect is already linked, or [`ConversionRepositoryError::DefectNotFound`]
    /// when it does not exist. Nothing is written in either case.
    async fn commit(&self, task: &Task, defect: &Defect) -> ConversionRepositoryResult<()>;
}

/// Errors returned by conversion repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ConversionRepositoryError {
    /// Another conversion of the defect committed first.
    #[error("defect {0} has already been converted")]
    AlreadyConverted(DefectId),

    /// The defect does not exist.
    #[error("defect not found: {0}")]
    DefectNotFound(DefectId),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ConversionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! Append-only repository port for defect history.

use crate::defect::domain::DefectId;
use crate::history::domain::{HistoryEntry, HistoryEntryId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for history repository operations.
pub type HistoryRepositoryResult<T> = Result<T, HistoryRepositoryError>;

/// History persistence contract.
///
/// Entries can only be appended and listed. Implementations must not offer
/// any way to rewrite or remove a stored entry.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryRepositoryError::DuplicateEntry`] when the entry
    /// identifier is already stored.
    async fn append(&self, entry: &HistoryEntry) -> HistoryRepositoryResult<()>;

    /// Returns every entry recorded for `defect_id`, oldest first.
    ///
    /// Entries sharing a creation timestamp are returned in append order.
    async fn list_for(&self, defect_id: DefectId) -> HistoryRepositoryResult<Vec<HistoryEntry>>;
}

/// Errors returned by history repository implementations.
#[derive(Debug, Clone, Error)]
pub enum HistoryRepositoryError {
    /// An entry with the same identifier already exists.
    #[error("duplicate history entry: {0}")]
    DuplicateEntry(HistoryEntryId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl HistoryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! Append-only ledger over a history repository.

use crate::defect::domain::DefectId;
use crate::error::ErrorKind;
use crate::history::{
    domain::HistoryEntry,
    ports::{HistoryRepository, HistoryRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for ledger operations.
#[derive(Debug, Clone, Error)]
pub enum HistoryLedgerError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] HistoryRepositoryError),
}

impl HistoryLedgerError {
    /// Every ledger failure is a storage failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Storage
    }
}

/// Result type for ledger operations.
pub type HistoryLedgerResult<T> = Result<T, HistoryLedgerError>;

/// Append-only audit log of defect actions.
pub struct HistoryLedger<R>
where
    R: HistoryRepository,
{
    repository: Arc<R>,
}

impl<R> Clone for HistoryLedger<R>
where
    R: HistoryRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> HistoryLedger<R>
where
    R: HistoryRepository,
{
    /// Creates a ledger over `repository`.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Appends `entry` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryLedgerError`] when the entry cannot be stored.
    pub async fn append(&self, entry: HistoryEntry) -> HistoryLedgerResult<HistoryEntry> {
        self.repository.append(&entry).await?;
        tracing::debug!(
            defect_id = %entry.defect_id(),
            action_type = %entry.action_type(),
            "history entry appended"
        );
        Ok(entry)
    }

    /// Lists the entries of `defect_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryLedgerError`] when the repository lookup fails.
    pub async fn list_for(&self, defect_id: DefectId) -> HistoryLedgerResult<Vec<HistoryEntry>> {
        let mut entries = self.repository.list_for(defect_id).await?;
        entries.sort_by_key(HistoryEntry::created_at);
        Ok(entries)
    }
}

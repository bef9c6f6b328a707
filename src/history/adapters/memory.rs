//! In-memory history repository.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::defect::domain::DefectId;
use crate::history::{
    domain::{HistoryEntry, HistoryEntryId},
    ports::{HistoryRepository, HistoryRepositoryError, HistoryRepositoryResult},
};

/// Thread-safe in-memory history repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryRepository {
    state: Arc<RwLock<HistoryState>>,
}

#[derive(Debug, Default)]
struct HistoryState {
    ids: HashSet<HistoryEntryId>,
    by_defect: HashMap<DefectId, Vec<HistoryEntry>>,
}

impl InMemoryHistoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries across all defects.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryRepositoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn entry_count(&self) -> HistoryRepositoryResult<usize> {
        let state = self.state.read().map_err(|err| {
            HistoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.ids.len())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, entry: &HistoryEntry) -> HistoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            HistoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.ids.insert(entry.id()) {
            return Err(HistoryRepositoryError::DuplicateEntry(entry.id()));
        }
        state
            .by_defect
            .entry(entry.defect_id())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn list_for(&self, defect_id: DefectId) -> HistoryRepositoryResult<Vec<HistoryEntry>> {
        let state = self.state.read().map_err(|err| {
            HistoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut entries = state.by_defect.get(&defect_id).cloned().unwrap_or_default();
        // Stable: equal timestamps keep append order.
        entries.sort_by_key(HistoryEntry::created_at);
        Ok(entries)
    }
}

//! Query service.

use super::dto::{DefectDetails, DefectSummary, TaskDetails};
use crate::defect::{
    domain::DefectId,
    ports::{DefectRepository, DefectRepositoryError},
};
use crate::directory::{
    domain::{User, UserId},
    ports::{Directory, DirectoryError},
};
use crate::error::ErrorKind;
use crate::history::{
    ports::HistoryRepository,
    services::{HistoryLedger, HistoryLedgerError},
};
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by read-model queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The defect does not exist.
    #[error("defect not found: {0}")]
    DefectNotFound(DefectId),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Loading defects failed.
    #[error(transparent)]
    Defects(#[from] DefectRepositoryError),

    /// Loading tasks failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Loading history failed.
    #[error(transparent)]
    History(#[from] HistoryLedgerError),
}

impl QueryError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DefectNotFound(_) | Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::Defects(_) | Self::Tasks(_) | Self::Directory(_) | Self::History(_) => {
                ErrorKind::Storage
            }
        }
    }
}

/// Result type for queries.
pub type QueryResult<T> = Result<T, QueryError>;

/// Read-model queries over the tracker stores.
pub struct TrackerQueries<D, T, H, R>
where
    D: DefectRepository,
    T: TaskRepository,
    H: HistoryRepository,
    R: Directory,
{
    defects: Arc<D>,
    tasks: Arc<T>,
    ledger: HistoryLedger<H>,
    directory: Arc<R>,
}

impl<D, T, H, R> TrackerQueries<D, T, H, R>
where
    D: DefectRepository,
    T: TaskRepository,
    H: HistoryRepository,
    R: Directory,
{
    /// Creates the query service.
    #[must_use]
    pub const fn new(defects: Arc<D>, tasks: Arc<T>, history: Arc<H>, directory: Arc<R>) -> Self {
        Self {
            defects,
            tasks,
            ledger: HistoryLedger::new(history),
            directory,
        }
    }

    /// Loads a defect with its reporter, attachments and history.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::DefectNotFound`] when the defect does not exist,
    /// or a storage variant when a lookup fails.
    pub async fn defect_details(&self, defect_id: DefectId) -> QueryResult<DefectDetails> {
        let defect = self
            .defects
            .find_by_id(defect_id)
            .await?
            .ok_or(QueryError::DefectNotFound(defect_id))?;
        let initiator = self.user(Some(defect.initiator_id())).await?;
        let attachments = self.defects.list_attachments(defect_id).await?;
        let history = self.ledger.list_for(defect_id).await?;
        tracing::debug!(defect_id = %defect_id, entries = history.len(), "defect details loaded");

        Ok(DefectDetails {
            defect: DefectSummary::from(&defect),
            initiator,
            attachments,
            history,
        })
    }

    /// Loads a task with its assignee, originating defect and that defect's
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TaskNotFound`] when the task does not exist, or a
    /// storage variant when a lookup fails.
    pub async fn task_details(&self, task_id: TaskId) -> QueryResult<TaskDetails> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(QueryError::TaskNotFound(task_id))?;
        let assignee = self.user(task.assignee_id()).await?;

        let (related_defect, related_history) = match task.related_defect_id() {
            Some(defect_id) => {
                let defect = self.defects.find_by_id(defect_id).await?;
                let history = self.ledger.list_for(defect_id).await?;
                (defect.as_ref().map(DefectSummary::from), history)
            }
            None => (None, Vec::new()),
        };

        Ok(TaskDetails {
            task,
            assignee,
            related_defect,
            related_history,
        })
    }

    async fn user(&self, id: Option<UserId>) -> QueryResult<Option<User>> {
        let Some(user_id) = id else {
            return Ok(None);
        };
        Ok(self.directory.resolve_user(user_id).await?)
    }
}

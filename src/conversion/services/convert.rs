//! Turns a defect into an assigned task.

use crate::conversion::{
    domain::{ConversionOutcome, UNKNOWN_ACTOR, assignment_text},
    ports::{ConversionRepository, ConversionRepositoryError},
};
use crate::defect::{
    domain::{DefectDomainError, DefectId},
    ports::{DefectRepository, DefectRepositoryError},
};
use crate::directory::{
    domain::UserId,
    ports::{Directory, DirectoryError},
};
use crate::error::ErrorKind;
use crate::history::{
    domain::{ActionType, HistoryEntry},
    ports::HistoryRepository,
    services::HistoryLedger,
};
use crate::task::domain::{Task, TaskDomainError, TaskDraft, parse_due_date};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for converting a defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertDefectRequest {
    /// Defect to convert.
    pub defect_id: DefectId,
    /// User the new task is assigned to.
    pub assignee_id: UserId,
    /// User performing the conversion; becomes the task creator.
    pub actor_id: UserId,
    /// Optional due date, RFC 3339 or a zone-less local date-time.
    pub due_date: Option<String>,
}

impl ConvertDefectRequest {
    /// Creates a request without a due date.
    #[must_use]
    pub const fn new(defect_id: DefectId, assignee_id: UserId, actor_id: UserId) -> Self {
        Self {
            defect_id,
            assignee_id,
            actor_id,
            due_date: None,
        }
    }

    /// Sets the raw due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}

/// Service-level errors for conversions.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The defect does not exist.
    #[error("defect not found: {0}")]
    DefectNotFound(DefectId),

    /// The defect already links to a task.
    #[error("defect {0} has already been converted")]
    AlreadyConverted(DefectId),

    /// The assignee or actor does not exist.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    /// The defect cannot be put in progress.
    #[error(transparent)]
    Defect(#[from] DefectDomainError),

    /// The due date is malformed.
    #[error(transparent)]
    Task(#[from] TaskDomainError),

    /// Loading the defect failed.
    #[error(transparent)]
    DefectRepository(#[from] DefectRepositoryError),

    /// The atomic commit failed.
    #[error(transparent)]
    Commit(#[from] ConversionRepositoryError),

    /// Resolving the assignee failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl ConversionError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DefectNotFound(_)
            | Self::Commit(ConversionRepositoryError::DefectNotFound(_)) => ErrorKind::NotFound,
            Self::AlreadyConverted(_)
            | Self::Defect(DefectDomainError::AlreadyConverted { .. })
            | Self::Commit(ConversionRepositoryError::AlreadyConverted(_)) => {
                ErrorKind::AlreadyConverted
            }
            Self::UnknownUser(_) => ErrorKind::Reference,
            Self::Defect(_) | Self::Task(_) => ErrorKind::Validation,
            Self::DefectRepository(_) | Self::Commit(_) | Self::Directory(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for conversions.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Defect-to-task conversion orchestrator.
pub struct ConversionService<D, K, H, R, C>
where
    D: DefectRepository,
    K: ConversionRepository,
    H: HistoryRepository,
    R: Directory,
    C: Clock + Send + Sync,
{
    defects: Arc<D>,
    conversions: Arc<K>,
    ledger: HistoryLedger<H>,
    directory: Arc<R>,
    clock: Arc<C>,
}

impl<D, K, H, R, C> Clone for ConversionService<D, K, H, R, C>
where
    D: DefectRepository,
    K: ConversionRepository,
    H: HistoryRepository,
    R: Directory,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            defects: Arc::clone(&self.defects),
            conversions: Arc::clone(&self.conversions),
            ledger: self.ledger.clone(),
            directory: Arc::clone(&self.directory),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<D, K, H, R, C> ConversionService<D, K, H, R, C>
where
    D: DefectRepository,
    K: ConversionRepository,
    H: HistoryRepository,
    R: Directory,
    C: Clock + Send + Sync,
{
    /// Creates a conversion service.
    #[must_use]
    pub const fn new(
        defects: Arc<D>,
        conversions: Arc<K>,
        history: Arc<H>,
        directory: Arc<R>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            defects,
            conversions,
            ledger: HistoryLedger::new(history),
            directory,
            clock,
        }
    }

    /// Converts a defect into a task assigned to `assignee_id`.
    ///
    /// The task insert and defect update commit atomically. The `assigned`
    /// history entry is appended afterwards; if that fails the conversion
    /// still succeeds and the outcome carries the error.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] when the defect is missing or already
    /// converted, the assignee or actor is unknown, the due date is
    /// malformed, the defect is closed or cancelled, or the commit fails.
    pub async fn convert(
        &self,
        request: ConvertDefectRequest,
    ) -> ConversionResult<ConversionOutcome> {
        let ConvertDefectRequest {
            defect_id,
            assignee_id,
            actor_id,
            due_date,
        } = request;

        let mut defect = self
            .defects
            .find_by_id(defect_id)
            .await?
            .ok_or(ConversionError::DefectNotFound(defect_id))?;
        if defect.is_converted() {
            return Err(ConversionError::AlreadyConverted(defect_id));
        }

        let assignee = self
            .directory
            .resolve_user(assignee_id)
            .await?
            .ok_or(ConversionError::UnknownUser(assignee_id))?;
        let actor_name = match self.directory.resolve_user(actor_id).await {
            Ok(Some(actor)) => actor.display_name(),
            Ok(None) => return Err(ConversionError::UnknownUser(actor_id)),
            Err(err) => {
                tracing::warn!(
                    actor_id = %actor_id,
                    error = %err,
                    "actor lookup failed; recording conversion with placeholder name"
                );
                UNKNOWN_ACTOR.to_owned()
            }
        };

        let mut draft = TaskDraft::from_defect(&defect, actor_id).with_assignee(assignee_id);
        if let Some(raw) = due_date {
            draft = draft.with_due_date(parse_due_date(&raw)?);
        }
        let task = Task::create(draft, &*self.clock);
        defect.mark_converted(task.id(), &*self.clock)?;

        self.conversions.commit(&task, &defect).await?;
        tracing::info!(
            defect_id = %defect_id,
            task_id = %task.id(),
            assignee_id = %assignee_id,
            "defect converted to task"
        );

        let entry = HistoryEntry::record(
            defect_id,
            actor_id,
            ActionType::Assigned,
            assignment_text(&assignee, &actor_name),
            &*self.clock,
        );
        let (history_entry, history_error) = self.ledger.append(entry).await.map_or_else(
            |err| {
                tracing::warn!(
                    defect_id = %defect_id,
                    task_id = %task.id(),
                    error = %err,
                    "conversion committed but the assigned entry was not recorded"
                );
                (None, Some(err))
            },
            |recorded| (Some(recorded), None),
        );

        Ok(ConversionOutcome {
            task,
            defect,
            history_entry,
            history_error,
        })
    }
}

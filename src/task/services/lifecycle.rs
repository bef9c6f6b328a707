//! Service layer for task creation, lookup and status changes.

use crate::directory::{
    domain::{ProjectId, UserId},
    ports::{Directory, DirectoryError},
};
use crate::error::ErrorKind;
use crate::history::{
    domain::{ActionType, HistoryEntry},
    ports::HistoryRepository,
    services::{HistoryLedger, HistoryLedgerError},
};
use crate::task::{
    domain::{
        ParseTaskStatusError, Task, TaskDomainError, TaskDraft, TaskId, TaskStatus, parse_due_date,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for changing a task's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    /// Task being changed.
    pub task_id: TaskId,
    /// Requested status name, for example `Done` or `in_progress`.
    pub status: String,
    /// Acting user.
    pub actor_id: UserId,
}

impl UpdateTaskStatusRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>, actor_id: UserId) -> Self {
        Self {
            task_id,
            status: status.into(),
            actor_id,
        }
    }
}

/// Request payload for creating a task directly, without a defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    name: String,
    description: String,
    project_id: ProjectId,
    creator_id: UserId,
    assignee_id: Option<UserId>,
    due_date: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        project_id: ProjectId,
        creator_id: UserId,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            project_id,
            creator_id,
            assignee_id: None,
            due_date: None,
        }
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets the raw due date, parsed when the task is created.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }
}

/// Outcome of a task status change.
///
/// The status change is committed whenever this value is returned. A failed
/// history append is reported through [`TaskStatusUpdate::history_error`].
#[derive(Debug, Clone)]
pub struct TaskStatusUpdate {
    /// The task after the change.
    pub task: Task,
    /// Status before the change.
    pub previous_status: TaskStatus,
    /// Entry appended to the related defect's history, if the task has one.
    pub history_entry: Option<HistoryEntry>,
    /// Why the `status_changed` entry could not be appended.
    pub history_error: Option<HistoryLedgerError>,
    /// The related defect's history after the change.
    ///
    /// Empty for tasks without a related defect, or when appending or
    /// reloading the history failed.
    pub related_history: Vec<HistoryEntry>,
}

impl TaskStatusUpdate {
    /// Returns `true` unless a history entry was due but not written.
    #[must_use]
    pub const fn is_fully_recorded(&self) -> bool {
        self.history_error.is_none()
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The requested status name is unknown.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The referenced user does not exist.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    /// The referenced project does not exist.
    #[error("unknown project: {0}")]
    UnknownProject(ProjectId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl TaskLifecycleError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::InvalidStatus(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::UnknownUser(_) | Self::UnknownProject(_) => ErrorKind::Reference,
            Self::Repository(_) | Self::Directory(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
pub struct TaskLifecycleService<T, H, R, C>
where
    T: TaskRepository,
    H: HistoryRepository,
    R: Directory,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    ledger: HistoryLedger<H>,
    directory: Arc<R>,
    clock: Arc<C>,
}

impl<T, H, R, C> Clone for TaskLifecycleService<T, H, R, C>
where
    T: TaskRepository,
    H: HistoryRepository,
    R: Directory,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            ledger: self.ledger.clone(),
            directory: Arc::clone(&self.directory),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T, H, R, C> TaskLifecycleService<T, H, R, C>
where
    T: TaskRepository,
    H: HistoryRepository,
    R: Directory,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, history: Arc<H>, directory: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            ledger: HistoryLedger::new(history),
            directory,
            clock,
        }
    }

    /// Changes a task's status.
    ///
    /// When the task came from a defect, one `status_changed` entry is
    /// appended to that defect's history and the history is reloaded into
    /// the result. The status is already committed at that point, so a failed
    /// append is logged and returned in [`TaskStatusUpdate::history_error`]
    /// and a failed reload leaves [`TaskStatusUpdate::related_history`] empty.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task does not exist, the status
    /// is unknown or not allowed from the current status, or the task update
    /// fails.
    pub async fn update_status(
        &self,
        request: UpdateTaskStatusRequest,
    ) -> TaskLifecycleResult<TaskStatusUpdate> {
        let UpdateTaskStatusRequest {
            task_id,
            status,
            actor_id,
        } = request;

        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))?;
        let target = TaskStatus::try_from(status.as_str())?;
        let previous_status = task.status();
        task.transition_to(target, &*self.clock)?;
        self.tasks.update(&task).await?;
        tracing::info!(
            task_id = %task_id,
            from = %previous_status,
            to = %target,
            "task status changed"
        );

        let Some(defect_id) = task.related_defect_id() else {
            return Ok(TaskStatusUpdate {
                task,
                previous_status,
                history_entry: None,
                history_error: None,
                related_history: Vec::new(),
            });
        };

        let appended = self
            .ledger
            .append(HistoryEntry::record(
                defect_id,
                actor_id,
                ActionType::StatusChanged,
                format!("Task status changed: {previous_status} -> {target}"),
                &*self.clock,
            ))
            .await;
        let entry = match appended {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(
                    task_id = %task_id,
                    defect_id = %defect_id,
                    error = %err,
                    "task status committed but the status_changed entry was not recorded"
                );
                return Ok(TaskStatusUpdate {
                    task,
                    previous_status,
                    history_entry: None,
                    history_error: Some(err),
                    related_history: Vec::new(),
                });
            }
        };

        let related_history = self.ledger.list_for(defect_id).await.unwrap_or_else(|err| {
            tracing::warn!(
                task_id = %task_id,
                defect_id = %defect_id,
                error = %err,
                "could not reload defect history after task status change"
            );
            Vec::new()
        });

        Ok(TaskStatusUpdate {
            task,
            previous_status,
            history_entry: Some(entry),
            history_error: None,
            related_history,
        })
    }

    /// Creates a task that is not tied to a defect.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the name is blank, the due date is
    /// malformed, the project, creator or assignee is unknown, or persistence
    /// fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest {
            name,
            description,
            project_id,
            creator_id,
            assignee_id,
            due_date,
        } = request;

        let mut draft = TaskDraft::new(&name, &description, project_id, creator_id)?;
        if let Some(raw) = due_date {
            draft = draft.with_due_date(parse_due_date(&raw)?);
        }
        if let Some(assignee) = assignee_id {
            draft = draft.with_assignee(assignee);
        }

        if self.directory.resolve_project(project_id).await?.is_none() {
            return Err(TaskLifecycleError::UnknownProject(project_id));
        }
        for user_id in std::iter::once(creator_id).chain(assignee_id) {
            self.require_user(user_id).await?;
        }

        let task = Task::create(draft, &*self.clock);
        self.tasks.store(&task).await?;
        tracing::info!(task_id = %task.id(), project_id = %project_id, "task created");
        Ok(task)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find_task(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        tracing::debug!(task_id = %id, "finding task");
        Ok(self.tasks.find_by_id(id).await?)
    }

    /// Lists every task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_tasks(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list_all().await?)
    }

    /// Lists the tasks assigned to a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_for_assignee(&self, assignee_id: UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list_by_assignee(assignee_id).await?)
    }

    async fn require_user(&self, id: UserId) -> TaskLifecycleResult<()> {
        if self.directory.resolve_user(id).await?.is_none() {
            return Err(TaskLifecycleError::UnknownUser(id));
        }
        Ok(())
    }
}

//! Task aggregate root.

use super::{TaskDomainError, TaskId, TaskStatus};
use crate::defect::domain::{Defect, DefectId};
use crate::directory::domain::{ProjectId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    name: String,
    description: String,
    project_id: ProjectId,
    creator_id: UserId,
    assignee_id: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    related_defect_id: Option<DefectId>,
}

impl TaskDraft {
    /// Creates a draft for a task not tied to any defect.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyName`] when `name` is blank.
    pub fn new(
        name: &str,
        description: &str,
        project_id: ProjectId,
        creator_id: UserId,
    ) -> Result<Self, TaskDomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            description: description.trim().to_owned(),
            project_id,
            creator_id,
            assignee_id: None,
            due_date: None,
            related_defect_id: None,
        })
    }

    /// Creates a draft copying the title, description and project of
    /// `defect`, linked back to it.
    #[must_use]
    pub fn from_defect(defect: &Defect, creator_id: UserId) -> Self {
        Self {
            name: defect.title().to_owned(),
            description: defect.description().to_owned(),
            project_id: defect.project_id(),
            creator_id,
            assignee_id: None,
            due_date: None,
            related_defect_id: Some(defect.id()),
        }
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    description: String,
    project_id: ProjectId,
    creator_id: UserId,
    assignee_id: Option<UserId>,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
    related_defect_id: Option<DefectId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Owning project.
    pub project_id: ProjectId,
    /// Creating user.
    pub creator_id: UserId,
    /// Assigned user, if any.
    pub assignee_id: Option<UserId>,
    /// Due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted status.
    pub status: TaskStatus,
    /// Originating defect, if the task came from a conversion.
    pub related_defect_id: Option<DefectId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an open task from a draft.
    #[must_use]
    pub fn create(draft: TaskDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            name: draft.name,
            description: draft.description,
            project_id: draft.project_id,
            creator_id: draft.creator_id,
            assignee_id: draft.assignee_id,
            due_date: draft.due_date,
            status: TaskStatus::Open,
            related_defect_id: draft.related_defect_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            project_id: data.project_id,
            creator_id: data.creator_id,
            assignee_id: data.assignee_id,
            due_date: data.due_date,
            status: data.status,
            related_defect_id: data.related_defect_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the defect this task was converted from, if any.
    #[must_use]
    pub const fn related_defect_id(&self) -> Option<DefectId> {
        self.related_defect_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the status
    /// table forbids the move.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

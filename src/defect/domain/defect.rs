//! Defect aggregate root.

use super::{DefectDomainError, DefectId, DefectStatus};
use crate::directory::domain::{ProjectId, UserId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for reporting a new defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefectDraft {
    title: String,
    description: String,
    project_id: ProjectId,
    initiator_id: UserId,
}

impl DefectDraft {
    /// Validates and trims the reported title and description.
    ///
    /// # Errors
    ///
    /// Returns [`DefectDomainError::EmptyTitle`] or
    /// [`DefectDomainError::EmptyDescription`] when either is blank.
    pub fn new(
        title: &str,
        description: &str,
        project_id: ProjectId,
        initiator_id: UserId,
    ) -> Result<Self, DefectDomainError> {
        let trimmed_title = title.trim();
        if trimmed_title.is_empty() {
            return Err(DefectDomainError::EmptyTitle);
        }
        let trimmed_description = description.trim();
        if trimmed_description.is_empty() {
            return Err(DefectDomainError::EmptyDescription);
        }
        Ok(Self {
            title: trimmed_title.to_owned(),
            description: trimmed_description.to_owned(),
            project_id,
            initiator_id,
        })
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the reporting user.
    #[must_use]
    pub const fn initiator_id(&self) -> UserId {
        self.initiator_id
    }
}

/// Defect aggregate root.
///
/// The conversion flag is derived from the task link, so a defect can never
/// claim to be converted without naming its task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defect {
    id: DefectId,
    title: String,
    description: String,
    project_id: ProjectId,
    initiator_id: UserId,
    status: DefectStatus,
    converted_to_task_id: Option<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDefectData {
    /// Persisted defect identifier.
    pub id: DefectId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Owning project.
    pub project_id: ProjectId,
    /// Reporting user.
    pub initiator_id: UserId,
    /// Persisted status.
    pub status: DefectStatus,
    /// Task the defect was converted into, if any.
    pub converted_to_task_id: Option<TaskId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Defect {
    /// Creates a new, unconverted defect in status [`DefectStatus::New`].
    #[must_use]
    pub fn new(draft: DefectDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: DefectId::new(),
            title: draft.title,
            description: draft.description,
            project_id: draft.project_id,
            initiator_id: draft.initiator_id,
            status: DefectStatus::New,
            converted_to_task_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a defect from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDefectData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            project_id: data.project_id,
            initiator_id: data.initiator_id,
            status: data.status,
            converted_to_task_id: data.converted_to_task_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the defect identifier.
    #[must_use]
    pub const fn id(&self) -> DefectId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the reporting user.
    #[must_use]
    pub const fn initiator_id(&self) -> UserId {
        self.initiator_id
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> DefectStatus {
        self.status
    }

    /// Returns the task this defect was converted into, if any.
    #[must_use]
    pub const fn converted_to_task_id(&self) -> Option<TaskId> {
        self.converted_to_task_id
    }

    /// Returns `true` once the defect has been converted into a task.
    #[must_use]
    pub const fn is_converted(&self) -> bool {
        self.converted_to_task_id.is_some()
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

    /// Moves the defect to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`DefectDomainError::InvalidStateTransition`] when the status
    /// table forbids the move.
    pub fn transition_to(
        &mut self,
        target: DefectStatus,
        clock: &impl Clock,
    ) -> Result<(), DefectDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(self.invalid_transition(target));
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Links the defect to `task_id` and moves it to
    /// [`DefectStatus::InProgress`].
    ///
    /// A defect that is already in progress keeps its status.
    ///
    /// # Errors
    ///
    /// Returns [`DefectDomainError::AlreadyConverted`] when a link exists, or
    /// [`DefectDomainError::InvalidStateTransition`] when the defect cannot be
    /// put in progress.
    pub fn mark_converted(
        &mut self,
        task_id: TaskId,
        clock: &impl Clock,
    ) -> Result<(), DefectDomainError> {
        if let Some(existing) = self.converted_to_task_id {
            return Err(DefectDomainError::AlreadyConverted {
                defect_id: self.id,
                task_id: existing,
            });
        }
        let target = DefectStatus::InProgress;
        if self.status != target && !self.status.can_transition_to(target) {
            return Err(self.invalid_transition(target));
        }
        self.status = target;
        self.converted_to_task_id = Some(task_id);
        self.touch(clock);
        Ok(())
    }

    const fn invalid_transition(&self, target: DefectStatus) -> DefectDomainError {
        DefectDomainError::InvalidStateTransition {
            defect_id: self.id,
            from: self.status,
            to: target,
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

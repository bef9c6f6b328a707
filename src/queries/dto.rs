//! Display DTOs.

use crate::defect::domain::{Attachment, Defect, DefectId, DefectStatus};
use crate::directory::domain::{ProjectId, User, UserId};
use crate::history::domain::HistoryEntry;
use crate::task::domain::{Task, TaskId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Flat view of a defect including its derived conversion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefectSummary {
    /// Defect identifier.
    pub id: DefectId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Owning project.
    pub project_id: ProjectId,
    /// Reporting user.
    pub initiator_id: UserId,
    /// Current status.
    pub status: DefectStatus,
    /// Whether the defect has been converted.
    pub is_converted: bool,
    /// Linked task, if converted.
    pub converted_to_task_id: Option<TaskId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Defect> for DefectSummary {
    fn from(defect: &Defect) -> Self {
        Self {
            id: defect.id(),
            title: defect.title().to_owned(),
            description: defect.description().to_owned(),
            project_id: defect.project_id(),
            initiator_id: defect.initiator_id(),
            status: defect.status(),
            is_converted: defect.is_converted(),
            converted_to_task_id: defect.converted_to_task_id(),
            created_at: defect.created_at(),
            updated_at: defect.updated_at(),
        }
    }
}

/// A defect with its reporter, files and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefectDetails {
    /// The defect.
    pub defect: DefectSummary,
    /// Reporting user, when still present in the directory.
    pub initiator: Option<User>,
    /// Attachments, oldest first.
    pub attachments: Vec<Attachment>,
    /// History, oldest first.
    pub history: Vec<HistoryEntry>,
}

/// A task with its assignee and originating defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetails {
    /// The task.
    pub task: Task,
    /// Assigned user, when set and present in the directory.
    pub assignee: Option<User>,
    /// Defect the task was converted from.
    pub related_defect: Option<DefectSummary>,
    /// History of the related defect, oldest first.
    pub related_history: Vec<HistoryEntry>,
}

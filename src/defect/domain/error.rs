//! Error types for defect domain validation and parsing.

use super::{DefectId, DefectStatus};
use crate::task::domain::TaskId;
use thiserror::Error;

/// Errors returned by defect domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefectDomainError {
    /// The title is empty after trimming.
    #[error("defect title must not be empty")]
    EmptyTitle,

    /// The description is empty after trimming.
    #[error("defect description must not be empty")]
    EmptyDescription,

    /// The status table does not allow the requested move.
    #[error("defect {defect_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Defect being changed.
        defect_id: DefectId,
        /// Current status.
        from: DefectStatus,
        /// Requested status.
        to: DefectStatus,
    },

    /// The defect already links to a task.
    #[error("defect {defect_id} was already converted to task {task_id}")]
    AlreadyConverted {
        /// Converted defect.
        defect_id: DefectId,
        /// Task the defect links to.
        task_id: TaskId,
    },
}

/// Error returned while parsing a defect status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown defect status: {0}")]
pub struct ParseDefectStatusError(pub String);

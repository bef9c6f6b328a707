//! Result of a committed conversion.

use crate::defect::domain::Defect;
use crate::directory::domain::User;
use crate::history::{domain::HistoryEntry, services::HistoryLedgerError};
use crate::task::domain::Task;

/// Actor name used in audit text when the directory cannot be reached.
pub const UNKNOWN_ACTOR: &str = "unknown actor";

/// Builds the text of the `assigned` history entry.
#[must_use]
pub fn assignment_text(assignee: &User, actor_name: &str) -> String {
    format!(
        "Assigned to {} (user #{}) by {actor_name}",
        assignee.display_name(),
        assignee.id()
    )
}

/// A committed conversion.
///
/// The task and defect are always persisted. The history entry is written
/// afterwards; if that append failed, `history_entry` is `None` and
/// `history_error` holds the cause.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// The created task.
    pub task: Task,
    /// The defect, now linked to the task.
    pub defect: Defect,
    /// The `assigned` entry, when it was recorded.
    pub history_entry: Option<HistoryEntry>,
    /// Why the `assigned` entry could not be recorded.
    pub history_error: Option<HistoryLedgerError>,
}

impl ConversionOutcome {
    /// Returns `true` when the history entry was recorded.
    #[must_use]
    pub const fn is_fully_recorded(&self) -> bool {
        self.history_entry.is_some()
    }
}

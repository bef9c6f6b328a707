//! History entry record.

use super::{HistoryEntryId, ParseActionTypeError};
use crate::defect::domain::DefectId;
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of action recorded in a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// The defect was converted and its task assigned.
    Assigned,
    /// A defect or task status changed.
    StatusChanged,
    /// A comment or file was added.
    Comment,
}

impl ActionType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::StatusChanged => "status_changed",
            Self::Comment => "comment",
        }
    }
}

impl TryFrom<&str> for ActionType {
    type Error = ParseActionTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "assigned" => Ok(Self::Assigned),
            "status_changed" => Ok(Self::StatusChanged),
            "comment" => Ok(Self::Comment),
            _ => Err(ParseActionTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit record of one action taken on a defect.
///
/// There are no mutators: an entry is fixed from the moment it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: HistoryEntryId,
    defect_id: DefectId,
    actor_id: UserId,
    action_type: ActionType,
    action_text: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryEntry {
    /// Persisted entry identifier.
    pub id: HistoryEntryId,
    /// Defect the entry belongs to.
    pub defect_id: DefectId,
    /// Acting user.
    pub actor_id: UserId,
    /// Recorded action type.
    pub action_type: ActionType,
    /// Recorded action text.
    pub action_text: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Records a new entry stamped with the current clock time.
    #[must_use]
    pub fn record(
        defect_id: DefectId,
        actor_id: UserId,
        action_type: ActionType,
        action_text: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            defect_id,
            actor_id,
            action_type,
            action_text: action_text.into(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryEntry) -> Self {
        Self {
            id: data.id,
            defect_id: data.defect_id,
            actor_id: data.actor_id,
            action_type: data.action_type,
            action_text: data.action_text,
            created_at: data.created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the defect this entry belongs to.
    #[must_use]
    pub const fn defect_id(&self) -> DefectId {
        self.defect_id
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor_id(&self) -> UserId {
        self.actor_id
    }

    /// Returns the action type.
    #[must_use]
    pub const fn action_type(&self) -> ActionType {
        self.action_type
    }

    /// Returns the human-readable action text.
    #[must_use]
    pub fn action_text(&self) -> &str {
        &self.action_text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//! Defect status table.

use super::ParseDefectStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defect lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefectStatus {
    /// Reported and not yet picked up.
    New,
    /// Being worked on.
    InProgress,
    /// Fix awaiting verification.
    UnderReview,
    /// Verified and closed.
    Closed,
    /// Dropped without a fix.
    Cancelled,
}

impl DefectStatus {
    /// Returns the canonical storage and display representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "InProgress",
            Self::UnderReview => "UnderReview",
            Self::Closed => "Closed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns `true` when no further transition is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    /// Returns `true` when the status table allows moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::New, Self::InProgress | Self::Cancelled)
                | (Self::InProgress, Self::UnderReview | Self::Cancelled)
                | (
                    Self::UnderReview,
                    Self::InProgress | Self::Closed | Self::Cancelled
                )
        )
    }
}

impl TryFrom<&str> for DefectStatus {
    type Error = ParseDefectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let key: String = value
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "new" => Ok(Self::New),
            "inprogress" => Ok(Self::InProgress),
            "underreview" => Ok(Self::UnderReview),
            "closed" => Ok(Self::Closed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseDefectStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for DefectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

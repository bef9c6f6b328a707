//! Failure categories shared by every tracker service.
//!
//! Each bounded context keeps its own layered error enums. Service-level
//! errors classify themselves into an [`ErrorKind`] so callers can map any
//! failure onto one taxonomy without matching every variant.

use std::fmt;

/// Category of a tracker failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input; never retried.
    Validation,
    /// A referenced user or project does not exist.
    Reference,
    /// The addressed defect, task or attachment does not exist.
    NotFound,
    /// The defect has already been converted into a task.
    AlreadyConverted,
    /// Underlying persistence or filesystem failure.
    Storage,
}

impl ErrorKind {
    /// Returns the canonical name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Reference => "reference",
            Self::NotFound => "not_found",
            Self::AlreadyConverted => "already_converted",
            Self::Storage => "storage",
        }
    }

    /// Returns `true` when the failure was caused by the caller's input.
    #[must_use]
    pub const fn is_caller_error(self) -> bool {
        !matches!(self, Self::Storage)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Validation, true)]
    #[case(ErrorKind::Reference, true)]
    #[case(ErrorKind::NotFound, true)]
    #[case(ErrorKind::AlreadyConverted, true)]
    #[case(ErrorKind::Storage, false)]
    fn only_storage_failures_are_not_caller_errors(
        #[case] kind: ErrorKind,
        #[case] expected: bool,
    ) {
        assert_eq!(kind.is_caller_error(), expected);
    }

    #[test]
    fn display_uses_snake_case_names() {
        assert_eq!(ErrorKind::AlreadyConverted.to_string(), "already_converted");
    }
}

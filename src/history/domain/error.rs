//! Error types for history parsing.

use thiserror::Error;

/// Error returned while parsing an action type from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown history action type: {0}")]
pub struct ParseActionTypeError(pub String);

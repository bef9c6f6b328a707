//! Domain model for defect history.

mod entry;
mod error;
mod ids;

pub use entry::{ActionType, HistoryEntry, PersistedHistoryEntry};
pub use error::ParseActionTypeError;
pub use ids::HistoryEntryId;

//! Domain model for tasks.

mod due_date;
mod error;
mod ids;
mod status;
mod task;

pub use due_date::{parse_due_date, parse_due_date_in};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskDraft};

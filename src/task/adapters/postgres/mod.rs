//! `PostgreSQL` adapters for task lifecycle persistence.

mod models;
mod repository;

pub use repository::PostgresTaskRepository;
pub(crate) use repository::{is_defect_origin_violation, to_new_row};

//! `PostgreSQL` adapter for the history ledger.

mod models;
mod repository;

pub use repository::PostgresHistoryRepository;

//! `PostgreSQL` adapter for directory lookups.

mod models;
mod repository;

pub use repository::PostgresDirectory;

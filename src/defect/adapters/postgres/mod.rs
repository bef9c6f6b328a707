//! `PostgreSQL` adapter for defects and attachments.

mod models;
mod repository;

pub use repository::PostgresDefectRepository;

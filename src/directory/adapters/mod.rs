//! Directory adapters.
//!
//! - [`memory::InMemoryDirectory`]: seeded directory for tests and embedding
//! - [`postgres::PostgresDirectory`]: reads the `users` and `projects` tables

pub mod memory;
pub mod postgres;

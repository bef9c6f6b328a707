//! Diesel row models for directory tables.

use crate::persistence::schema::{projects, users};
use diesel::prelude::*;

/// Query result row for users.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Directory user identifier.
    pub id: i64,
    /// Display name.
    pub full_name: String,
    /// Role name.
    pub role: String,
}

/// Query result row for projects.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Directory project identifier.
    pub id: i64,
    /// Project name.
    pub name: String,
    /// Whether the project accepts new work.
    pub active: bool,
}

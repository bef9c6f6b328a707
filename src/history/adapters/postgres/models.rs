//! Diesel row models for `defect_history`.

use crate::persistence::schema::defect_history;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for history entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = defect_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Defect the entry belongs to.
    pub defect_id: uuid::Uuid,
    /// Acting user.
    pub actor_id: i64,
    /// Action type.
    pub action_type: String,
    /// Action text.
    pub action_text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for history entries; `seq` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = defect_history)]
pub struct NewHistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Defect the entry belongs to.
    pub defect_id: uuid::Uuid,
    /// Acting user.
    pub actor_id: i64,
    /// Action type.
    pub action_type: String,
    /// Action text.
    pub action_text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

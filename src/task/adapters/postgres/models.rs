//! Diesel row models for task persistence.

use crate::persistence::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Owning project.
    pub project_id: i64,
    /// Creating user.
    pub creator_id: i64,
    /// Assigned user, if any.
    pub assignee_id: Option<i64>,
    /// Due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: String,
    /// Originating defect, if any.
    pub related_defect_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Owning project.
    pub project_id: i64,
    /// Creating user.
    pub creator_id: i64,
    /// Assigned user, if any.
    pub assignee_id: Option<i64>,
    /// Due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: String,
    /// Originating defect, if any.
    pub related_defect_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

//! Diesel row models for defect persistence.

use crate::persistence::schema::{defect_files, defects};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for defect records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = defects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DefectRow {
    /// Defect identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Owning project.
    pub project_id: i64,
    /// Reporting user.
    pub initiator_id: i64,
    /// Lifecycle status.
    pub status: String,
    /// Conversion flag.
    pub is_converted: bool,
    /// Linked task, if converted.
    pub converted_to_task_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for defect records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = defects)]
pub struct NewDefectRow {
    /// Defect identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Owning project.
    pub project_id: i64,
    /// Reporting user.
    pub initiator_id: i64,
    /// Lifecycle status.
    pub status: String,
    /// Conversion flag.
    pub is_converted: bool,
    /// Linked task, if converted.
    pub converted_to_task_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for attachment records, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = defect_files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttachmentRow {
    /// Attachment identifier.
    pub id: uuid::Uuid,
    /// Owning defect.
    pub defect_id: uuid::Uuid,
    /// Sanitized file name.
    pub file_name: String,
    /// Blob storage path.
    pub file_path: String,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}

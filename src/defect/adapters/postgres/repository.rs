//! `PostgreSQL` repository implementation for defects.

use super::models::{AttachmentRow, DefectRow, NewDefectRow};
use crate::defect::{
    domain::{
        Attachment, AttachmentId, Defect, DefectId, DefectStatus, PersistedAttachment,
        PersistedDefectData,
    },
    ports::{DefectRepository, DefectRepositoryError, DefectRepositoryResult},
};
use crate::directory::domain::{ProjectId, UserId};
use crate::persistence::{
    PersistenceFailure, PgPool, from_db_id, run_blocking,
    schema::{defect_files, defects},
    to_db_id,
};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl PersistenceFailure for DefectRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed defect repository.
#[derive(Debug, Clone)]
pub struct PostgresDefectRepository {
    pool: PgPool,
}

impl PostgresDefectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DefectRepository for PostgresDefectRepository {
    async fn store(&self, defect: &Defect) -> DefectRepositoryResult<()> {
        let defect_id = defect.id();
        let new_row = to_new_row(defect)?;
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(defects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DefectRepositoryError::DuplicateDefect(defect_id)
                    }
                    _ => DefectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_status(&self, defect: &Defect) -> DefectRepositoryResult<()> {
        let defect_id = defect.id();
        let status = defect.status().as_str();
        let updated_at = defect.updated_at();
        run_blocking(&self.pool, move |connection| {
            let target = defects::table.filter(defects::id.eq(defect_id.into_inner()));
            let updated = diesel::update(target)
                .set((defects::status.eq(status), defects::updated_at.eq(updated_at)))
                .execute(connection)
                .map_err(DefectRepositoryError::persistence)?;
            if updated == 0 {
                return Err(DefectRepositoryError::NotFound(defect_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: DefectId) -> DefectRepositoryResult<Option<Defect>> {
        run_blocking(&self.pool, move |connection| {
            let row = defects::table
                .filter(defects::id.eq(id.into_inner()))
                .select(DefectRow::as_select())
                .first::<DefectRow>(connection)
                .optional()
                .map_err(DefectRepositoryError::persistence)?;
            row.map(row_to_defect).transpose()
        })
        .await
    }

    async fn list_unconverted(&self) -> DefectRepositoryResult<Vec<Defect>> {
        run_blocking(&self.pool, move |connection| {
            let rows = defects::table
                .filter(defects::converted_to_task_id.is_null())
                .order(defects::created_at.asc())
                .select(DefectRow::as_select())
                .load::<DefectRow>(connection)
                .map_err(DefectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_defect).collect()
        })
        .await
    }

    async fn store_attachment(&self, attachment: &Attachment) -> DefectRepositoryResult<()> {
        let defect_id = attachment.defect_id();
        let attachment_id = attachment.id();
        let row = to_attachment_row(attachment);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(defect_files::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        DefectRepositoryError::DuplicateAttachment(attachment_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        DefectRepositoryError::NotFound(defect_id)
                    }
                    _ => DefectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn remove_attachment(&self, id: AttachmentId) -> DefectRepositoryResult<()> {
        run_blocking(&self.pool, move |connection| {
            diesel::delete(defect_files::table.filter(defect_files::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(DefectRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_attachment(
        &self,
        id: AttachmentId,
    ) -> DefectRepositoryResult<Option<Attachment>> {
        run_blocking(&self.pool, move |connection| {
            let row = defect_files::table
                .filter(defect_files::id.eq(id.into_inner()))
                .select(AttachmentRow::as_select())
                .first::<AttachmentRow>(connection)
                .optional()
                .map_err(DefectRepositoryError::persistence)?;
            Ok(row.map(row_to_attachment))
        })
        .await
    }

    async fn list_attachments(
        &self,
        defect_id: DefectId,
    ) -> DefectRepositoryResult<Vec<Attachment>> {
        run_blocking(&self.pool, move |connection| {
            let rows = defect_files::table
                .filter(defect_files::defect_id.eq(defect_id.into_inner()))
                .order(defect_files::created_at.asc())
                .select(AttachmentRow::as_select())
                .load::<AttachmentRow>(connection)
                .map_err(DefectRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_attachment).collect())
        })
        .await
    }
}

fn to_new_row(defect: &Defect) -> DefectRepositoryResult<NewDefectRow> {
    Ok(NewDefectRow {
        id: defect.id().into_inner(),
        title: defect.title().to_owned(),
        description: defect.description().to_owned(),
        project_id: to_db_id::<DefectRepositoryError>(defect.project_id().value())?,
        initiator_id: to_db_id::<DefectRepositoryError>(defect.initiator_id().value())?,
        status: defect.status().as_str().to_owned(),
        is_converted: defect.is_converted(),
        converted_to_task_id: defect.converted_to_task_id().map(TaskId::into_inner),
        created_at: defect.created_at(),
        updated_at: defect.updated_at(),
    })
}

fn row_to_defect(row: DefectRow) -> DefectRepositoryResult<Defect> {
    let DefectRow {
        id,
        title,
        description,
        project_id,
        initiator_id,
        status: persisted_status,
        is_converted,
        converted_to_task_id,
        created_at,
        updated_at,
    } = row;

    debug_assert_eq!(
        is_converted,
        converted_to_task_id.is_some(),
        "defects_conversion_link_consistent constraint keeps the flag and link together"
    );

    let status = DefectStatus::try_from(persisted_status.as_str())
        .map_err(DefectRepositoryError::persistence)?;
    Ok(Defect::from_persisted(PersistedDefectData {
        id: DefectId::from_uuid(id),
        title,
        description,
        project_id: ProjectId::new(from_db_id::<DefectRepositoryError>(project_id)?),
        initiator_id: UserId::new(from_db_id::<DefectRepositoryError>(initiator_id)?),
        status,
        converted_to_task_id: converted_to_task_id.map(TaskId::from_uuid),
        created_at,
        updated_at,
    }))
}

fn to_attachment_row(attachment: &Attachment) -> AttachmentRow {
    AttachmentRow {
        id: attachment.id().into_inner(),
        defect_id: attachment.defect_id().into_inner(),
        file_name: attachment.file_name().to_owned(),
        file_path: attachment.storage_path().to_owned(),
        created_at: attachment.created_at(),
    }
}

fn row_to_attachment(row: AttachmentRow) -> Attachment {
    Attachment::from_persisted(PersistedAttachment {
        id: AttachmentId::from_uuid(row.id),
        defect_id: DefectId::from_uuid(row.defect_id),
        file_name: row.file_name,
        storage_path: row.file_path,
        created_at: row.created_at,
    })
}

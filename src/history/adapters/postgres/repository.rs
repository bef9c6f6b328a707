//! `PostgreSQL` repository implementation for the history ledger.

use super::models::{HistoryRow, NewHistoryRow};
use crate::defect::domain::DefectId;
use crate::directory::domain::UserId;
use crate::history::{
    domain::{ActionType, HistoryEntry, HistoryEntryId, PersistedHistoryEntry},
    ports::{HistoryRepository, HistoryRepositoryError, HistoryRepositoryResult},
};
use crate::persistence::{
    PersistenceFailure, PgPool, from_db_id, run_blocking, schema::defect_history, to_db_id,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

impl PersistenceFailure for HistoryRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed history repository.
#[derive(Debug, Clone)]
pub struct PostgresHistoryRepository {
    pool: PgPool,
}

impl PostgresHistoryRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PostgresHistoryRepository {
    async fn append(&self, entry: &HistoryEntry) -> HistoryRepositoryResult<()> {
        let entry_id = entry.id();
        let new_row = to_new_row(entry)?;
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(defect_history::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        HistoryRepositoryError::DuplicateEntry(entry_id)
                    }
                    _ => HistoryRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_for(&self, defect_id: DefectId) -> HistoryRepositoryResult<Vec<HistoryEntry>> {
        run_blocking(&self.pool, move |connection| {
            let rows = defect_history::table
                .filter(defect_history::defect_id.eq(defect_id.into_inner()))
                .order((defect_history::created_at.asc(), defect_history::seq.asc()))
                .select(HistoryRow::as_select())
                .load::<HistoryRow>(connection)
                .map_err(HistoryRepositoryError::persistence)?;
            rows.into_iter().map(row_to_entry).collect()
        })
        .await
    }
}

fn to_new_row(entry: &HistoryEntry) -> HistoryRepositoryResult<NewHistoryRow> {
    Ok(NewHistoryRow {
        id: entry.id().into_inner(),
        defect_id: entry.defect_id().into_inner(),
        actor_id: to_db_id::<HistoryRepositoryError>(entry.actor_id().value())?,
        action_type: entry.action_type().as_str().to_owned(),
        action_text: entry.action_text().to_owned(),
        created_at: entry.created_at(),
    })
}

fn row_to_entry(row: HistoryRow) -> HistoryRepositoryResult<HistoryEntry> {
    let action_type = ActionType::try_from(row.action_type.as_str())
        .map_err(HistoryRepositoryError::persistence)?;
    Ok(HistoryEntry::from_persisted(PersistedHistoryEntry {
        id: HistoryEntryId::from_uuid(row.id),
        defect_id: DefectId::from_uuid(row.defect_id),
        actor_id: UserId::new(from_db_id::<HistoryRepositoryError>(row.actor_id)?),
        action_type,
        action_text: row.action_text,
        created_at: row.created_at,
    }))
}

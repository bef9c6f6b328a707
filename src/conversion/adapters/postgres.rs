//! `PostgreSQL` conversion commits in a single transaction.

use crate::conversion::ports::{
    ConversionRepository, ConversionRepositoryError, ConversionRepositoryResult,
};
use crate::defect::domain::Defect;
use crate::persistence::{
    PersistenceFailure, PgPool, run_blocking,
    schema::{defects, tasks},
};
use crate::task::{
    adapters::postgres::{is_defect_origin_violation, to_new_row},
    domain::Task,
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

impl PersistenceFailure for ConversionRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// Failure inside the conversion transaction.
enum TxError {
    Database(DieselError),
    Rejected(ConversionRepositoryError),
}

impl From<DieselError> for TxError {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

/// `PostgreSQL`-backed conversion committer.
#[derive(Debug, Clone)]
pub struct PostgresConversionRepository {
    pool: PgPool,
}

impl PostgresConversionRepository {
    /// Creates a committer from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversionRepository for PostgresConversionRepository {
    async fn commit(&self, task: &Task, defect: &Defect) -> ConversionRepositoryResult<()> {
        let task_id = task.id();
        let defect_id = defect.id();
        let new_task = to_new_row(task).map_err(ConversionRepositoryError::persistence)?;
        let status = defect.status().as_str();
        let updated_at = defect.updated_at();

        run_blocking(&self.pool, move |connection| {
            connection
                .transaction::<(), TxError, _>(|tx| {
                    // Row lock serialises competing commits for one defect.
                    let link = defects::table
                        .filter(defects::id.eq(defect_id.into_inner()))
                        .select(defects::converted_to_task_id)
                        .for_update()
                        .first::<Option<Uuid>>(tx)
                        .optional()?;
                    match link {
                        None => {
                            return Err(TxError::Rejected(
                                ConversionRepositoryError::DefectNotFound(defect_id),
                            ));
                        }
                        Some(Some(_)) => {
                            return Err(TxError::Rejected(
                                ConversionRepositoryError::AlreadyConverted(defect_id),
                            ));
                        }
                        Some(None) => {}
                    }

                    diesel::insert_into(tasks::table)
                        .values(&new_task)
                        .execute(tx)?;

                    let unconverted = defects::table
                        .filter(defects::id.eq(defect_id.into_inner()))
                        .filter(defects::converted_to_task_id.is_null());
                    let updated = diesel::update(unconverted)
                        .set((
                            defects::status.eq(status),
                            defects::is_converted.eq(true),
                            defects::converted_to_task_id.eq(Some(task_id.into_inner())),
                            defects::updated_at.eq(updated_at),
                        ))
                        .execute(tx)?;
                    if updated == 0 {
                        return Err(TxError::Rejected(
                            ConversionRepositoryError::AlreadyConverted(defect_id),
                        ));
                    }
                    Ok(())
                })
                .map_err(|err| match err {
                    TxError::Rejected(rejected) => rejected,
                    TxError::Database(DieselError::DatabaseError(
                        DatabaseErrorKind::UniqueViolation,
                        ref info,
                    )) if is_defect_origin_violation(info.as_ref()) => {
                        ConversionRepositoryError::AlreadyConverted(defect_id)
                    }
                    TxError::Database(DieselError::DatabaseError(
                        DatabaseErrorKind::UniqueViolation,
                        _,
                    )) => ConversionRepositoryError::DuplicateTask(task_id),
                    TxError::Database(other) => ConversionRepositoryError::persistence(other),
                })
        })
        .await
    }
}

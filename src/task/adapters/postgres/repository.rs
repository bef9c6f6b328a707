//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::models::{NewTaskRow, TaskRow};
use crate::defect::domain::DefectId;
use crate::directory::domain::{ProjectId, UserId};
use crate::persistence::{
    PersistenceFailure, PgPool, from_db_id, run_blocking, schema::tasks, to_db_id,
};
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

impl PersistenceFailure for TaskRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_where<F>(&self, filter: F) -> TaskRepositoryResult<Vec<Task>>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<Vec<TaskRow>> + Send + 'static,
    {
        run_blocking(&self.pool, move |connection| {
            let rows = filter(connection).map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let related_defect_id = task.related_defect_id();
        let new_row = to_new_row(task)?;

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_defect_origin_violation(info.as_ref()) =>
                    {
                        related_defect_id.map_or(
                            TaskRepositoryError::DuplicateTask(task_id),
                            TaskRepositoryError::DuplicateDefectOrigin,
                        )
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let status = task.status().as_str();
        let updated_at = task.updated_at();
        run_blocking(&self.pool, move |connection| {
            let target = tasks::table.filter(tasks::id.eq(task_id.into_inner()));
            let updated = diesel::update(target)
                .set((tasks::status.eq(status), tasks::updated_at.eq(updated_at)))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.load_where(|connection| {
            tasks::table
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
        })
        .await
    }

    async fn list_by_assignee(&self, assignee_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let key = to_db_id::<TaskRepositoryError>(assignee_id.value())?;
        self.load_where(move |connection| {
            tasks::table
                .filter(tasks::assignee_id.eq(key))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
        })
        .await
    }
}

/// Builds the insert row for a task.
pub(crate) fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let assignee_id = task
        .assignee_id()
        .map(|id| to_db_id::<TaskRepositoryError>(id.value()))
        .transpose()?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        name: task.name().to_owned(),
        description: task.description().to_owned(),
        project_id: to_db_id::<TaskRepositoryError>(task.project_id().value())?,
        creator_id: to_db_id::<TaskRepositoryError>(task.creator_id().value())?,
        assignee_id,
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
        related_defect_id: task.related_defect_id().map(DefectId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        name,
        description,
        project_id,
        creator_id,
        assignee_id,
        due_date,
        status: persisted_status,
        related_defect_id,
        created_at,
        updated_at,
    } = row;

    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let assignee = assignee_id
        .map(|value| from_db_id::<TaskRepositoryError>(value).map(UserId::new))
        .transpose()?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        name,
        description,
        project_id: ProjectId::new(from_db_id::<TaskRepositoryError>(project_id)?),
        creator_id: UserId::new(from_db_id::<TaskRepositoryError>(creator_id)?),
        assignee_id: assignee,
        due_date,
        status,
        related_defect_id: related_defect_id.map(DefectId::from_uuid),
        created_at,
        updated_at,
    }))
}

/// Returns `true` when a unique violation came from the one-task-per-defect
/// index.
pub(crate) fn is_defect_origin_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_tasks_related_defect_unique")
}

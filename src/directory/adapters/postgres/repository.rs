//! `PostgreSQL` implementation of the directory port.

use super::models::{ProjectRow, UserRow};
use crate::directory::{
    domain::{Project, ProjectId, Role, User, UserId},
    ports::{Directory, DirectoryError, DirectoryResult},
};
use crate::persistence::{
    PersistenceFailure, PgPool, from_db_id, run_blocking,
    schema::{projects, users},
    to_db_id,
};
use async_trait::async_trait;
use diesel::prelude::*;

impl PersistenceFailure for DirectoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

/// Directory backed by the shared `users` and `projects` tables.
#[derive(Debug, Clone)]
pub struct PostgresDirectory {
    pool: PgPool,
}

impl PostgresDirectory {
    /// Creates a directory over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for PostgresDirectory {
    async fn resolve_user(&self, id: UserId) -> DirectoryResult<Option<User>> {
        let key = to_db_id::<DirectoryError>(id.value())?;
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::id.eq(key))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(DirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn resolve_project(&self, id: ProjectId) -> DirectoryResult<Option<Project>> {
        let key = to_db_id::<DirectoryError>(id.value())?;
        run_blocking(&self.pool, move |connection| {
            let row = projects::table
                .filter(projects::id.eq(key))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(DirectoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }
}

fn row_to_user(row: UserRow) -> DirectoryResult<User> {
    let id = UserId::new(from_db_id::<DirectoryError>(row.id)?);
    let role = Role::try_from(row.role.as_str()).map_err(DirectoryError::persistence)?;
    Ok(User::new(id, row.full_name, role))
}

fn row_to_project(row: ProjectRow) -> DirectoryResult<Project> {
    let id = ProjectId::new(from_db_id::<DirectoryError>(row.id)?);
    let project = Project::new(id, row.name);
    Ok(if row.active {
        project
    } else {
        project.deactivated()
    })
}

//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Diesel is synchronous, so every adapter funnels its queries through
//! [`run_blocking`], which checks a connection out of the r2d2 pool on the
//! blocking thread pool and keeps the async executor free.

pub(crate) mod schema;

use diesel::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// `PostgreSQL` connection pool shared by all Diesel adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Errors raised while preparing or checking the connection pool.
#[derive(Debug, Error)]
pub enum PoolSetupError {
    /// The pool could not be built or a connection could not be obtained.
    #[error("database pool error: {0}")]
    Pool(#[from] PoolError),
    /// The liveness query failed.
    #[error("database check failed: {0}")]
    Query(#[from] diesel::result::Error),
    /// The blocking task running the check was cancelled or panicked.
    #[error("database check task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolSetupError::Pool`] when the initial connections cannot be
/// established.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolSetupError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Ok(Pool::builder().max_size(max_size).build(manager)?)
}

/// Runs `SELECT 1` against the pool.
///
/// # Errors
///
/// Returns [`PoolSetupError`] when no connection is available or the query
/// fails.
pub async fn check_connection(pool: &PgPool) -> Result<(), PoolSetupError> {
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || -> Result<(), PoolSetupError> {
        let mut connection = shared.get()?;
        diesel::sql_query("SELECT 1").execute(&mut connection)?;
        Ok(())
    })
    .await?
}

/// Error types that can absorb an infrastructure failure.
pub(crate) trait PersistenceFailure: Send + 'static {
    /// Wraps an infrastructure error.
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

/// Runs a Diesel operation on the blocking thread pool.
pub(crate) async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure,
{
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared.get().map_err(E::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(E::persistence)?
}

/// Converts a directory identifier into its `BIGINT` column value.
pub(crate) fn to_db_id<E: PersistenceFailure>(value: u64) -> Result<i64, E> {
    i64::try_from(value).map_err(E::persistence)
}

/// Converts a `BIGINT` column value into a directory identifier.
pub(crate) fn from_db_id<E: PersistenceFailure>(value: i64) -> Result<u64, E> {
    u64::try_from(value).map_err(E::persistence)
}

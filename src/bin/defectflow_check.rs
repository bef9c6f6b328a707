//! Checks that a deployment can run the tracker.
//!
//! Usage:
//!
//! ```text
//! defectflow-check
//! ```
//!
//! Configuration comes from the environment (and `.env`, when present). The
//! check installs logging, opens the database pool, runs a liveness query and
//! opens the upload directory. Results are reported through `tracing`; the
//! process exits non-zero on the first failure.

use defectflow::config::{ConfigError, TrackerConfig};
use defectflow::persistence::{PoolSetupError, build_pool, check_connection};
use defectflow::storage::{adapters::filesystem::FilesystemBlobStorage, ports::BlobStorageError};
use defectflow::telemetry::{TelemetryError, init_tracing};
use thiserror::Error;
use tokio::runtime::Builder;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during the deployment check.
#[derive(Debug, Error)]
enum CheckError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging setup failed: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("database check failed: {0}")]
    Database(#[from] PoolSetupError),
    #[error("upload directory check failed: {0}")]
    Uploads(#[from] BlobStorageError),
    #[error("failed to build async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

fn main() -> Result<(), BoxError> {
    run().map_err(Into::into)
}

fn run() -> Result<(), CheckError> {
    let config = TrackerConfig::from_env()?;
    init_tracing(config.log_filter(), config.log_format())?;
    tracing::info!(
        environment = ?config.environment(),
        upload_dir = %config.upload_dir(),
        max_upload_bytes = config.max_upload_bytes(),
        "configuration loaded"
    );

    let runtime = Builder::new_multi_thread().enable_all().build()?;
    let pool = build_pool(config.database_url(), config.database_pool_size())?;
    runtime.block_on(check_connection(&pool))?;
    tracing::info!(pool_size = config.database_pool_size(), "database reachable");

    let _uploads = FilesystemBlobStorage::open(config.upload_dir())?;
    tracing::info!(upload_dir = %config.upload_dir(), "upload directory ready");
    Ok(())
}

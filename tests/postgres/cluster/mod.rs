//! Template and per-test databases on the shared embedded cluster.
//!
//! The cluster itself comes from `pg-embed-setup-unpriv`. When the tests run
//! as root the crate needs `PG_EMBEDDED_WORKER` pointing at its worker binary.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::TestCluster;

/// Schema applied once to the template database.
const SCHEMA_SQL: &str =
    include_str!("../../../migrations/2026-10-01-000000_defect_tracking/up.sql");

/// Template database name for the pre-migrated schema.
const TEMPLATE_DB: &str = "defectflow_test_template";

/// Ensures the template database exists with the schema applied.
fn ensure_template(cluster: &TestCluster) -> eyre::Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            // The trigger body contains semicolons, so the script runs as one batch.
            conn.batch_execute(SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("schema migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| eyre::eyre!("template setup failed: {e}"))
}

/// A database cloned from the template and dropped with the guard.
pub struct TestDatabase {
    cluster: &'static TestCluster,
    name: String,
}

impl TestDatabase {
    /// Creates a fresh database for one test.
    pub fn create(cluster: &'static TestCluster, label: &str) -> eyre::Result<Self> {
        ensure_template(cluster)?;
        let name = format!("test_{label}_{}", uuid::Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|e| eyre::eyre!("failed to create {name}: {e}"))?;
        Ok(Self { cluster, name })
    }

    /// Connection URL for this database.
    pub fn url(&self) -> String {
        self.cluster.connection().database_url(&self.name)
    }

    /// Opens a dedicated connection, bypassing the adapters.
    pub fn connect(&self) -> eyre::Result<PgConnection> {
        Ok(PgConnection::establish(&self.url())?)
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.name);
        }
    }
}

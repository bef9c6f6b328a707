//! Seeding and adapter wiring shared by the `PostgreSQL` tests.

use super::cluster::TestDatabase;
use defectflow::conversion::adapters::postgres::PostgresConversionRepository;
use defectflow::defect::{
    adapters::postgres::PostgresDefectRepository,
    domain::{Defect, DefectDraft},
};
use defectflow::directory::domain::{ProjectId, UserId};
use defectflow::history::adapters::postgres::PostgresHistoryRepository;
use defectflow::persistence::build_pool;
use defectflow::task::domain::{Task, TaskDraft};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use tokio::runtime::Runtime;

pub const REPORTER: UserId = UserId::new(1);
pub const MANAGER: UserId = UserId::new(2);
pub const PROJECT: ProjectId = ProjectId::new(1);

/// Directory rows the defect and task foreign keys point at.
const SEED_SQL: &str = concat!(
    "INSERT INTO users (id, full_name, role) VALUES ",
    "(1, 'Ivan Petrov', 'engineer'), (2, 'Olga Smirnova', 'manager');",
    "INSERT INTO projects (id, name) VALUES (1, 'Office block');",
);

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    count: i64,
}

/// Adapters over one seeded test database.
///
/// Fields drop in order, so every pool is closed before the database goes.
pub struct Store {
    pub defects: PostgresDefectRepository,
    pub conversions: PostgresConversionRepository,
    pub history: PostgresHistoryRepository,
    pub database: TestDatabase,
}

impl Store {
    /// Creates and seeds a database, then wires the adapters to it.
    pub fn open(cluster: &'static TestCluster, label: &str) -> eyre::Result<Self> {
        let database = TestDatabase::create(cluster, label)?;
        database.connect()?.batch_execute(SEED_SQL)?;
        // Two connections so concurrent commits really overlap.
        let pool = build_pool(&database.url(), 2)?;
        Ok(Self {
            defects: PostgresDefectRepository::new(pool.clone()),
            conversions: PostgresConversionRepository::new(pool.clone()),
            history: PostgresHistoryRepository::new(pool),
            database,
        })
    }

    /// Counts task rows whose origin is `defect`.
    pub fn count_tasks_for(&self, defect: &Defect) -> eyre::Result<i64> {
        let mut conn = self.database.connect()?;
        let row = diesel::sql_query(
            "SELECT COUNT(*) AS count FROM tasks WHERE related_defect_id = $1",
        )
        .bind::<diesel::sql_types::Uuid, _>(defect.id().into_inner())
        .get_result::<CountRow>(&mut conn)?;
        Ok(row.count)
    }
}

/// Creates a tokio runtime for driving the async adapters.
pub fn test_runtime() -> eyre::Result<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Builds an unsaved defect reported against the seeded project.
pub fn reported(title: &str) -> eyre::Result<Defect> {
    let draft = DefectDraft::new(title, "Second floor corridor", PROJECT, REPORTER)?;
    Ok(Defect::new(draft, &DefaultClock))
}

/// Builds a task for `defect` and the defect as it looks once linked.
pub fn converted(defect: &Defect) -> eyre::Result<(Task, Defect)> {
    let task = Task::create(
        TaskDraft::from_defect(defect, MANAGER).with_assignee(REPORTER),
        &DefaultClock,
    );
    let mut linked = defect.clone();
    linked.mark_converted(task.id(), &DefaultClock)?;
    Ok((task, linked))
}

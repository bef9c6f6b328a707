//! Shared world state for defect conversion BDD scenarios.

use std::sync::Arc;

use defectflow::conversion::{
    adapters::memory::InMemoryConversionRepository,
    domain::ConversionOutcome,
    services::{ConversionError, ConversionService},
};
use defectflow::defect::{
    adapters::memory::InMemoryDefectRepository, domain::Defect,
    services::DefectLifecycleService,
};
use defectflow::directory::{
    adapters::memory::InMemoryDirectory,
    domain::{Project, ProjectId, Role, User, UserId},
};
use defectflow::history::adapters::memory::InMemoryHistoryRepository;
use defectflow::storage::adapters::memory::InMemoryBlobStorage;
use defectflow::task::{
    adapters::memory::InMemoryTaskRepository, domain::Task, services::TaskLifecycleService,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Customer reporting defects.
pub const REPORTER: UserId = UserId::new(5);
/// Engineer receiving converted tasks.
pub const ENGINEER: UserId = UserId::new(7);
/// Project every defect belongs to.
pub const PROJECT: ProjectId = ProjectId::new(1);

/// Defect service used by the BDD world.
pub type TestDefectService = DefectLifecycleService<
    InMemoryDefectRepository,
    InMemoryHistoryRepository,
    InMemoryDirectory,
    InMemoryBlobStorage,
    DefaultClock,
>;

/// Conversion service used by the BDD world.
pub type TestConversionService = ConversionService<
    InMemoryDefectRepository,
    InMemoryConversionRepository,
    InMemoryHistoryRepository,
    InMemoryDirectory,
    DefaultClock,
>;

/// Task service used by the BDD world.
pub type TestTaskService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryHistoryRepository,
    InMemoryDirectory,
    DefaultClock,
>;

/// Scenario world for defect conversion behaviour tests.
pub struct DefectConversionWorld {
    pub defects: TestDefectService,
    pub conversions: TestConversionService,
    pub tasks: TestTaskService,
    pub history: Arc<InMemoryHistoryRepository>,
    pub reported: Option<Defect>,
    pub converted_task: Option<Task>,
    pub last_conversion: Option<Result<ConversionOutcome, ConversionError>>,
}

impl DefectConversionWorld {
    /// Creates a world over empty in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let defect_store = InMemoryDefectRepository::new();
        let task_store = InMemoryTaskRepository::new();
        let conversion_store =
            InMemoryConversionRepository::new(defect_store.clone(), task_store.clone());
        let defect_repo = Arc::new(defect_store);
        let history = Arc::new(InMemoryHistoryRepository::new());
        let directory = Arc::new(
            InMemoryDirectory::new()
                .with_user(User::new(REPORTER, "Anna Sidorova", Role::Customer))
                .with_user(User::new(ENGINEER, "Ivan Petrov", Role::Engineer))
                .with_project(Project::new(PROJECT, "Riverside towers")),
        );
        let clock = Arc::new(DefaultClock);

        Self {
            defects: DefectLifecycleService::new(
                Arc::clone(&defect_repo),
                Arc::clone(&history),
                Arc::clone(&directory),
                Arc::new(InMemoryBlobStorage::new()),
                Arc::clone(&clock),
            ),
            conversions: ConversionService::new(
                defect_repo,
                Arc::new(conversion_store),
                Arc::clone(&history),
                Arc::clone(&directory),
                Arc::clone(&clock),
            ),
            tasks: TaskLifecycleService::new(
                Arc::new(task_store),
                Arc::clone(&history),
                directory,
                clock,
            ),
            history,
            reported: None,
            converted_task: None,
            last_conversion: None,
        }
    }

    /// Returns the defect reported by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no defect has been reported yet.
    pub fn reported(&self) -> Result<&Defect, eyre::Report> {
        self.reported
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing reported defect in scenario world"))
    }
}

impl Default for DefectConversionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DefectConversionWorld {
    DefectConversionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

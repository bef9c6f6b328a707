//! Shared wiring for in-memory integration tests.

use std::sync::Arc;

use defectflow::conversion::{
    adapters::memory::InMemoryConversionRepository, services::ConversionService,
};
use defectflow::defect::{
    adapters::memory::InMemoryDefectRepository,
    domain::Defect,
    services::{CreateDefectRequest, DefectLifecycleService},
};
use defectflow::directory::{
    adapters::memory::InMemoryDirectory,
    domain::{Project, ProjectId, Role, User, UserId},
};
use defectflow::history::adapters::memory::InMemoryHistoryRepository;
use defectflow::queries::TrackerQueries;
use defectflow::storage::{adapters::memory::InMemoryBlobStorage, ports::BlobStorage};
use defectflow::task::{adapters::memory::InMemoryTaskRepository, services::TaskLifecycleService};
use mockable::DefaultClock;
use rstest::fixture;

/// Reporting customer.
pub const REPORTER: UserId = UserId::new(5);
/// Engineer receiving converted tasks.
pub const ENGINEER: UserId = UserId::new(7);
/// Project every defect belongs to.
pub const PROJECT: ProjectId = ProjectId::new(1);

/// Every service wired over one set of shared in-memory stores.
pub struct Tracker<B: BlobStorage = InMemoryBlobStorage> {
    /// Defect lifecycle service.
    pub defects: DefectLifecycleService<
        InMemoryDefectRepository,
        InMemoryHistoryRepository,
        InMemoryDirectory,
        B,
        DefaultClock,
    >,
    /// Conversion orchestrator.
    pub conversions: ConversionService<
        InMemoryDefectRepository,
        InMemoryConversionRepository,
        InMemoryHistoryRepository,
        InMemoryDirectory,
        DefaultClock,
    >,
    /// Task lifecycle service.
    pub tasks: TaskLifecycleService<
        InMemoryTaskRepository,
        InMemoryHistoryRepository,
        InMemoryDirectory,
        DefaultClock,
    >,
    /// Read models.
    pub queries: TrackerQueries<
        InMemoryDefectRepository,
        InMemoryTaskRepository,
        InMemoryHistoryRepository,
        InMemoryDirectory,
    >,
    /// Shared history store.
    pub history: Arc<InMemoryHistoryRepository>,
    /// Shared blob store.
    pub blobs: Arc<B>,
}

/// Builds a tracker over `blobs`.
pub fn tracker_with<B: BlobStorage>(storage: B) -> Tracker<B> {
    let defect_store = InMemoryDefectRepository::new();
    let task_store = InMemoryTaskRepository::new();
    let conversion_store =
        InMemoryConversionRepository::new(defect_store.clone(), task_store.clone());
    let defect_repo = Arc::new(defect_store);
    let task_repo = Arc::new(task_store);
    let history = Arc::new(InMemoryHistoryRepository::new());
    let blobs = Arc::new(storage);
    let directory = Arc::new(
        InMemoryDirectory::new()
            .with_user(User::new(REPORTER, "Anna Sidorova", Role::Customer))
            .with_user(User::new(ENGINEER, "Ivan Petrov", Role::Engineer))
            .with_project(Project::new(PROJECT, "Riverside towers")),
    );
    let clock = Arc::new(DefaultClock);

    Tracker {
        defects: DefectLifecycleService::new(
            Arc::clone(&defect_repo),
            Arc::clone(&history),
            Arc::clone(&directory),
            Arc::clone(&blobs),
            Arc::clone(&clock),
        ),
        conversions: ConversionService::new(
            Arc::clone(&defect_repo),
            Arc::new(conversion_store),
            Arc::clone(&history),
            Arc::clone(&directory),
            Arc::clone(&clock),
        ),
        tasks: TaskLifecycleService::new(
            Arc::clone(&task_repo),
            Arc::clone(&history),
            Arc::clone(&directory),
            Arc::clone(&clock),
        ),
        queries: TrackerQueries::new(defect_repo, task_repo, Arc::clone(&history), directory),
        history,
        blobs,
    }
}

/// Provides a tracker backed by in-memory blob storage.
#[fixture]
pub fn tracker() -> Tracker {
    tracker_with(InMemoryBlobStorage::new())
}

/// Reports the roof leak defect used across scenarios.
///
/// # Errors
///
/// Returns an error if the defect cannot be created.
pub async fn report_leak<B: BlobStorage>(tracker: &Tracker<B>) -> eyre::Result<Defect> {
    Ok(tracker
        .defects
        .create_defect(CreateDefectRequest::new(
            "Leak",
            "roof leak",
            PROJECT,
            REPORTER,
        ))
        .await?)
}

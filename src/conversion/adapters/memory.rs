//! In-memory conversion commits over the in-memory defect and task stores.

use async_trait::async_trait;

use crate::conversion::ports::{
    ConversionRepository, ConversionRepositoryError, ConversionRepositoryResult,
};
use crate::defect::{
    adapters::memory::InMemoryDefectRepository,
    domain::{Defect, PersistedDefectData},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository, domain::Task, ports::TaskRepositoryError,
};

/// Commits conversions into shared in-memory defect and task repositories.
///
/// Both stores are locked for the whole commit, defects first.
#[derive(Debug, Clone)]
pub struct InMemoryConversionRepository {
    defects: InMemoryDefectRepository,
    tasks: InMemoryTaskRepository,
}

impl InMemoryConversionRepository {
    /// Creates a committer sharing state with the given repositories.
    #[must_use]
    pub const fn new(defects: InMemoryDefectRepository, tasks: InMemoryTaskRepository) -> Self {
        Self { defects, tasks }
    }
}

#[async_trait]
impl ConversionRepository for InMemoryConversionRepository {
    async fn commit(&self, task: &Task, defect: &Defect) -> ConversionRepositoryResult<()> {
        let mut defect_state = self.defects.state.write().map_err(|err| {
            ConversionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = defect_state
            .defects
            .get_mut(&defect.id())
            .ok_or(ConversionRepositoryError::DefectNotFound(defect.id()))?;
        if stored.is_converted() {
            return Err(ConversionRepositoryError::AlreadyConverted(defect.id()));
        }

        let mut task_state = self.tasks.state.write().map_err(|err| {
            ConversionRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        task_state.insert(task).map_err(|err| match err {
            TaskRepositoryError::DuplicateTask(task_id) => {
                ConversionRepositoryError::DuplicateTask(task_id)
            }
            TaskRepositoryError::DuplicateDefectOrigin(defect_id) => {
                ConversionRepositoryError::AlreadyConverted(defect_id)
            }
            other => ConversionRepositoryError::persistence(other),
        })?;

        let linked = Defect::from_persisted(PersistedDefectData {
            id: stored.id(),
            title: stored.title().to_owned(),
            description: stored.description().to_owned(),
            project_id: stored.project_id(),
            initiator_id: stored.initiator_id(),
            status: defect.status(),
            converted_to_task_id: Some(task.id()),
            created_at: stored.created_at(),
            updated_at: defect.updated_at(),
        });
        *stored = linked;
        Ok(())
    }
}

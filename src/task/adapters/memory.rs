//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::defect::domain::DefectId;
use crate::directory::domain::UserId;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    pub(crate) state: Arc<RwLock<TaskState>>,
}

#[derive(Debug, Default)]
pub(crate) struct TaskState {
    tasks: HashMap<TaskId, Task>,
    defect_index: HashMap<DefectId, TaskId>,
}

impl TaskState {
    /// Inserts a task, enforcing identifier and defect-origin uniqueness.
    pub(crate) fn insert(&mut self, task: &Task) -> TaskRepositoryResult<()> {
        if self.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        if let Some(defect_id) = task.related_defect_id() {
            if self.defect_index.contains_key(&defect_id) {
                return Err(TaskRepositoryError::DuplicateDefectOrigin(defect_id));
            }
            self.defect_index.insert(defect_id, task.id());
        }
        self.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn sorted(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.values().filter(|t| keep(t)).cloned().collect();
        tasks.sort_by_key(Task::created_at);
        tasks
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(task)
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;

        let merged = Task::from_persisted(PersistedTaskData {
            id: stored.id(),
            name: stored.name().to_owned(),
            description: stored.description().to_owned(),
            project_id: stored.project_id(),
            creator_id: stored.creator_id(),
            assignee_id: stored.assignee_id(),
            due_date: stored.due_date(),
            status: task.status(),
            related_defect_id: stored.related_defect_id(),
            created_at: stored.created_at(),
            updated_at: task.updated_at(),
        });
        *stored = merged;
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.sorted(|_| true))
    }

    async fn list_by_assignee(&self, assignee_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.sorted(|task| task.assignee_id() == Some(assignee_id)))
    }
}

//! In-memory directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::directory::{
    domain::{Project, ProjectId, User, UserId},
    ports::{Directory, DirectoryError, DirectoryResult},
};

/// Thread-safe directory seeded by the caller.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, User>,
    projects: HashMap<ProjectId, Project>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a user.
    pub fn insert_user(&self, user: User) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.users.insert(user.id(), user);
    }

    /// Adds or replaces a project.
    pub fn insert_project(&self, project: Project) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.projects.insert(project.id(), project);
    }

    /// Adds a user, returning the directory for chaining.
    #[must_use]
    pub fn with_user(self, user: User) -> Self {
        self.insert_user(user);
        self
    }

    /// Adds a project, returning the directory for chaining.
    #[must_use]
    pub fn with_project(self, project: Project) -> Self {
        self.insert_project(project);
        self
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn resolve_user(&self, id: UserId) -> DirectoryResult<Option<User>> {
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.users.get(&id).cloned())
    }

    async fn resolve_project(&self, id: ProjectId) -> DirectoryResult<Option<Project>> {
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::persistence(std::io::Error::other(err.to_string())))?;
        Ok(state.projects.get(&id).cloned())
    }
}

//! Lookup port for users and projects.

use crate::directory::domain::{Project, ProjectId, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Read-only access to the external user and project directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Resolves a user by identifier.
    ///
    /// Returns `None` when no such user exists.
    async fn resolve_user(&self, id: UserId) -> DirectoryResult<Option<User>>;

    /// Resolves a project by identifier.
    ///
    /// Returns `None` when no such project exists.
    async fn resolve_project(&self, id: ProjectId) -> DirectoryResult<Option<Project>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The directory backend failed.
    #[error("directory lookup failed: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a backend error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

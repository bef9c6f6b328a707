//! Repository port for defects and the attachments they own.

use crate::defect::domain::{Attachment, AttachmentId, Defect, DefectId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for defect repository operations.
pub type DefectRepositoryResult<T> = Result<T, DefectRepositoryError>;

/// Defect persistence contract.
///
/// The conversion link is written only through the conversion port; nothing
/// here can set or clear it.
#[async_trait]
pub trait DefectRepository: Send + Sync {
    /// Stores a new defect.
    ///
    /// # Errors
    ///
    /// Returns [`DefectRepositoryError::DuplicateDefect`] when the identifier
    /// already exists.
    async fn store(&self, defect: &Defect) -> DefectRepositoryResult<()>;

    /// Persists the status and update timestamp of an existing defect.
    ///
    /// # Errors
    ///
    /// Returns [`DefectRepositoryError::NotFound`] when the defect does not
    /// exist.
    async fn update_status(&self, defect: &Defect) -> DefectRepositoryResult<()>;

    /// Finds a defect by identifier.
    async fn find_by_id(&self, id: DefectId) -> DefectRepositoryResult<Option<Defect>>;

    /// Returns defects not yet converted into tasks, oldest first.
    async fn list_unconverted(&self) -> DefectRepositoryResult<Vec<Defect>>;

    /// Stores an attachment record.
    ///
    /// # Errors
    ///
    /// Returns [`DefectRepositoryError::NotFound`] when the owning defect does
    /// not exist, or [`DefectRepositoryError::DuplicateAttachment`] when the
    /// identifier is taken.
    async fn store_attachment(&self, attachment: &Attachment) -> DefectRepositoryResult<()>;

    /// Deletes an attachment record whose upload was abandoned.
    ///
    /// Deleting a record that does not exist succeeds.
    async fn remove_attachment(&self, id: AttachmentId) -> DefectRepositoryResult<()>;

    /// Finds an attachment by identifier.
    async fn find_attachment(&self, id: AttachmentId)
    -> DefectRepositoryResult<Option<Attachment>>;

    /// Returns the attachments of `defect_id`, oldest first.
    async fn list_attachments(&self, defect_id: DefectId)
    -> DefectRepositoryResult<Vec<Attachment>>;
}

/// Errors returned by defect repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DefectRepositoryError {
    /// A defect with the same identifier already exists.
    #[error("duplicate defect identifier: {0}")]
    DuplicateDefect(DefectId),

    /// An attachment with the same identifier already exists.
    #[error("duplicate attachment identifier: {0}")]
    DuplicateAttachment(AttachmentId),

    /// The defect was not found.
    #[error("defect not found: {0}")]
    NotFound(DefectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DefectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

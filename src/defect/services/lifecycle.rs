//! Defect lifecycle orchestration: reporting, comments, attachments and
//! status changes.

use super::requests::{
    AttachFileRequest, AttachmentUpload, CreateDefectRequest, RecordCommentRequest,
    TransitionDefectRequest,
};
use crate::config::{DEFAULT_MAX_UPLOAD_BYTES, TrackerConfig};
use crate::defect::{
    domain::{
        Attachment, AttachmentId, Defect, DefectDomainError, DefectDraft, DefectId, DefectStatus,
        ParseDefectStatusError,
    },
    ports::{DefectRepository, DefectRepositoryError},
};
use crate::directory::{
    domain::{ProjectId, User, UserId},
    ports::{Directory, DirectoryError},
};
use crate::error::ErrorKind;
use crate::history::{
    domain::{ActionType, HistoryEntry},
    ports::HistoryRepository,
    services::{HistoryLedger, HistoryLedgerError},
};
use crate::storage::{
    domain::{BlobFileName, StorageDomainError},
    ports::{BlobStorage, BlobStorageError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Limits applied to uploaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentPolicy {
    max_bytes: u64,
}

impl AttachmentPolicy {
    /// Creates a policy accepting files up to `max_bytes`.
    #[must_use]
    pub const fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// Builds the policy from process configuration.
    #[must_use]
    pub const fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.max_upload_bytes())
    }

    /// Returns the largest accepted size in bytes.
    #[must_use]
    pub const fn max_bytes(self) -> u64 {
        self.max_bytes
    }
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

/// Service-level errors for defect lifecycle operations.
#[derive(Debug, Error)]
pub enum DefectLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DefectDomainError),

    /// The requested status name is unknown.
    #[error(transparent)]
    InvalidStatus(#[from] ParseDefectStatusError),

    /// The comment text is blank.
    #[error("comment text must not be empty")]
    EmptyComment,

    /// The uploaded file exceeds the policy limit.
    #[error("attachment of {size} bytes exceeds the {max} byte limit")]
    AttachmentTooLarge {
        /// Uploaded size.
        size: u64,
        /// Policy limit.
        max: u64,
    },

    /// The uploaded file name is unusable.
    #[error(transparent)]
    InvalidFileName(#[from] StorageDomainError),

    /// The defect does not exist.
    #[error("defect not found: {0}")]
    DefectNotFound(DefectId),

    /// The attachment record does not exist.
    #[error("attachment not found: {0}")]
    AttachmentNotFound(AttachmentId),

    /// The referenced user does not exist.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    /// The referenced project does not exist.
    #[error("unknown project: {0}")]
    UnknownProject(ProjectId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] DefectRepositoryError),

    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Blob storage failed.
    #[error(transparent)]
    Storage(#[from] BlobStorageError),

    /// History ledger failed.
    #[error(transparent)]
    History(#[from] HistoryLedgerError),
}

impl DefectLifecycleError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(DefectDomainError::AlreadyConverted { .. }) => ErrorKind::AlreadyConverted,
            Self::Domain(_)
            | Self::InvalidStatus(_)
            | Self::EmptyComment
            | Self::AttachmentTooLarge { .. }
            | Self::InvalidFileName(_)
            | Self::Storage(BlobStorageError::Invalid(_)) => ErrorKind::Validation,
            Self::DefectNotFound(_)
            | Self::AttachmentNotFound(_)
            | Self::Repository(DefectRepositoryError::NotFound(_))
            | Self::Storage(BlobStorageError::NotFound(_)) => ErrorKind::NotFound,
            Self::UnknownUser(_) | Self::UnknownProject(_) => ErrorKind::Reference,
            Self::Repository(_) | Self::Directory(_) | Self::Storage(_) | Self::History(_) => {
                ErrorKind::Storage
            }
        }
    }
}

/// Result type for defect lifecycle operations.
pub type DefectLifecycleResult<T> = Result<T, DefectLifecycleError>;

/// An attachment record together with its stored bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedAttachment {
    /// Attachment record.
    pub attachment: Attachment,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Defect lifecycle orchestration service.
pub struct DefectLifecycleService<D, H, R, B, C>
where
    D: DefectRepository,
    H: HistoryRepository,
    R: Directory,
    B: BlobStorage,
    C: Clock + Send + Sync,
{
    defects: Arc<D>,
    ledger: HistoryLedger<H>,
    directory: Arc<R>,
    blobs: Arc<B>,
    clock: Arc<C>,
    policy: AttachmentPolicy,
}

impl<D, H, R, B, C> Clone for DefectLifecycleService<D, H, R, B, C>
where
    D: DefectRepository,
    H: HistoryRepository,
    R: Directory,
    B: BlobStorage,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            defects: Arc::clone(&self.defects),
            ledger: self.ledger.clone(),
            directory: Arc::clone(&self.directory),
            blobs: Arc::clone(&self.blobs),
            clock: Arc::clone(&self.clock),
            policy: self.policy,
        }
    }
}

impl<D, H, R, B, C> DefectLifecycleService<D, H, R, B, C>
where
    D: DefectRepository,
    H: HistoryRepository,
    R: Directory,
    B: BlobStorage,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default attachment policy.
    #[must_use]
    pub fn new(
        defects: Arc<D>,
        history: Arc<H>,
        directory: Arc<R>,
        blobs: Arc<B>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            defects,
            ledger: HistoryLedger::new(history),
            directory,
            blobs,
            clock,
            policy: AttachmentPolicy::default(),
        }
    }

    /// Replaces the attachment policy.
    #[must_use]
    pub const fn with_attachment_policy(mut self, policy: AttachmentPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reports a new defect.
    ///
    /// No history entry is written for plain creation.
    ///
    /// # Errors
    ///
    /// Returns [`DefectLifecycleError`] when the title or description is
    /// blank, the project or initiator is unknown, or persistence fails.
    pub async fn create_defect(
        &self,
        request: CreateDefectRequest,
    ) -> DefectLifecycleResult<Defect> {
        let CreateDefectRequest {
            title,
            description,
            project_id,
            initiator_id,
        } = request;
        let draft = DefectDraft::new(&title, &description, project_id, initiator_id)?;
        if self
            .directory
            .resolve_project(draft.project_id())
            .await?
            .is_none()
        {
            return Err(DefectLifecycleError::UnknownProject(draft.project_id()));
        }
        self.resolve_actor(draft.initiator_id()).await?;

        let defect = Defect::new(draft, &*self.clock);
        self.defects.store(&defect).await?;
        tracing::info!(
            defect_id = %defect.id(),
            project_id = %defect.project_id(),
            "defect reported"
        );
        Ok(defect)
    }

    /// Records a comment, optionally storing a file with it.
    ///
    /// The file is written before the comment entry; if storing it fails no
    /// entry is appended, and if the append fails the file is removed again.
    ///
    /// # Errors
    ///
    /// Returns [`DefectLifecycleError`] when the defect or actor is unknown,
    /// the text is blank, the file is rejected, or storage fails.
    pub async fn record_comment(
        &self,
        request: RecordCommentRequest,
    ) -> DefectLifecycleResult<HistoryEntry> {
        let RecordCommentRequest {
            defect_id,
            actor_id,
            text,
            attachment,
        } = request;

        self.require_defect(defect_id).await?;
        self.resolve_actor(actor_id).await?;
        let comment = text.trim();
        if comment.is_empty() {
            return Err(DefectLifecycleError::EmptyComment);
        }

        let stored = match attachment {
            Some(upload) => Some(self.store_upload(defect_id, &upload).await?),
            None => None,
        };
        let action_text = stored.as_ref().map_or_else(
            || comment.to_owned(),
            |attachment| format!("{comment} (attached {})", attachment.file_name()),
        );

        let appended = self
            .ledger
            .append(HistoryEntry::record(
                defect_id,
                actor_id,
                ActionType::Comment,
                action_text,
                &*self.clock,
            ))
            .await;
        let entry = match appended {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(attachment) = &stored {
                    self.discard_attachment(attachment).await;
                }
                return Err(err.into());
            }
        };
        tracing::info!(defect_id = %defect_id, actor_id = %actor_id, "comment recorded");
        Ok(entry)
    }

    /// Stores a file against a defect without a comment.
    ///
    /// Appends a `comment` entry naming the file. The file and its record are
    /// removed again when the append fails.
    ///
    /// # Errors
    ///
    /// Returns [`DefectLifecycleError`] when the defect or actor is unknown,
    /// the file is rejected, or storage fails.
    pub async fn attach_file(
        &self,
        request: AttachFileRequest,
    ) -> DefectLifecycleResult<Attachment> {
        let AttachFileRequest {
            defect_id,
            actor_id,
            upload,
        } = request;

        self.require_defect(defect_id).await?;
        self.resolve_actor(actor_id).await?;
        let attachment = self.store_upload(defect_id, &upload).await?;

        let appended = self
            .ledger
            .append(HistoryEntry::record(
                defect_id,
                actor_id,
                ActionType::Comment,
                format!("Attached file {}", attachment.file_name()),
                &*self.clock,
            ))
            .await;
        if let Err(err) = appended {
            self.discard_attachment(&attachment).await;
            return Err(err.into());
        }
        tracing::info!(
            defect_id = %defect_id,
            attachment_id = %attachment.id(),
            "file attached"
        );
        Ok(attachment)
    }

    /// Moves a defect to a new status and records the change.
    ///
    /// Only the status is persisted; the conversion link is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DefectLifecycleError`] when the defect or actor is unknown,
    /// the status name is unknown, the transition is not allowed, or
    /// persistence fails.
    pub async fn transition_defect(
        &self,
        request: TransitionDefectRequest,
    ) -> DefectLifecycleResult<Defect> {
        let TransitionDefectRequest {
            defect_id,
            status,
            actor_id,
        } = request;
        let mut defect = self.require_defect(defect_id).await?;
        self.resolve_actor(actor_id).await?;
        let target = DefectStatus::try_from(status.as_str())?;

        let previous = defect.status();
        defect.transition_to(target, &*self.clock)?;
        self.defects.update_status(&defect).await?;

        self.ledger
            .append(HistoryEntry::record(
                defect_id,
                actor_id,
                ActionType::StatusChanged,
                format!("Defect status changed: {previous} -> {target}"),
                &*self.clock,
            ))
            .await?;
        tracing::info!(
            defect_id = %defect.id(),
            from = %previous,
            to = %target,
            "defect status changed"
        );
        Ok(defect)
    }

    /// Finds a defect by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DefectLifecycleError::Repository`] when the lookup fails.
    pub async fn find_defect(&self, id: DefectId) -> DefectLifecycleResult<Option<Defect>> {
        tracing::debug!(defect_id = %id, "finding defect");
        Ok(self.defects.find_by_id(id).await?)
    }

    /// Lists defects awaiting conversion, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DefectLifecycleError::Repository`] when the lookup fails.
    pub async fn list_unconverted(&self) -> DefectLifecycleResult<Vec<Defect>> {
        Ok(self.defects.list_unconverted().await?)
    }

    /// Lists the attachments of a defect, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DefectLifecycleError::DefectNotFound`] when the defect does
    /// not exist.
    pub async fn list_attachments(
        &self,
        defect_id: DefectId,
    ) -> DefectLifecycleResult<Vec<Attachment>> {
        self.require_defect(defect_id).await?;
        Ok(self.defects.list_attachments(defect_id).await?)
    }

    /// Loads an attachment record and its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DefectLifecycleError::AttachmentNotFound`] when no record
    /// exists, or [`DefectLifecycleError::Storage`] when the blob is missing
    /// or unreadable.
    pub async fn retrieve_attachment(
        &self,
        id: AttachmentId,
    ) -> DefectLifecycleResult<RetrievedAttachment> {
        let attachment = self
            .defects
            .find_attachment(id)
            .await?
            .ok_or(DefectLifecycleError::AttachmentNotFound(id))?;
        let bytes = self.blobs.retrieve(attachment.storage_path()).await?;
        Ok(RetrievedAttachment { attachment, bytes })
    }

    async fn require_defect(&self, id: DefectId) -> DefectLifecycleResult<Defect> {
        self.defects
            .find_by_id(id)
            .await?
            .ok_or(DefectLifecycleError::DefectNotFound(id))
    }

    async fn resolve_actor(&self, id: UserId) -> DefectLifecycleResult<User> {
        self.directory
            .resolve_user(id)
            .await?
            .ok_or(DefectLifecycleError::UnknownUser(id))
    }

    /// Validates an upload, writes the blob, then the attachment record.
    ///
    /// A blob whose record cannot be written is removed before returning.
    async fn store_upload(
        &self,
        defect_id: DefectId,
        upload: &AttachmentUpload,
    ) -> DefectLifecycleResult<Attachment> {
        let size = u64::try_from(upload.bytes.len()).unwrap_or(u64::MAX);
        if size > self.policy.max_bytes() {
            return Err(DefectLifecycleError::AttachmentTooLarge {
                size,
                max: self.policy.max_bytes(),
            });
        }
        let file_name = BlobFileName::new(&upload.file_name)?;

        let blob = self.blobs.store(&file_name, &upload.bytes).await?;
        let attachment = Attachment::for_blob(defect_id, &blob, &*self.clock);
        if let Err(err) = self.defects.store_attachment(&attachment).await {
            self.discard_blob(blob.path()).await;
            return Err(err.into());
        }
        Ok(attachment)
    }

    async fn discard_attachment(&self, attachment: &Attachment) {
        if let Err(err) = self.defects.remove_attachment(attachment.id()).await {
            tracing::warn!(
                attachment_id = %attachment.id(),
                error = %err,
                "failed to remove abandoned attachment record"
            );
        }
        self.discard_blob(attachment.storage_path()).await;
    }

    async fn discard_blob(&self, path: &str) {
        if let Err(err) = self.blobs.remove(path).await {
            tracing::warn!(path = %path, error = %err, "failed to remove abandoned blob");
        }
    }
}

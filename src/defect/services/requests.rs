//! Request payloads accepted by the defect lifecycle service.

use crate::defect::domain::DefectId;
use crate::directory::domain::{ProjectId, UserId};

/// Request payload for reporting a defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDefectRequest {
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Project the defect is reported against.
    pub project_id: ProjectId,
    /// Reporting user.
    pub initiator_id: UserId,
}

impl CreateDefectRequest {
    /// Creates a request with all required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        project_id: ProjectId,
        initiator_id: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            project_id,
            initiator_id,
        }
    }
}

/// A file uploaded by a client.
#[derive(Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    /// Client-supplied file name; sanitized before storage.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    /// Creates an upload.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for AttachmentUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachmentUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Request payload for commenting on a defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCommentRequest {
    /// Defect being commented on.
    pub defect_id: DefectId,
    /// Commenting user.
    pub actor_id: UserId,
    /// Comment text.
    pub text: String,
    /// Optional file stored with the comment.
    pub attachment: Option<AttachmentUpload>,
}

impl RecordCommentRequest {
    /// Creates a plain comment request.
    #[must_use]
    pub fn new(defect_id: DefectId, actor_id: UserId, text: impl Into<String>) -> Self {
        Self {
            defect_id,
            actor_id,
            text: text.into(),
            attachment: None,
        }
    }

    /// Attaches a file to the comment.
    #[must_use]
    pub fn with_attachment(mut self, upload: AttachmentUpload) -> Self {
        self.attachment = Some(upload);
        self
    }
}

/// Request payload for a standalone file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachFileRequest {
    /// Defect receiving the file.
    pub defect_id: DefectId,
    /// Uploading user.
    pub actor_id: UserId,
    /// Uploaded file.
    pub upload: AttachmentUpload,
}

/// Request payload for changing a defect's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionDefectRequest {
    /// Defect being changed.
    pub defect_id: DefectId,
    /// Requested status name, for example `UnderReview` or `in_progress`.
    pub status: String,
    /// Acting user.
    pub actor_id: UserId,
}

//! Files attached to a defect.

use super::{AttachmentId, DefectId};
use crate::storage::domain::StoredBlob;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Record of a stored file belonging to a defect.
///
/// Attachments are never mutated or deleted once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    id: AttachmentId,
    defect_id: DefectId,
    file_name: String,
    storage_path: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttachment {
    /// Attachment identifier.
    pub id: AttachmentId,
    /// Owning defect.
    pub defect_id: DefectId,
    /// Sanitized file name shown to users.
    pub file_name: String,
    /// Location in blob storage.
    pub storage_path: String,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Records a blob that has just been written to storage.
    #[must_use]
    pub fn for_blob(defect_id: DefectId, blob: &StoredBlob, clock: &impl Clock) -> Self {
        Self {
            id: AttachmentId::new(),
            defect_id,
            file_name: blob.file_name().as_str().to_owned(),
            storage_path: blob.path().to_owned(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an attachment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttachment) -> Self {
        Self {
            id: data.id,
            defect_id: data.defect_id,
            file_name: data.file_name,
            storage_path: data.storage_path,
            created_at: data.created_at,
        }
    }

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> AttachmentId {
        self.id
    }

    /// Returns the owning defect.
    #[must_use]
    pub const fn defect_id(&self) -> DefectId {
        self.defect_id
    }

    /// Returns the sanitized file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the blob storage path.
    #[must_use]
    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    /// Returns the upload timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

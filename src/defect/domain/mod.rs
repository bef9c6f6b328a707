//! Domain model for defects and their attachments.

mod attachment;
mod defect;
mod error;
mod ids;
mod status;

pub use attachment::{Attachment, PersistedAttachment};
pub use defect::{Defect, DefectDraft, PersistedDefectData};
pub use error::{DefectDomainError, ParseDefectStatusError};
pub use ids::{AttachmentId, DefectId};
pub use status::DefectStatus;

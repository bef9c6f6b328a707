//! Service layer for the defect lifecycle.

mod lifecycle;
mod requests;

pub use lifecycle::{
    AttachmentPolicy, DefectLifecycleError, DefectLifecycleResult, DefectLifecycleService,
    RetrievedAttachment,
};
pub use requests::{
    AttachFileRequest, AttachmentUpload, CreateDefectRequest, RecordCommentRequest,
    TransitionDefectRequest,
};

//! In-memory defect repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::defect::{
    domain::{Attachment, AttachmentId, Defect, DefectId, PersistedDefectData},
    ports::{DefectRepository, DefectRepositoryError, DefectRepositoryResult},
};

/// Thread-safe in-memory defect repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDefectRepository {
    pub(crate) state: Arc<RwLock<DefectState>>,
}

#[derive(Debug, Default)]
pub(crate) struct DefectState {
    pub(crate) defects: HashMap<DefectId, Defect>,
    attachments: HashMap<AttachmentId, Attachment>,
}

impl InMemoryDefectRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DefectRepository for InMemoryDefectRepository {
    async fn store(&self, defect: &Defect) -> DefectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DefectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.defects.contains_key(&defect.id()) {
            return Err(DefectRepositoryError::DuplicateDefect(defect.id()));
        }
        state.defects.insert(defect.id(), defect.clone());
        Ok(())
    }

    async fn update_status(&self, defect: &Defect) -> DefectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DefectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .defects
            .get_mut(&defect.id())
            .ok_or(DefectRepositoryError::NotFound(defect.id()))?;

        // Keep the stored conversion link whatever the caller's copy says.
        let merged = Defect::from_persisted(PersistedDefectData {
            id: stored.id(),
            title: stored.title().to_owned(),
            description: stored.description().to_owned(),
            project_id: stored.project_id(),
            initiator_id: stored.initiator_id(),
            status: defect.status(),
            converted_to_task_id: stored.converted_to_task_id(),
            created_at: stored.created_at(),
            updated_at: defect.updated_at(),
        });
        *stored = merged;
        Ok(())
    }

    async fn find_by_id(&self, id: DefectId) -> DefectRepositoryResult<Option<Defect>> {
        let state = self.state.read().map_err(|err| {
            DefectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.defects.get(&id).cloned())
    }

    async fn list_unconverted(&self) -> DefectRepositoryResult<Vec<Defect>> {
        let state = self.state.read().map_err(|err| {
            DefectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut pending: Vec<Defect> = state
            .defects
            .values()
            .filter(|defect| !defect.is_converted())
            .cloned()
            .collect();
        pending.sort_by_key(Defect::created_at);
        Ok(pending)
    }

    async fn store_attachment(&self, attachment: &Attachment) -> DefectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DefectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.defects.contains_key(&attachment.defect_id()) {
            return Err(DefectRepositoryError::NotFound(attachment.defect_id()));
        }
        if state.attachments.contains_key(&attachment.id()) {
            return Err(DefectRepositoryError::DuplicateAttachment(attachment.id()));
        }
        state.attachments.insert(attachment.id(), attachment.clone());
        Ok(())
    }

    async fn remove_attachment(&self, id: AttachmentId) -> DefectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            DefectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.attachments.remove(&id);
        Ok(())
    }

    async fn find_attachment(
        &self,
        id: AttachmentId,
    ) -> DefectRepositoryResult<Option<Attachment>> {
        let state = self.state.read().map_err(|err| {
            DefectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.attachments.get(&id).cloned())
    }

    async fn list_attachments(
        &self,
        defect_id: DefectId,
    ) -> DefectRepositoryResult<Vec<Attachment>> {
        let state = self.state.read().map_err(|err| {
            DefectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut owned: Vec<Attachment> = state
            .attachments
            .values()
            .filter(|attachment| attachment.defect_id() == defect_id)
            .cloned()
            .collect();
        owned.sort_by_key(Attachment::created_at);
        Ok(owned)
    }
}

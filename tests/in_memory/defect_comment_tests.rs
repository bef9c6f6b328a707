//! Comments, attachments and defect transitions.

use async_trait::async_trait;
use defectflow::defect::services::{
    AttachmentUpload, RecordCommentRequest, TransitionDefectRequest,
};
use defectflow::error::ErrorKind;
use defectflow::history::ports::HistoryRepository;
use defectflow::storage::{
    domain::{BlobFileName, StoredBlob},
    ports::{BlobStorage, BlobStorageError, BlobStorageResult},
};
use eyre::{bail, ensure};
use rstest::rstest;

use super::helpers::{ENGINEER, REPORTER, Tracker, report_leak, tracker, tracker_with};

/// Blob storage whose writes always fail.
struct FailingBlobs;

#[async_trait]
impl BlobStorage for FailingBlobs {
    async fn store(
        &self,
        _file_name: &BlobFileName,
        _bytes: &[u8],
    ) -> BlobStorageResult<StoredBlob> {
        Err(BlobStorageError::io(std::io::Error::other("volume unmounted")))
    }

    async fn retrieve(&self, path: &str) -> BlobStorageResult<Vec<u8>> {
        Err(BlobStorageError::NotFound(path.to_owned()))
    }

    async fn remove(&self, _path: &str) -> BlobStorageResult<()> {
        Ok(())
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_attachment_write_records_nothing() -> eyre::Result<()> {
    let tracker = tracker_with(FailingBlobs);
    let defect = report_leak(&tracker).await?;

    let request = RecordCommentRequest::new(defect.id(), REPORTER, "Photo of the ceiling")
        .with_attachment(AttachmentUpload::new("ceiling.jpg", b"jpg".to_vec()));
    let Err(err) = tracker.defects.record_comment(request).await else {
        bail!("comment should fail when the file cannot be stored");
    };

    ensure!(err.kind() == ErrorKind::Storage);
    ensure!(tracker.history.list_for(defect.id()).await?.is_empty());
    ensure!(tracker.defects.list_attachments(defect.id()).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn attachment_bytes_round_trip_through_storage(tracker: Tracker) -> eyre::Result<()> {
    let defect = report_leak(&tracker).await?;
    let request = RecordCommentRequest::new(defect.id(), REPORTER, "Photo")
        .with_attachment(AttachmentUpload::new("ceiling.jpg", b"\xff\xd8jpeg".to_vec()));
    tracker.defects.record_comment(request).await?;

    let details = tracker.queries.defect_details(defect.id()).await?;
    let [attachment] = details.attachments.as_slice() else {
        bail!("expected one attachment");
    };
    let retrieved = tracker.defects.retrieve_attachment(attachment.id()).await?;

    ensure!(retrieved.bytes == b"\xff\xd8jpeg");
    ensure!(tracker.blobs.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_cycle_is_recorded_in_order(tracker: Tracker) -> eyre::Result<()> {
    let defect = report_leak(&tracker).await?;

    for status in ["InProgress", "UnderReview", "InProgress", "UnderReview", "Closed"] {
        tracker
            .defects
            .transition_defect(TransitionDefectRequest {
                defect_id: defect.id(),
                status: status.to_owned(),
                actor_id: ENGINEER,
            })
            .await?;
    }

    let texts: Vec<String> = tracker
        .history
        .list_for(defect.id())
        .await?
        .iter()
        .map(|entry| entry.action_text().to_owned())
        .collect();
    ensure!(
        texts
            == [
                "Defect status changed: New -> InProgress",
                "Defect status changed: InProgress -> UnderReview",
                "Defect status changed: UnderReview -> InProgress",
                "Defect status changed: InProgress -> UnderReview",
                "Defect status changed: UnderReview -> Closed",
            ]
    );
    Ok(())
}

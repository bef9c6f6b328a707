//! Task status changes recorded against the originating defect.

use super::helpers::{ENGINEER, REPORTER, Tracker, report_leak, tracker};
use defectflow::conversion::services::ConvertDefectRequest;
use defectflow::defect::domain::DefectStatus;
use defectflow::history::{domain::ActionType, ports::HistoryRepository};
use defectflow::task::{domain::TaskStatus, services::UpdateTaskStatusRequest};
use eyre::{bail, ensure};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finishing_converted_task_appends_second_entry(tracker: Tracker) -> eyre::Result<()> {
    let defect = report_leak(&tracker).await?;
    let outcome = tracker
        .conversions
        .convert(ConvertDefectRequest::new(defect.id(), ENGINEER, REPORTER))
        .await?;

    let update = tracker
        .tasks
        .update_status(UpdateTaskStatusRequest::new(outcome.task.id(), "Done", ENGINEER))
        .await?;

    ensure!(update.task.status() == TaskStatus::Done);
    let history = tracker.history.list_for(defect.id()).await?;
    let [first, second] = history.as_slice() else {
        bail!("expected two history entries, got {}", history.len());
    };
    ensure!(first.action_type() == ActionType::Assigned);
    ensure!(second.action_type() == ActionType::StatusChanged);
    ensure!(second.action_text() == "Task status changed: Open -> Done");
    ensure!(update.related_history == history);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_changes_leave_defect_status_alone(tracker: Tracker) -> eyre::Result<()> {
    let defect = report_leak(&tracker).await?;
    let outcome = tracker
        .conversions
        .convert(ConvertDefectRequest::new(defect.id(), ENGINEER, REPORTER))
        .await?;

    tracker
        .tasks
        .update_status(UpdateTaskStatusRequest::new(outcome.task.id(), "Cancelled", ENGINEER))
        .await?;

    let stored = tracker.defects.find_defect(defect.id()).await?;
    ensure!(stored.as_ref().map(|d| d.status()) == Some(DefectStatus::InProgress));
    ensure!(stored.and_then(|d| d.converted_to_task_id()) == Some(outcome.task.id()));
    Ok(())
}

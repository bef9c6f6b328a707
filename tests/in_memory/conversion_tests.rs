//! End-to-end conversion through the public service API.

use super::helpers::{ENGINEER, REPORTER, Tracker, report_leak, tracker};
use defectflow::conversion::services::ConvertDefectRequest;
use defectflow::defect::domain::DefectStatus;
use defectflow::error::ErrorKind;
use defectflow::history::{domain::ActionType, ports::HistoryRepository};
use defectflow::task::domain::TaskStatus;
use eyre::{bail, ensure};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reported_defect_starts_new_and_unconverted(tracker: Tracker) -> eyre::Result<()> {
    let defect = report_leak(&tracker).await?;

    ensure!(defect.status() == DefectStatus::New);
    ensure!(!defect.is_converted());
    ensure!(tracker.defects.list_unconverted().await? == vec![defect]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conversion_links_defect_and_task(tracker: Tracker) -> eyre::Result<()> {
    let defect = report_leak(&tracker).await?;

    let outcome = tracker
        .conversions
        .convert(ConvertDefectRequest::new(defect.id(), ENGINEER, REPORTER))
        .await?;

    ensure!(outcome.task.status() == TaskStatus::Open);
    ensure!(outcome.task.related_defect_id() == Some(defect.id()));
    let Some(stored) = tracker.defects.find_defect(defect.id()).await? else {
        bail!("converted defect should exist");
    };
    ensure!(stored.status() == DefectStatus::InProgress);
    ensure!(stored.is_converted());
    ensure!(stored.converted_to_task_id() == Some(outcome.task.id()));
    ensure!(tracker.defects.list_unconverted().await?.is_empty());

    let history = tracker.history.list_for(defect.id()).await?;
    ensure!(history.len() == 1);
    ensure!(
        history
            .iter()
            .all(|entry| entry.action_type() == ActionType::Assigned)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn converting_twice_fails_and_changes_nothing(tracker: Tracker) -> eyre::Result<()> {
    let defect = report_leak(&tracker).await?;
    let request = ConvertDefectRequest::new(defect.id(), ENGINEER, REPORTER);
    tracker.conversions.convert(request.clone()).await?;
    let tasks_before = tracker.tasks.list_tasks().await?;
    let defect_before = tracker.defects.find_defect(defect.id()).await?;

    let Err(err) = tracker.conversions.convert(request).await else {
        bail!("second conversion should fail");
    };

    ensure!(err.kind() == ErrorKind::AlreadyConverted);
    ensure!(tracker.tasks.list_tasks().await? == tasks_before);
    ensure!(tracker.defects.find_defect(defect.id()).await? == defect_before);
    ensure!(tracker.history.entry_count()? == 1);
    Ok(())
}

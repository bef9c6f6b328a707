//! Conversion commits against `PostgreSQL`.

use crate::postgres::helpers::{Store, converted, reported, test_runtime};
use defectflow::conversion::ports::{ConversionRepository, ConversionRepositoryError};
use defectflow::defect::{domain::DefectStatus, ports::DefectRepository};
use eyre::{bail, ensure};
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;

#[rstest]
fn commit_links_defect_to_new_task(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let store = Store::open(shared_test_cluster, "commit_links")?;
    let rt = test_runtime()?;
    let defect = reported("Cracked tile")?;
    rt.block_on(store.defects.store(&defect))?;
    let (task, linked) = converted(&defect)?;

    rt.block_on(store.conversions.commit(&task, &linked))?;

    let Some(stored) = rt.block_on(store.defects.find_by_id(defect.id()))? else {
        bail!("converted defect should still exist");
    };
    ensure!(stored.converted_to_task_id() == Some(task.id()));
    ensure!(stored.is_converted());
    ensure!(stored.status() == DefectStatus::InProgress);
    ensure!(rt.block_on(store.defects.list_unconverted())?.is_empty());
    ensure!(store.count_tasks_for(&defect)? == 1);
    Ok(())
}

#[rstest]
fn second_commit_is_already_converted(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let store = Store::open(shared_test_cluster, "double_commit")?;
    let rt = test_runtime()?;
    let defect = reported("Cracked tile")?;
    rt.block_on(store.defects.store(&defect))?;
    let (first_task, first_link) = converted(&defect)?;
    let (second_task, second_link) = converted(&defect)?;

    rt.block_on(store.conversions.commit(&first_task, &first_link))?;
    let result = rt.block_on(store.conversions.commit(&second_task, &second_link));

    ensure!(
        matches!(
            result,
            Err(ConversionRepositoryError::AlreadyConverted(id)) if id == defect.id()
        ),
        "expected AlreadyConverted, got {result:?}"
    );
    ensure!(store.count_tasks_for(&defect)? == 1);
    let stored = rt.block_on(store.defects.find_by_id(defect.id()))?;
    ensure!(stored.and_then(|d| d.converted_to_task_id()) == Some(first_task.id()));
    Ok(())
}

#[rstest]
fn racing_commits_leave_one_task(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let store = Store::open(shared_test_cluster, "racing_commits")?;
    let rt = test_runtime()?;
    let defect = reported("Broken handrail")?;
    rt.block_on(store.defects.store(&defect))?;
    let (left_task, left_link) = converted(&defect)?;
    let (right_task, right_link) = converted(&defect)?;

    let (left, right) = rt.block_on(async {
        tokio::join!(
            store.conversions.commit(&left_task, &left_link),
            store.conversions.commit(&right_task, &right_link),
        )
    });

    let outcomes = [left, right];
    let committed = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let rejected = outcomes
        .iter()
        .filter(|outcome| {
            matches!(
                outcome,
                Err(ConversionRepositoryError::AlreadyConverted(_))
            )
        })
        .count();
    ensure!(
        committed == 1 && rejected == 1,
        "expected one winner and one AlreadyConverted, got {outcomes:?}"
    );
    ensure!(store.count_tasks_for(&defect)? == 1);
    Ok(())
}

#[rstest]
fn commit_for_missing_defect_writes_nothing(
    shared_test_cluster: &'static TestCluster,
) -> eyre::Result<()> {
    let store = Store::open(shared_test_cluster, "missing_defect")?;
    let rt = test_runtime()?;
    let defect = reported("Never saved")?;
    let (task, linked) = converted(&defect)?;

    let result = rt.block_on(store.conversions.commit(&task, &linked));

    ensure!(
        matches!(
            result,
            Err(ConversionRepositoryError::DefectNotFound(id)) if id == defect.id()
        ),
        "expected DefectNotFound, got {result:?}"
    );
    ensure!(store.count_tasks_for(&defect)? == 0);
    Ok(())
}

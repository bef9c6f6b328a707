//! Then steps for defect conversion BDD scenarios.

use super::world::{DefectConversionWorld, run_async};
use defectflow::defect::domain::DefectStatus;
use defectflow::error::ErrorKind;
use defectflow::history::ports::HistoryRepository;
use rstest_bdd_macros::then;

#[then(r#"the defect status is "{status}""#)]
fn defect_status_is(world: &DefectConversionWorld, status: String) -> Result<(), eyre::Report> {
    let expected = DefectStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let defect_id = world.reported()?.id();
    let stored = run_async(world.defects.find_defect(defect_id))?
        .ok_or_else(|| eyre::eyre!("reported defect disappeared"))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            stored.status().as_str()
        ));
    }
    Ok(())
}

#[then("the defect is linked to the new task")]
fn defect_is_linked(world: &DefectConversionWorld) -> Result<(), eyre::Report> {
    let defect_id = world.reported()?.id();
    let task = world
        .converted_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing converted task"))?;
    let stored = run_async(world.defects.find_defect(defect_id))?
        .ok_or_else(|| eyre::eyre!("reported defect disappeared"))?;

    eyre::ensure!(stored.is_converted(), "defect is not flagged as converted");
    eyre::ensure!(
        stored.converted_to_task_id() == Some(task.id()),
        "defect links to {:?}, expected {}",
        stored.converted_to_task_id(),
        task.id()
    );
    eyre::ensure!(
        task.related_defect_id() == Some(defect_id),
        "task does not point back at the defect"
    );
    Ok(())
}

#[then("the defect history has {count:usize} entries")]
fn history_has_entries(world: &DefectConversionWorld, count: usize) -> Result<(), eyre::Report> {
    let defect_id = world.reported()?.id();
    let history = run_async(world.history.list_for(defect_id))?;
    eyre::ensure!(
        history.len() == count,
        "expected {count} history entries, found {}",
        history.len()
    );
    Ok(())
}

#[then(r#"the latest history entry reads "{text}""#)]
fn latest_entry_reads(world: &DefectConversionWorld, text: String) -> Result<(), eyre::Report> {
    let defect_id = world.reported()?.id();
    let history = run_async(world.history.list_for(defect_id))?;
    let latest = history
        .last()
        .ok_or_else(|| eyre::eyre!("defect history is empty"))?;
    eyre::ensure!(
        latest.action_text() == text,
        "expected '{text}', found '{}'",
        latest.action_text()
    );
    Ok(())
}

#[then("the conversion fails because the defect is already converted")]
fn conversion_already_converted(world: &DefectConversionWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_conversion
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing conversion result"))?;
    match result {
        Err(err) if err.kind() == ErrorKind::AlreadyConverted => Ok(()),
        other => Err(eyre::eyre!(
            "expected an already-converted failure, got {other:?}"
        )),
    }
}

#[then("exactly {count:usize} task exists")]
fn task_count(world: &DefectConversionWorld, count: usize) -> Result<(), eyre::Report> {
    let tasks = run_async(world.tasks.list_tasks())?;
    eyre::ensure!(
        tasks.len() == count,
        "expected {count} tasks, found {}",
        tasks.len()
    );
    Ok(())
}

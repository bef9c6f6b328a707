//! When steps for defect conversion BDD scenarios.

use super::world::{DefectConversionWorld, ENGINEER, REPORTER, run_async};
use defectflow::conversion::services::ConvertDefectRequest;
use defectflow::task::services::UpdateTaskStatusRequest;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the defect is converted and assigned to the engineer")]
fn convert_defect(world: &mut DefectConversionWorld) -> Result<(), eyre::Report> {
    let defect_id = world.reported()?.id();
    let result = run_async(
        world
            .conversions
            .convert(ConvertDefectRequest::new(defect_id, ENGINEER, REPORTER)),
    );
    if let Ok(ref outcome) = result {
        world.converted_task = Some(outcome.task.clone());
    }
    world.last_conversion = Some(result);
    Ok(())
}

#[when(r#"the task status is changed to "{status}""#)]
fn change_task_status(
    world: &mut DefectConversionWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let task_id = world
        .converted_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing converted task in scenario world"))?
        .id();
    let update = run_async(
        world
            .tasks
            .update_status(UpdateTaskStatusRequest::new(task_id, status, ENGINEER)),
    )
    .wrap_err("change task status")?;
    world.converted_task = Some(update.task);
    Ok(())
}

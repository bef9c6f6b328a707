//! Given steps for defect conversion BDD scenarios.

use super::world::{DefectConversionWorld, ENGINEER, PROJECT, REPORTER, run_async};
use defectflow::conversion::services::ConvertDefectRequest;
use defectflow::defect::services::CreateDefectRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a reported defect "{title}" described as "{description}""#)]
fn reported_defect(
    world: &mut DefectConversionWorld,
    title: String,
    description: String,
) -> Result<(), eyre::Report> {
    let defect = run_async(world.defects.create_defect(CreateDefectRequest::new(
        title,
        description,
        PROJECT,
        REPORTER,
    )))
    .wrap_err("report defect for conversion scenario")?;
    world.reported = Some(defect);
    Ok(())
}

#[given("the defect has been converted and assigned to the engineer")]
fn defect_has_been_converted(world: &mut DefectConversionWorld) -> Result<(), eyre::Report> {
    let defect_id = world.reported()?.id();
    let outcome = run_async(
        world
            .conversions
            .convert(ConvertDefectRequest::new(defect_id, ENGINEER, REPORTER)),
    )
    .wrap_err("convert defect in scenario setup")?;
    world.converted_task = Some(outcome.task);
    Ok(())
}

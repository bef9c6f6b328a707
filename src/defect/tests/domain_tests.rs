//! Defect aggregate tests.

use crate::defect::domain::{Defect, DefectDomainError, DefectDraft, DefectStatus};
use crate::directory::domain::{ProjectId, UserId};
use crate::task::domain::TaskId;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn defect(clock: DefaultClock) -> Result<Defect, DefectDomainError> {
    let draft = DefectDraft::new(
        "  Crack in load-bearing wall ",
        "Found on floor 3",
        ProjectId::new(10),
        UserId::new(1),
    )?;
    Ok(Defect::new(draft, &clock))
}

#[rstest]
#[case("", "description", DefectDomainError::EmptyTitle)]
#[case("   ", "description", DefectDomainError::EmptyTitle)]
#[case("title", " \n", DefectDomainError::EmptyDescription)]
fn draft_rejects_blank_fields(
    #[case] title: &str,
    #[case] description: &str,
    #[case] expected: DefectDomainError,
) {
    let result = DefectDraft::new(title, description, ProjectId::new(1), UserId::new(1));
    assert_eq!(result, Err(expected));
}

#[rstest]
fn new_defect_is_trimmed_unconverted_and_new(
    defect: Result<Defect, DefectDomainError>,
) -> Result<(), DefectDomainError> {
    let created = defect?;

    assert_eq!(created.title(), "Crack in load-bearing wall");
    assert_eq!(created.status(), DefectStatus::New);
    assert!(!created.is_converted());
    assert_eq!(created.converted_to_task_id(), None);
    assert_eq!(created.created_at(), created.updated_at());
    Ok(())
}

#[rstest]
fn mark_converted_links_task_and_starts_work(
    defect: Result<Defect, DefectDomainError>,
    clock: DefaultClock,
) -> Result<(), DefectDomainError> {
    let mut converted = defect?;
    let task_id = TaskId::new();

    converted.mark_converted(task_id, &clock)?;

    assert_eq!(converted.status(), DefectStatus::InProgress);
    assert_eq!(converted.converted_to_task_id(), Some(task_id));
    assert!(converted.is_converted());
    Ok(())
}

#[rstest]
fn mark_converted_twice_keeps_first_link(
    defect: Result<Defect, DefectDomainError>,
    clock: DefaultClock,
) -> Result<(), DefectDomainError> {
    let mut converted = defect?;
    let first = TaskId::new();
    converted.mark_converted(first, &clock)?;

    let result = converted.mark_converted(TaskId::new(), &clock);

    assert_eq!(
        result,
        Err(DefectDomainError::AlreadyConverted {
            defect_id: converted.id(),
            task_id: first,
        })
    );
    assert_eq!(converted.converted_to_task_id(), Some(first));
    Ok(())
}

#[rstest]
fn mark_converted_keeps_in_progress_status(
    defect: Result<Defect, DefectDomainError>,
    clock: DefaultClock,
) -> Result<(), DefectDomainError> {
    let mut converted = defect?;
    converted.transition_to(DefectStatus::InProgress, &clock)?;

    converted.mark_converted(TaskId::new(), &clock)?;

    assert_eq!(converted.status(), DefectStatus::InProgress);
    Ok(())
}

#[rstest]
fn closed_defect_cannot_be_converted(
    defect: Result<Defect, DefectDomainError>,
    clock: DefaultClock,
) -> Result<(), DefectDomainError> {
    let mut closed = defect?;
    closed.transition_to(DefectStatus::InProgress, &clock)?;
    closed.transition_to(DefectStatus::UnderReview, &clock)?;
    closed.transition_to(DefectStatus::Closed, &clock)?;

    let result = closed.mark_converted(TaskId::new(), &clock);

    assert!(matches!(
        result,
        Err(DefectDomainError::InvalidStateTransition {
            from: DefectStatus::Closed,
            to: DefectStatus::InProgress,
            ..
        })
    ));
    assert!(!closed.is_converted());
    Ok(())
}

#[rstest]
fn rejected_transition_leaves_defect_unchanged(
    defect: Result<Defect, DefectDomainError>,
    clock: DefaultClock,
) -> Result<(), DefectDomainError> {
    let mut unchanged = defect?;
    let before = unchanged.clone();

    let result = unchanged.transition_to(DefectStatus::Closed, &clock);

    assert!(result.is_err());
    assert_eq!(unchanged, before);
    Ok(())
}

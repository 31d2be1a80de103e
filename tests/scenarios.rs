//! End-to-end generation scenarios.

use std::sync::Arc;

use u_timetable::availability::{SharedResources, SnapshotEntry};
use u_timetable::models::weekday::{FRIDAY, MONDAY, SATURDAY, THURSDAY, TUESDAY, WEDNESDAY};
use u_timetable::models::{
    GenerateTimetableRequest, GenerationInput, SchedulingPreferences, SlotPosition,
    SubjectRequirement, WorkingCalendar,
};
use u_timetable::report::DiagnosticKind;
use u_timetable::scheduler::SubjectStatus;
use u_timetable::validation::ValidationErrorKind;
use u_timetable::{EngineError, TimetableEngine};

fn engine() -> TimetableEngine {
    TimetableEngine::new(Arc::new(SharedResources::new()))
}

fn request() -> GenerateTimetableRequest {
    GenerateTimetableRequest::new("grade-7-a", "2025-26")
}

#[test]
fn test_daily_cap_spreads_over_distinct_days() {
    let input = GenerationInput::new(WorkingCalendar::six_day_week(8).unwrap())
        .with_subject(SubjectRequirement::new("math", 5).with_max_per_day(1));

    let report = engine().generate(&request(), &input).unwrap();

    assert!(report.result.success);
    assert_eq!(report.result.slots_created, 5);
    assert!(report.result.warnings.is_empty());
    assert!(report.result.errors.is_empty());
    assert_eq!(report.grid.days_used_by("math"), 5);
}

#[test]
fn test_contested_fixed_slot() {
    let pinned = SchedulingPreferences::new().with_fixed_slot(MONDAY, 1);
    let input = GenerationInput::new(WorkingCalendar::six_day_week(8).unwrap())
        .with_subject(
            SubjectRequirement::new("math", 1)
                .with_name("Mathematics")
                .with_preferences(pinned.clone()),
        )
        .with_subject(
            SubjectRequirement::new("phy", 1)
                .with_name("Physics")
                .with_preferences(pinned),
        );

    let report = engine().generate(&request(), &input).unwrap();

    assert!(!report.result.success);
    assert!(report.grid.holds(MONDAY, 1, "math"));
    assert_eq!(report.result.errors.len(), 1);
    assert!(report.result.errors[0].contains("Physics"));
    assert!(report.result.errors[0].contains("Monday slot 1"));
    assert_eq!(
        report.diagnostics_of(DiagnosticKind::ConstraintConflict).count(),
        1
    );
    assert_eq!(report.outcome("phy").unwrap().status, SubjectStatus::Failed);
}

#[test]
fn test_single_preferred_day_yields_partial() {
    let input = GenerationInput::new(WorkingCalendar::six_day_week(8).unwrap()).with_subject(
        SubjectRequirement::new("pe", 10)
            .with_min_per_week(6)
            .with_preferences(
                SchedulingPreferences::new()
                    .with_preferred_days([WEDNESDAY])
                    .with_avoid_days([MONDAY, TUESDAY, THURSDAY, FRIDAY, SATURDAY]),
            ),
    );

    let report = engine().generate(&request(), &input).unwrap();

    assert!(!report.result.success);
    assert_eq!(report.result.slots_created, 8);
    assert_eq!(report.result.warnings.len(), 1);
    assert!(report.result.errors.is_empty());
    assert_eq!(report.outcome("pe").unwrap().status, SubjectStatus::Partial);
    assert_eq!(report.grid.count_for_subject_on_day("pe", WEDNESDAY), 8);
}

#[test]
fn test_consecutive_periods_stay_together() {
    let input = GenerationInput::new(WorkingCalendar::six_day_week(8).unwrap()).with_subject(
        SubjectRequirement::new("chem-lab", 2)
            .with_special_room("lab")
            .with_preferences(SchedulingPreferences::new().with_consecutive(true)),
    );

    let report = engine().generate(&request(), &input).unwrap();

    assert!(report.result.success);
    let days: Vec<_> = report
        .grid
        .calendar()
        .days()
        .iter()
        .filter(|&&d| report.grid.count_for_subject_on_day("chem-lab", d) > 0)
        .collect();
    assert_eq!(days.len(), 1);
    let slots = report.grid.subject_slots_on_day("chem-lab", *days[0]);
    assert_eq!(slots[1] - slots[0], 1);
}

#[test]
fn test_over_capacity_subject_fails_without_placing() {
    let input = GenerationInput::new(WorkingCalendar::weekdays(2).unwrap())
        .with_subject(SubjectRequirement::new("math", 11).with_min_per_week(1))
        .with_subject(SubjectRequirement::new("art", 2));

    let report = engine().generate(&request(), &input).unwrap();

    let math = report.outcome("math").unwrap();
    assert_eq!(math.status, SubjectStatus::Failed);
    assert_eq!(math.placed, 0);
    assert_eq!(report.outcome("art").unwrap().status, SubjectStatus::Placed);
    assert_eq!(report.result.slots_created, 2);
    assert_eq!(report.result.errors.len(), 1);
}

#[test]
fn test_invalid_request_is_rejected_whole() {
    let input = GenerationInput::new(WorkingCalendar::weekdays(6).unwrap())
        .with_subject(
            SubjectRequirement::new("math", 3)
                .with_preferences(SchedulingPreferences::new().with_fixed_slot(SATURDAY, 1)),
        )
        .with_subject(SubjectRequirement::new("art", 2).with_min_per_week(3));

    let err = engine().generate(&request(), &input).unwrap_err();
    let EngineError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::OutOfRange));
    assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::Inconsistent));
}

#[test]
fn test_runs_are_deterministic() {
    let input = GenerationInput::new(WorkingCalendar::six_day_week(7).unwrap())
        .with_subject(
            SubjectRequirement::new("eng", 6)
                .with_teacher("T-eng")
                .with_preferences(SchedulingPreferences::new().with_spread_evenly(true)),
        )
        .with_subject(
            SubjectRequirement::new("math", 6)
                .with_teacher("T-math")
                .with_max_per_day(2)
                .with_preferences(
                    SchedulingPreferences::new()
                        .with_preferred_slot(SlotPosition::Morning)
                        .with_priority(8),
                ),
        )
        .with_subject(
            SubjectRequirement::new("pe", 2)
                .with_preferences(SchedulingPreferences::new().with_avoid_slot(SlotPosition::First)),
        );

    let first = engine().generate(&request(), &input).unwrap();
    let second = engine().generate(&request(), &input).unwrap();

    assert_eq!(first.grid, second.grid);
    assert_eq!(first.result, second.result);
}

#[test]
fn test_seeded_snapshot_blocks_teacher() {
    let shared = Arc::new(SharedResources::new());
    let conflicts = shared.seed(&[SnapshotEntry {
        section_id: "grade-7-b".into(),
        subject_id: "math".into(),
        day: MONDAY,
        slot: 1,
        teacher_id: Some("T1".into()),
        room_type: None,
    }]);
    assert!(conflicts.is_empty());

    let input = GenerationInput::new(WorkingCalendar::weekdays(6).unwrap()).with_subject(
        SubjectRequirement::new("math", 1)
            .with_teacher("T1")
            .with_preferences(SchedulingPreferences::new().with_fixed_slot(MONDAY, 1)),
    );
    let report = TimetableEngine::new(shared)
        .generate(&request(), &input)
        .unwrap();

    assert_eq!(report.result.errors.len(), 1);
    assert!(report.result.errors[0].contains("teacher T1"));
    assert_eq!(report.result.slots_created, 0);
}

#[test]
fn test_result_serializes_for_host() {
    let input = GenerationInput::new(WorkingCalendar::weekdays(6).unwrap())
        .with_subject(SubjectRequirement::new("math", 2));
    let report = engine().generate(&request(), &input).unwrap();

    let json = serde_json::to_value(&report.result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "success": true,
            "slotsCreated": 2,
            "warnings": [],
            "errors": []
        })
    );
}

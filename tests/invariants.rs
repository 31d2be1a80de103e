//! Randomized invariant checks over generated timetables.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use u_timetable::availability::SharedResources;
use u_timetable::models::{
    GenerateTimetableRequest, GenerationInput, SchedulingPreferences, SubjectRequirement,
    WorkingCalendar,
};
use u_timetable::report::DiagnosticKind;
use u_timetable::scheduler::{EngineConfig, SubjectStatus};
use u_timetable::validation::normalize_all;
use u_timetable::verify::{check_section, check_sections};
use u_timetable::{GenerationReport, TimetableEngine};

const TEACHERS: [&str; 4] = ["T1", "T2", "T3", "T4"];

fn random_calendar(rng: &mut SmallRng) -> WorkingCalendar {
    let days = rng.random_range(3..=6u8);
    let slots = rng.random_range(4..=8u8);
    WorkingCalendar::new(1..=days, slots).unwrap()
}

fn random_subject(rng: &mut SmallRng, id: usize, calendar: &WorkingCalendar) -> SubjectRequirement {
    let periods = rng.random_range(1..=6u32);
    let mut subject = SubjectRequirement::new(format!("s{id}"), periods)
        .with_teacher(TEACHERS[rng.random_range(0..TEACHERS.len())])
        .with_min_per_week(rng.random_range(1..=periods));
    if rng.random_bool(0.5) {
        subject = subject.with_max_per_day(rng.random_range(1..=3));
    }
    if rng.random_bool(0.2) {
        subject = subject.with_special_room("lab");
    }

    let days = calendar.days();
    let mut prefs = SchedulingPreferences::new()
        .with_priority(rng.random_range(1..=10))
        .with_consecutive(rng.random_bool(0.3))
        .with_spread_evenly(rng.random_bool(0.3));
    if rng.random_bool(0.3) {
        prefs = prefs.with_preferred_days([days[rng.random_range(0..days.len())]]);
    }
    if rng.random_bool(0.3) {
        prefs = prefs.with_avoid_days([days[rng.random_range(0..days.len())]]);
    }
    if rng.random_bool(0.2) {
        prefs = prefs.with_avoid_slot(rng.random_range(1..=calendar.slots_per_day()));
    }
    if rng.random_bool(0.2) {
        prefs = prefs.with_min_gap(2);
    }
    if rng.random_bool(0.25) {
        prefs = prefs.with_fixed_slot(
            days[rng.random_range(0..days.len())],
            rng.random_range(1..=calendar.slots_per_day()),
        );
    }
    subject.with_preferences(prefs)
}

fn random_input(rng: &mut SmallRng, calendar: &WorkingCalendar) -> GenerationInput {
    let count = rng.random_range(3..=8);
    (0..count).fold(GenerationInput::new(calendar.clone()), |input, id| {
        input.with_subject(random_subject(rng, id, calendar))
    })
}

fn assert_section_ok(input: &GenerationInput, report: &GenerationReport) {
    let reqs = normalize_all(&input.subjects, &input.calendar).unwrap();
    let violations = check_section(&report.grid, &reqs, &report.outcomes);
    assert!(violations.is_empty(), "{violations:?}");

    let mut expected_errors = 0;
    for (req, outcome) in reqs.iter().zip(&report.outcomes) {
        assert_eq!(outcome.placed as usize, report.grid.count_for_subject(&req.subject_id));
        match outcome.status {
            SubjectStatus::Placed => {
                assert_eq!(outcome.placed, req.periods_per_week);
                assert!(outcome.fixed_conflicts.is_empty());
            }
            SubjectStatus::Partial => assert!(outcome.placed >= req.min_periods_per_week),
            SubjectStatus::Failed => assert!(outcome.placed < req.min_periods_per_week),
            other => panic!("non-terminal status {other:?}"),
        }
        expected_errors += outcome.errors.len();
    }
    assert_eq!(report.result.errors.len(), expected_errors);
    assert_eq!(
        report.result.success,
        report.outcomes.iter().all(|o| o.status == SubjectStatus::Placed)
    );
    assert_eq!(
        report.result.slots_created as usize,
        report.grid.placed_count()
    );
    assert_eq!(
        report.diagnostics_of(DiagnosticKind::PartialPlacement).count(),
        report
            .outcomes
            .iter()
            .filter(|o| o.status == SubjectStatus::Partial)
            .count()
    );
}

fn run_seed(seed: u64, config: EngineConfig) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let calendar = random_calendar(&mut rng);
    let sections = rng.random_range(1..=3);
    let inputs: Vec<(GenerateTimetableRequest, GenerationInput)> = (0..sections)
        .map(|i| {
            (
                GenerateTimetableRequest::new(format!("sec{i}"), "2025-26"),
                random_input(&mut rng, &calendar),
            )
        })
        .collect();

    let shared = Arc::new(SharedResources::new());
    let engine = TimetableEngine::new(Arc::clone(&shared)).with_config(config.clone());
    let reports: Vec<GenerationReport> = inputs
        .iter()
        .map(|(request, input)| engine.generate(request, input).unwrap())
        .collect();

    for ((_, input), report) in inputs.iter().zip(&reports) {
        assert_section_ok(input, report);
    }
    let grids: Vec<(&str, &_)> = reports
        .iter()
        .map(|r| (r.request.section_id.as_str(), &r.grid))
        .collect();
    let violations = check_sections(&grids, &shared);
    assert!(violations.is_empty(), "seed {seed}: {violations:?}");

    // Same inputs on fresh shared state give the same timetables.
    let replay = TimetableEngine::new(Arc::new(SharedResources::new())).with_config(config);
    for ((request, input), report) in inputs.iter().zip(&reports) {
        let again = replay.generate(request, input).unwrap();
        assert_eq!(again.grid, report.grid, "seed {seed}");
        assert_eq!(again.result, report.result, "seed {seed}");
    }
}

#[test]
fn test_random_inputs_keep_invariants() {
    for seed in 0..200 {
        run_seed(seed, EngineConfig::default());
    }
}

#[test]
fn test_random_inputs_keep_invariants_relaxed() {
    let config = EngineConfig::default()
        .with_relax_min_gap(true)
        .with_relax_avoidance_beyond_minimum(true)
        .with_backtrack_depth(5);
    for seed in 1000..1100 {
        run_seed(seed, config.clone());
    }
}

#[test]
fn test_random_inputs_without_backtracking() {
    for seed in 2000..2100 {
        run_seed(seed, EngineConfig::default().with_backtrack_depth(0));
    }
}

//! Post-run invariant checks.
//!
//! Re-derives the hard guarantees of a run from its output alone, so a
//! host (or a test) can audit any timetable without trusting the solver:
//!
//! - No teacher in one `(day, slot)` for two sections
//! - No room type above its capacity in one `(day, slot)`
//! - Every PLACED subject holds all of its fixed slots
//! - Per subject, periods on one day ≤ `maxPeriodsPerDay`
//! - Per subject, periods in the week ≤ `periodsPerWeek`
//! - Section grids agree with the shared teacher and room bookings

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::availability::{Booking, SharedResources};
use crate::models::{CellRef, Grid};
use crate::scheduler::{SubjectOutcome, SubjectStatus};
use crate::validation::NormalizedRequirement;

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantViolation {
    pub kind: InvariantKind,
    /// Teacher, room type or subject the violation is about.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvariantKind {
    /// A teacher holds one cell in two sections.
    TeacherDoubleBooked,
    /// A room type is booked beyond capacity.
    RoomOverbooked,
    /// A PLACED subject is missing a fixed slot.
    FixedSlotMissing,
    /// A subject exceeds its daily cap.
    DailyCapExceeded,
    /// A subject exceeds its weekly target.
    WeeklyTargetExceeded,
    /// A grid cell has no matching shared booking.
    BookingMismatch,
}

impl InvariantViolation {
    fn new(kind: InvariantKind, entity_id: impl Into<String>, message: String) -> Self {
        let severity = match kind {
            InvariantKind::TeacherDoubleBooked | InvariantKind::RoomOverbooked => 100,
            InvariantKind::FixedSlotMissing => 90,
            InvariantKind::DailyCapExceeded | InvariantKind::WeeklyTargetExceeded => 80,
            InvariantKind::BookingMismatch => 60,
        };
        Self {
            kind,
            entity_id: entity_id.into(),
            message,
            severity,
        }
    }
}

/// Checks the per-section invariants of one grid.
pub fn check_section(
    grid: &Grid,
    reqs: &[NormalizedRequirement],
    outcomes: &[SubjectOutcome],
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for req in reqs {
        let id = &req.subject_id;

        let total = grid.count_for_subject(id) as u32;
        if total > req.periods_per_week {
            violations.push(InvariantViolation::new(
                InvariantKind::WeeklyTargetExceeded,
                id,
                format!("{id}: {total} periods placed, target {}", req.periods_per_week),
            ));
        }

        for &day in grid.calendar().days() {
            let count = grid.count_for_subject_on_day(id, day) as u32;
            if count > req.max_periods_per_day {
                violations.push(InvariantViolation::new(
                    InvariantKind::DailyCapExceeded,
                    id,
                    format!(
                        "{id}: {count} periods on {}, cap {}",
                        crate::models::weekday::name(day),
                        req.max_periods_per_day
                    ),
                ));
            }
        }

        let placed = outcomes
            .iter()
            .any(|o| &o.subject_id == id && o.status == SubjectStatus::Placed);
        if placed {
            for cell in &req.preferences.fixed_slots {
                if !grid.holds(cell.day, cell.slot, id) {
                    violations.push(InvariantViolation::new(
                        InvariantKind::FixedSlotMissing,
                        id,
                        format!("{id}: PLACED without fixed slot {cell}"),
                    ));
                }
            }
        }
    }

    violations
}

/// Checks the cross-section invariants of several grids.
///
/// `sections` pairs each section id with its grid.
pub fn check_sections(
    sections: &[(&str, &Grid)],
    shared: &SharedResources,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut teachers: HashMap<(&str, CellRef), &str> = HashMap::new();
    let mut rooms: HashMap<(&str, CellRef), u32> = HashMap::new();

    for &(section_id, grid) in sections {
        for entry in grid.entries() {
            let cell_ref = CellRef::new(entry.day, entry.slot);
            let booking = Booking::new(section_id, entry.cell.subject_id.as_str());

            if let Some(teacher) = entry.cell.teacher_id.as_deref() {
                if let Some(other) = teachers.insert((teacher, cell_ref), section_id) {
                    violations.push(InvariantViolation::new(
                        InvariantKind::TeacherDoubleBooked,
                        teacher,
                        format!("teacher {teacher} in sections {other} and {section_id} on {cell_ref}"),
                    ));
                }
                if shared.teacher_booking(teacher, cell_ref).as_ref() != Some(&booking) {
                    violations.push(InvariantViolation::new(
                        InvariantKind::BookingMismatch,
                        teacher,
                        format!("{booking} on {cell_ref} has no teacher booking for {teacher}"),
                    ));
                }
            }

            if let Some(room) = entry.cell.room_type.as_deref() {
                *rooms.entry((room, cell_ref)).or_insert(0) += 1;
                if !shared.room_bookings(room, cell_ref).contains(&booking) {
                    violations.push(InvariantViolation::new(
                        InvariantKind::BookingMismatch,
                        room,
                        format!("{booking} on {cell_ref} has no {room} room booking"),
                    ));
                }
            }
        }
    }

    let mut overbooked: Vec<_> = rooms
        .into_iter()
        .filter(|&((room, _), load)| load > shared.room_capacity(room))
        .collect();
    overbooked.sort();
    for ((room, cell_ref), load) in overbooked {
        violations.push(InvariantViolation::new(
            InvariantKind::RoomOverbooked,
            room,
            format!(
                "{load} {room} bookings on {cell_ref}, capacity {}",
                shared.room_capacity(room)
            ),
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::availability::AvailabilityTracker;
    use crate::models::{Cell, SchedulingPreferences, SubjectRequirement, WorkingCalendar};
    use crate::validation::normalize_all;

    #[test]
    fn test_clean_grids_pass() {
        let cal = WorkingCalendar::weekdays(4).unwrap();
        let shared = Arc::new(SharedResources::new().with_room_capacity("lab", 2));
        let mut a = AvailabilityTracker::new("7A", cal.clone(), Arc::clone(&shared));
        let mut b = AvailabilityTracker::new("7B", cal, Arc::clone(&shared));
        a.reserve(1, 1, "chem", Some("T1"), Some("lab")).unwrap();
        b.reserve(1, 1, "bio", Some("T2"), Some("lab")).unwrap();
        b.reserve(1, 2, "chem", Some("T1"), None).unwrap();

        let violations = check_sections(&[("7A", a.grid()), ("7B", b.grid())], &shared);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_detects_double_booking() {
        let cal = WorkingCalendar::weekdays(4).unwrap();
        let shared = SharedResources::new();
        let mut a = Grid::new(cal.clone());
        let mut b = Grid::new(cal);
        a.set(1, 1, Cell::new("math", Some("T1".into()), Some("lab".into())));
        b.set(1, 1, Cell::new("math", Some("T1".into()), Some("lab".into())));

        let violations = check_sections(&[("7A", &a), ("7B", &b)], &shared);
        let kinds: Vec<InvariantKind> = violations.iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&InvariantKind::TeacherDoubleBooked));
        assert!(kinds.contains(&InvariantKind::RoomOverbooked));
        assert!(kinds.contains(&InvariantKind::BookingMismatch));
    }

    #[test]
    fn test_section_invariants() {
        let cal = WorkingCalendar::weekdays(4).unwrap();
        let reqs = normalize_all(
            &[SubjectRequirement::new("math", 2)
                .with_max_per_day(1)
                .with_preferences(SchedulingPreferences::new().with_fixed_slot(2, 1))],
            &cal,
        )
        .unwrap();
        let mut grid = Grid::new(cal);
        grid.set(1, 1, Cell::new("math", None, None));
        grid.set(1, 2, Cell::new("math", None, None));
        grid.set(1, 3, Cell::new("math", None, None));

        let mut outcome = SubjectOutcome::new(&reqs[0]);
        outcome.status = SubjectStatus::Placed;

        let violations = check_section(&grid, &reqs, &[outcome]);
        let kinds: Vec<InvariantKind> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InvariantKind::WeeklyTargetExceeded,
                InvariantKind::DailyCapExceeded,
                InvariantKind::FixedSlotMissing,
            ]
        );
    }
}

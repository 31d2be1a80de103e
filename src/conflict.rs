//! Conflict classification and remedies.
//!
//! When a reservation is refused the resolver names the contended
//! dimension, decides what the scheduler does next, and renders the
//! reason for diagnostics. It also decides the final status of a subject
//! from its placement counts.
//!
//! # Remedies
//!
//! | Situation | Remedy |
//! |-----------|--------|
//! | Clash on a scored candidate | [`Remedy::NextCandidate`] |
//! | Clash on a fixed slot | [`Remedy::HardError`] |
//! | Week exhausted below the floor | [`Remedy::Backtrack`] |
//! | Week exhausted after backtracking | [`Remedy::Downgrade`] |

use serde::{Deserialize, Serialize};

use crate::availability::{AvailabilityTracker, ReserveError};
use crate::models::{CellRef, Slot};
use crate::scheduler::SubjectStatus;
use crate::validation::NormalizedRequirement;

/// Contended dimension of a refused reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// The section already has a period there.
    SectionSlotTaken,
    /// The teacher is booked elsewhere.
    TeacherClash,
    /// The room type is at capacity.
    RoomClash,
    /// The cell is not in the calendar.
    OutsideCalendar,
}

/// What to do about a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Remedy {
    /// Try the next best cell.
    NextCandidate,
    /// Record a constraint conflict; never relocate.
    HardError,
    /// Displace recent placements and retry once.
    Backtrack,
    /// Accept the shortfall as PARTIAL or FAILED.
    Downgrade,
}

/// Classifies conflicts and decides remedies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver {
    backtrack_depth: usize,
}

impl ConflictResolver {
    /// Creates a resolver allowing up to `backtrack_depth` displaced placements.
    pub fn new(backtrack_depth: usize) -> Self {
        Self { backtrack_depth }
    }

    pub fn classify(&self, err: &ReserveError) -> ConflictKind {
        match err {
            ReserveError::OutsideCalendar { .. } => ConflictKind::OutsideCalendar,
            ReserveError::SectionSlotTaken { .. } => ConflictKind::SectionSlotTaken,
            ReserveError::TeacherClash { .. } => ConflictKind::TeacherClash,
            ReserveError::RoomClash { .. } => ConflictKind::RoomClash,
        }
    }

    /// Remedy for a refused reservation.
    pub fn on_clash(&self, _err: &ReserveError, is_fixed: bool) -> Remedy {
        if is_fixed {
            Remedy::HardError
        } else {
            Remedy::NextCandidate
        }
    }

    /// Remedy once no admissible cell is left.
    ///
    /// Returns `None` when the floor is met and nothing needs doing.
    pub fn on_exhausted(&self, placed: u32, minimum: u32, backtracked: bool) -> Option<Remedy> {
        if placed >= minimum {
            None
        } else if backtracked || self.backtrack_depth == 0 {
            Some(Remedy::Downgrade)
        } else {
            Some(Remedy::Backtrack)
        }
    }

    /// Final status from placement counts.
    ///
    /// PLACED needs every period and every fixed slot; PARTIAL needs the
    /// floor; anything less is FAILED.
    pub fn outcome_status(
        &self,
        placed: u32,
        minimum: u32,
        periods: u32,
        fixed_conflicts: usize,
    ) -> SubjectStatus {
        if placed >= periods && fixed_conflicts == 0 {
            SubjectStatus::Placed
        } else if placed >= minimum {
            SubjectStatus::Partial
        } else {
            SubjectStatus::Failed
        }
    }

    /// Human-readable reason for a refused reservation.
    pub fn describe(&self, err: &ReserveError) -> String {
        match err {
            ReserveError::OutsideCalendar { cell } => format!("{cell} is not a working period"),
            ReserveError::SectionSlotTaken { occupant, .. } => {
                format!("the section already has {occupant} there")
            }
            ReserveError::TeacherClash {
                teacher_id,
                occupant,
                ..
            } => format!("teacher {teacher_id} already teaches {occupant}"),
            ReserveError::RoomClash {
                room_type,
                capacity,
                ..
            } => format!("all {capacity} {room_type} room(s) are in use"),
        }
    }

    /// Explains why a subject could not reach its target.
    ///
    /// Scans the week and counts which dimension blocks each remaining
    /// cell, naming one example occupant per dimension.
    pub fn explain_shortfall(
        &self,
        req: &NormalizedRequirement,
        tracker: &AvailabilityTracker,
    ) -> String {
        let grid = tracker.grid();
        let shared = tracker.shared();
        let mut blocked = Blocked::default();

        for (day, slot) in tracker.calendar().cells() {
            let cell = CellRef::new(day, slot);
            if let Some(occupant) = grid.get(day, slot) {
                if occupant.subject_id != req.subject_id {
                    blocked.section.hit(cell, &occupant.subject_id);
                }
                continue;
            }
            if let Some(teacher) = req.teacher_id.as_deref() {
                if let Some(booking) = shared.teacher_booking(teacher, cell) {
                    blocked.teacher.hit(cell, &format!("teacher {teacher} with {booking}"));
                    continue;
                }
            }
            if let Some(room) = req.room_type.as_deref() {
                if !shared.is_free(cell, None, Some(room)) {
                    blocked.room.hit(cell, &format!("{room} room"));
                    continue;
                }
            }
            if grid.count_for_subject_on_day(&req.subject_id, day) as u32
                >= req.max_periods_per_day
            {
                blocked.day_cap += 1;
                continue;
            }
            let same_day = grid.subject_slots_on_day(&req.subject_id, day);
            if req.preferences.is_avoided(day, slot) {
                blocked.avoided += 1;
            } else if gap_blocked(req, &same_day, slot) {
                blocked.gap += 1;
            }
        }

        blocked.render(req.max_periods_per_day)
    }
}

fn gap_blocked(req: &NormalizedRequirement, same_day: &[Slot], slot: Slot) -> bool {
    same_day.iter().any(|&s| !req.preferences.gap_ok(s, slot))
}

#[derive(Debug, Default)]
struct BlockCount {
    count: usize,
    example: Option<String>,
}

impl BlockCount {
    fn hit(&mut self, cell: CellRef, occupant: &str) {
        self.count += 1;
        if self.example.is_none() {
            self.example = Some(format!("{occupant} on {cell}"));
        }
    }
}

#[derive(Debug, Default)]
struct Blocked {
    section: BlockCount,
    teacher: BlockCount,
    room: BlockCount,
    day_cap: usize,
    avoided: usize,
    gap: usize,
}

impl Blocked {
    fn render(&self, max_per_day: u32) -> String {
        let mut parts = Vec::new();
        for (what, block) in [
            ("taken in the section", &self.section),
            ("blocked by the teacher", &self.teacher),
            ("blocked by room capacity", &self.room),
        ] {
            if block.count > 0 {
                let example = block.example.as_deref().unwrap_or_default();
                parts.push(format!("{} period(s) {what} (e.g. {example})", block.count));
            }
        }
        if self.day_cap > 0 {
            parts.push(format!(
                "{} period(s) over the daily cap of {max_per_day}",
                self.day_cap
            ));
        }
        if self.avoided > 0 {
            parts.push(format!("{} avoided period(s) left unused", self.avoided));
        }
        if self.gap > 0 {
            parts.push(format!("{} period(s) too close to the same-day gap", self.gap));
        }
        if parts.is_empty() {
            "no free period left in the week".to_string()
        } else {
            parts.join("; ")
        }
    }
}

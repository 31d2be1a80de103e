//! Per-run availability tracker.

use std::sync::Arc;

use tracing::trace;

use super::{Booking, ReserveError, SharedResources};
use crate::models::{Cell, CellRef, Day, Grid, Slot, WorkingCalendar};

/// Token for one reserved period; enough to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub cell: CellRef,
    pub subject_id: String,
    pub teacher_id: Option<String>,
    pub room_type: Option<String>,
}

/// Occupancy of one section's grid plus the shared teacher/room grids.
///
/// The section grid is owned by the run and needs no synchronization;
/// teacher and room lookups go through [`SharedResources`].
#[derive(Debug)]
pub struct AvailabilityTracker {
    section_id: String,
    grid: Grid,
    shared: Arc<SharedResources>,
}

impl AvailabilityTracker {
    /// Creates a tracker with an empty section grid.
    pub fn new(
        section_id: impl Into<String>,
        calendar: WorkingCalendar,
        shared: Arc<SharedResources>,
    ) -> Self {
        Self {
            section_id: section_id.into(),
            grid: Grid::new(calendar),
            shared,
        }
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn calendar(&self) -> &WorkingCalendar {
        self.grid.calendar()
    }

    pub fn shared(&self) -> &SharedResources {
        &self.shared
    }

    /// Whether the section cell is empty and the teacher and room type are free.
    pub fn is_free(
        &self,
        day: Day,
        slot: Slot,
        teacher_id: Option<&str>,
        room_type: Option<&str>,
    ) -> bool {
        self.grid.is_empty_at(day, slot)
            && self
                .shared
                .is_free(CellRef::new(day, slot), teacher_id, room_type)
    }

    /// Reserves a cell for a subject, all or nothing.
    ///
    /// # Errors
    /// The first conflicting dimension, checked section → teacher → room.
    pub fn reserve(
        &mut self,
        day: Day,
        slot: Slot,
        subject_id: &str,
        teacher_id: Option<&str>,
        room_type: Option<&str>,
    ) -> Result<Reservation, ReserveError> {
        let cell = CellRef::new(day, slot);
        if !self.grid.calendar().contains(day, slot) {
            return Err(ReserveError::OutsideCalendar { cell });
        }
        if let Some(occupant) = self.grid.get(day, slot) {
            return Err(ReserveError::SectionSlotTaken {
                cell,
                occupant: occupant.subject_id.clone(),
            });
        }

        self.shared.book(
            &Booking::new(&self.section_id, subject_id),
            cell,
            teacher_id,
            room_type,
        )?;

        let teacher_id = teacher_id.map(str::to_string);
        let room_type = room_type.map(str::to_string);
        self.grid.set(
            day,
            slot,
            Cell::new(subject_id, teacher_id.clone(), room_type.clone()),
        );
        trace!(section_id = %self.section_id, subject_id, day, slot, "Reserved cell");

        Ok(Reservation {
            cell,
            subject_id: subject_id.to_string(),
            teacher_id,
            room_type,
        })
    }

    /// Undoes the reservation at a cell, returning it.
    pub fn release(&mut self, day: Day, slot: Slot) -> Option<Reservation> {
        let bound = self.grid.clear(day, slot)?;
        let cell = CellRef::new(day, slot);
        self.shared.unbook(
            &self.section_id,
            cell,
            bound.teacher_id.as_deref(),
            bound.room_type.as_deref(),
        );
        trace!(section_id = %self.section_id, subject_id = %bound.subject_id, day, slot, "Released cell");

        Some(Reservation {
            cell,
            subject_id: bound.subject_id,
            teacher_id: bound.teacher_id,
            room_type: bound.room_type,
        })
    }

    /// Re-reserves a previously released token.
    pub fn restore(&mut self, token: &Reservation) -> Result<Reservation, ReserveError> {
        self.reserve(
            token.cell.day,
            token.cell.slot,
            &token.subject_id,
            token.teacher_id.as_deref(),
            token.room_type.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weekday::{MONDAY, SUNDAY};

    fn tracker(section: &str, shared: &Arc<SharedResources>) -> AvailabilityTracker {
        AvailabilityTracker::new(
            section,
            WorkingCalendar::weekdays(6).unwrap(),
            Arc::clone(shared),
        )
    }

    #[test]
    fn test_reserve_and_release() {
        let shared = Arc::new(SharedResources::new());
        let mut t = tracker("7A", &shared);

        assert!(t.is_free(MONDAY, 1, Some("T1"), Some("lab")));
        let r = t.reserve(MONDAY, 1, "chem", Some("T1"), Some("lab")).unwrap();
        assert_eq!(r.cell, CellRef::new(MONDAY, 1));
        assert!(!t.is_free(MONDAY, 1, None, None));
        assert!(!t.is_free(MONDAY, 1, Some("T1"), None));

        let released = t.release(MONDAY, 1).unwrap();
        assert_eq!(released, r);
        assert!(t.is_free(MONDAY, 1, Some("T1"), Some("lab")));
        assert!(t.release(MONDAY, 1).is_none());
    }

    #[test]
    fn test_section_conflict_reported_first() {
        let shared = Arc::new(SharedResources::new());
        let mut t = tracker("7A", &shared);
        t.reserve(MONDAY, 1, "math", Some("T1"), None).unwrap();

        let err = t.reserve(MONDAY, 1, "art", Some("T1"), None).unwrap_err();
        assert_eq!(
            err,
            ReserveError::SectionSlotTaken {
                cell: CellRef::new(MONDAY, 1),
                occupant: "math".into()
            }
        );
    }

    #[test]
    fn test_teacher_shared_between_sections() {
        let shared = Arc::new(SharedResources::new());
        let mut a = tracker("7A", &shared);
        let mut b = tracker("7B", &shared);

        a.reserve(MONDAY, 2, "math", Some("T1"), None).unwrap();
        assert!(!b.is_free(MONDAY, 2, Some("T1"), None));
        let err = b.reserve(MONDAY, 2, "math", Some("T1"), None).unwrap_err();
        assert!(matches!(err, ReserveError::TeacherClash { .. }));
        // Failed reservation leaves nothing behind.
        assert!(b.grid().is_empty_at(MONDAY, 2));

        // Releasing in 7B must not free 7A's booking.
        assert!(b.release(MONDAY, 2).is_none());
        assert!(shared.teacher_booking("T1", CellRef::new(MONDAY, 2)).is_some());
    }

    #[test]
    fn test_outside_calendar() {
        let shared = Arc::new(SharedResources::new());
        let mut t = tracker("7A", &shared);
        let err = t.reserve(SUNDAY, 1, "math", None, None).unwrap_err();
        assert!(matches!(err, ReserveError::OutsideCalendar { .. }));
    }

    #[test]
    fn test_restore() {
        let shared = Arc::new(SharedResources::new());
        let mut t = tracker("7A", &shared);
        t.reserve(MONDAY, 3, "bio", Some("T2"), None).unwrap();
        let token = t.release(MONDAY, 3).unwrap();
        t.restore(&token).unwrap();
        assert!(t.grid().holds(MONDAY, 3, "bio"));
        assert!(shared.teacher_booking("T2", CellRef::new(MONDAY, 3)).is_some());
    }
}

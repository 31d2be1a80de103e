//! Occupancy tracking for section, teacher and room grids.
//!
//! Answers "is `(day, slot)` free for this subject/teacher/room" in O(1)
//! and books cells atomically: a reservation either lands in all three
//! grids or in none, and a failure names the dimension that blocked it.
//!
//! # Sharing
//!
//! | Grid | Owner | Synchronization |
//! |------|-------|-----------------|
//! | Section | [`AvailabilityTracker`] (one run) | none |
//! | Teacher | [`SharedResources`] (all runs) | one lock |
//! | Room type | [`SharedResources`] (all runs) | one lock |

mod shared;
mod tracker;

pub use shared::{Booking, SharedResources, SnapshotEntry};
pub use tracker::{AvailabilityTracker, Reservation};

use thiserror::Error;

use crate::models::CellRef;

/// Why a reservation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReserveError {
    /// The cell is not part of the calendar.
    #[error("{cell} is outside the calendar")]
    OutsideCalendar { cell: CellRef },
    /// The section already has a period in the cell.
    #[error("{cell} already holds {occupant} in this section")]
    SectionSlotTaken { cell: CellRef, occupant: String },
    /// The teacher is teaching elsewhere in the cell.
    #[error("teacher {teacher_id} is busy on {cell} ({occupant})")]
    TeacherClash {
        teacher_id: String,
        cell: CellRef,
        occupant: Booking,
    },
    /// Every room of the type is booked in the cell.
    #[error("all {capacity} {room_type} room(s) are booked on {cell}")]
    RoomClash {
        room_type: String,
        cell: CellRef,
        capacity: u32,
    },
}

impl ReserveError {
    /// Cell the refused reservation targeted.
    pub fn cell(&self) -> CellRef {
        match self {
            Self::OutsideCalendar { cell }
            | Self::SectionSlotTaken { cell, .. }
            | Self::TeacherClash { cell, .. }
            | Self::RoomClash { cell, .. } => *cell,
        }
    }
}

//! Teacher and room occupancy shared across concurrent runs.
//!
//! Every section generated concurrently books the same teachers and
//! special rooms, so their grids live here behind one lock. A
//! check-and-book is a single critical section: two runs can never both
//! see a cell free and both book it.
//!
//! # Capacity
//! A teacher holds at most one booking per cell. A room type holds up to
//! its configured capacity (default 1) per cell.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ReserveError;
use crate::models::{CellRef, Day, Slot};

/// Owner of a teacher or room booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub section_id: String,
    pub subject_id: String,
}

impl Booking {
    pub fn new(section_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            subject_id: subject_id.into(),
        }
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section {} / {}", self.section_id, self.subject_id)
    }
}

/// One committed period of another section, as loaded from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub section_id: String,
    pub subject_id: String,
    pub day: Day,
    pub slot: Slot,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
}

#[derive(Debug, Default)]
struct SharedState {
    teachers: HashMap<String, HashMap<CellRef, Booking>>,
    rooms: HashMap<String, HashMap<CellRef, Vec<Booking>>>,
    room_capacity: HashMap<String, u32>,
}

impl SharedState {
    fn capacity(&self, room_type: &str, default: u32) -> u32 {
        self.room_capacity.get(room_type).copied().unwrap_or(default)
    }

    fn teacher_at(&self, teacher_id: &str, cell: CellRef) -> Option<&Booking> {
        self.teachers.get(teacher_id).and_then(|g| g.get(&cell))
    }

    fn room_load(&self, room_type: &str, cell: CellRef) -> usize {
        self.rooms
            .get(room_type)
            .and_then(|g| g.get(&cell))
            .map_or(0, Vec::len)
    }
}

/// Teacher and room-type grids shared by every run.
#[derive(Debug)]
pub struct SharedResources {
    default_room_capacity: u32,
    state: Mutex<SharedState>,
}

impl Default for SharedResources {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedResources {
    /// Creates empty shared state with room capacity 1.
    pub fn new() -> Self {
        Self {
            default_room_capacity: 1,
            state: Mutex::new(SharedState::default()),
        }
    }

    /// Sets the capacity of room types without an explicit capacity.
    pub fn with_default_room_capacity(mut self, capacity: u32) -> Self {
        self.default_room_capacity = capacity;
        self
    }

    /// Sets the number of rooms of a type usable in the same cell.
    pub fn with_room_capacity(self, room_type: impl Into<String>, capacity: u32) -> Self {
        self.set_room_capacity(room_type, capacity);
        self
    }

    /// Sets the capacity of a room type.
    pub fn set_room_capacity(&self, room_type: impl Into<String>, capacity: u32) {
        self.lock().room_capacity.insert(room_type.into(), capacity);
    }

    /// Capacity of a room type.
    pub fn room_capacity(&self, room_type: &str) -> u32 {
        self.lock().capacity(room_type, self.default_room_capacity)
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        // No booking mutation can panic halfway.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Booking of a teacher at a cell.
    pub fn teacher_booking(&self, teacher_id: &str, cell: CellRef) -> Option<Booking> {
        self.lock().teacher_at(teacher_id, cell).cloned()
    }

    /// Bookings of a room type at a cell.
    pub fn room_bookings(&self, room_type: &str, cell: CellRef) -> Vec<Booking> {
        self.lock()
            .rooms
            .get(room_type)
            .and_then(|g| g.get(&cell))
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the teacher and room type are both free at a cell.
    pub fn is_free(&self, cell: CellRef, teacher_id: Option<&str>, room_type: Option<&str>) -> bool {
        let state = self.lock();
        let teacher_free = teacher_id.map_or(true, |t| state.teacher_at(t, cell).is_none());
        let room_free = room_type.map_or(true, |r| {
            (state.room_load(r, cell) as u32) < state.capacity(r, self.default_room_capacity)
        });
        teacher_free && room_free
    }

    /// Books a teacher and room type at a cell, all or nothing.
    ///
    /// # Errors
    /// `TeacherClash` or `RoomClash` naming the occupant; nothing is booked.
    pub fn book(
        &self,
        owner: &Booking,
        cell: CellRef,
        teacher_id: Option<&str>,
        room_type: Option<&str>,
    ) -> Result<(), ReserveError> {
        let mut state = self.lock();

        if let Some(teacher) = teacher_id {
            if let Some(existing) = state.teacher_at(teacher, cell) {
                return Err(ReserveError::TeacherClash {
                    teacher_id: teacher.to_string(),
                    cell,
                    occupant: existing.clone(),
                });
            }
        }
        if let Some(room) = room_type {
            let capacity = state.capacity(room, self.default_room_capacity);
            if state.room_load(room, cell) as u32 >= capacity {
                return Err(ReserveError::RoomClash {
                    room_type: room.to_string(),
                    cell,
                    capacity,
                });
            }
        }

        if let Some(teacher) = teacher_id {
            state
                .teachers
                .entry(teacher.to_string())
                .or_default()
                .insert(cell, owner.clone());
        }
        if let Some(room) = room_type {
            state
                .rooms
                .entry(room.to_string())
                .or_default()
                .entry(cell)
                .or_default()
                .push(owner.clone());
        }
        Ok(())
    }

    /// Removes the teacher and room bookings a section holds at a cell.
    ///
    /// Bookings of other sections are left alone. Returns whether
    /// anything was removed.
    pub fn unbook(
        &self,
        section_id: &str,
        cell: CellRef,
        teacher_id: Option<&str>,
        room_type: Option<&str>,
    ) -> bool {
        let mut guard = self.lock();
        let state = &mut *guard;
        let mut removed = false;

        if let Some(teacher) = teacher_id {
            if let Some(grid) = state.teachers.get_mut(teacher) {
                if grid.get(&cell).is_some_and(|b| b.section_id == section_id) {
                    grid.remove(&cell);
                    removed = true;
                }
            }
        }
        if let Some(room) = room_type {
            if let Some(bookings) = state.rooms.get_mut(room).and_then(|g| g.get_mut(&cell)) {
                if let Some(pos) = bookings.iter().position(|b| b.section_id == section_id) {
                    bookings.remove(pos);
                    removed = true;
                }
            }
        }
        removed
    }

    /// Drops every booking of a section. Returns the number removed.
    ///
    /// Regenerating a section replaces its previous timetable.
    pub fn release_section(&self, section_id: &str) -> usize {
        let mut state = self.lock();
        let mut removed = 0;
        for grid in state.teachers.values_mut() {
            let before = grid.len();
            grid.retain(|_, b| b.section_id != section_id);
            removed += before - grid.len();
        }
        for grid in state.rooms.values_mut() {
            for bookings in grid.values_mut() {
                let before = bookings.len();
                bookings.retain(|b| b.section_id != section_id);
                removed += before - bookings.len();
            }
        }
        removed
    }

    /// Loads committed periods of other sections.
    ///
    /// Entries that clash with what is already booked are skipped and
    /// returned.
    pub fn seed(&self, entries: &[SnapshotEntry]) -> Vec<ReserveError> {
        let mut rejected = Vec::new();
        for entry in entries {
            let owner = Booking::new(&entry.section_id, &entry.subject_id);
            let cell = CellRef::new(entry.day, entry.slot);
            if let Err(e) = self.book(
                &owner,
                cell,
                entry.teacher_id.as_deref(),
                entry.room_type.as_deref(),
            ) {
                warn!(section_id = %entry.section_id, error = %e, "Skipping clashing snapshot entry");
                rejected.push(e);
            }
        }
        rejected
    }

    /// Exports every booking, sorted by section, cell and subject.
    ///
    /// A period with both a teacher and a room appears once.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        let state = self.lock();
        let mut merged: HashMap<(String, CellRef, String), SnapshotEntry> = HashMap::new();

        for (teacher, grid) in &state.teachers {
            for (cell, b) in grid {
                merged
                    .entry((b.section_id.clone(), *cell, b.subject_id.clone()))
                    .or_insert_with(|| entry_for(b, *cell))
                    .teacher_id = Some(teacher.clone());
            }
        }
        for (room, grid) in &state.rooms {
            for (cell, bookings) in grid {
                for b in bookings {
                    merged
                        .entry((b.section_id.clone(), *cell, b.subject_id.clone()))
                        .or_insert_with(|| entry_for(b, *cell))
                        .room_type = Some(room.clone());
                }
            }
        }

        let mut entries: Vec<SnapshotEntry> = merged.into_values().collect();
        entries.sort_by(|a, b| {
            (&a.section_id, a.day, a.slot, &a.subject_id)
                .cmp(&(&b.section_id, b.day, b.slot, &b.subject_id))
        });
        entries
    }

    /// Number of cells a teacher is booked for.
    pub fn teacher_load(&self, teacher_id: &str) -> usize {
        self.lock().teachers.get(teacher_id).map_or(0, HashMap::len)
    }
}

fn entry_for(b: &Booking, cell: CellRef) -> SnapshotEntry {
    SnapshotEntry {
        section_id: b.section_id.clone(),
        subject_id: b.subject_id.clone(),
        day: cell.day,
        slot: cell.slot,
        teacher_id: None,
        room_type: None,
    }
}

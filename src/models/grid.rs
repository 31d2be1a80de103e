//! Section timetable grid.
//!
//! A flat `day × slot` array for one section. Each cell is either empty
//! or bound to a subject, its teacher and the room type it occupies.

use serde::{Deserialize, Serialize};

use super::{Day, Slot, WorkingCalendar};

/// Binding of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Subject placed in the cell.
    pub subject_id: String,
    /// Teacher taking the period, if assigned.
    pub teacher_id: Option<String>,
    /// Special room type booked for the period.
    pub room_type: Option<String>,
}

impl Cell {
    /// Creates a cell binding.
    pub fn new(
        subject_id: impl Into<String>,
        teacher_id: Option<String>,
        room_type: Option<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            teacher_id,
            room_type,
        }
    }
}

/// An occupied cell with its coordinates, as handed to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridEntry<'a> {
    pub day: Day,
    pub slot: Slot,
    pub cell: &'a Cell,
}

/// Weekly grid of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    calendar: WorkingCalendar,
    cells: Vec<Option<Cell>>,
}

impl Grid {
    /// Creates an empty grid shaped by the calendar.
    pub fn new(calendar: WorkingCalendar) -> Self {
        let cells = vec![None; calendar.capacity()];
        Self { calendar, cells }
    }

    /// The calendar this grid is shaped by.
    pub fn calendar(&self) -> &WorkingCalendar {
        &self.calendar
    }

    /// Binding at `(day, slot)`, `None` if empty or outside the calendar.
    pub fn get(&self, day: Day, slot: Slot) -> Option<&Cell> {
        self.calendar
            .cell_index(day, slot)
            .and_then(|i| self.cells[i].as_ref())
    }

    /// Whether `(day, slot)` is inside the calendar and empty.
    pub fn is_empty_at(&self, day: Day, slot: Slot) -> bool {
        self.calendar
            .cell_index(day, slot)
            .is_some_and(|i| self.cells[i].is_none())
    }

    /// Binds a cell, returning the previous binding.
    ///
    /// Returns `None` without writing if the cell is outside the calendar.
    pub(crate) fn set(&mut self, day: Day, slot: Slot, cell: Cell) -> Option<Cell> {
        let i = self.calendar.cell_index(day, slot)?;
        self.cells[i].replace(cell)
    }

    /// Empties a cell, returning its binding.
    pub(crate) fn clear(&mut self, day: Day, slot: Slot) -> Option<Cell> {
        let i = self.calendar.cell_index(day, slot)?;
        self.cells[i].take()
    }

    /// Whether `(day, slot)` holds `subject_id`.
    pub fn holds(&self, day: Day, slot: Slot, subject_id: &str) -> bool {
        self.get(day, slot).is_some_and(|c| c.subject_id == subject_id)
    }

    /// Number of occupied cells.
    pub fn placed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of periods of a subject across the week.
    pub fn count_for_subject(&self, subject_id: &str) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.subject_id == subject_id)
            .count()
    }

    /// Slots holding a subject on one day, ascending.
    pub fn subject_slots_on_day(&self, subject_id: &str, day: Day) -> Vec<Slot> {
        self.calendar
            .slots()
            .filter(|&slot| self.holds(day, slot, subject_id))
            .collect()
    }

    /// Number of periods of a subject on one day.
    pub fn count_for_subject_on_day(&self, subject_id: &str, day: Day) -> usize {
        self.calendar
            .slots()
            .filter(|&slot| self.holds(day, slot, subject_id))
            .count()
    }

    /// Distinct days on which a subject is placed.
    pub fn days_used_by(&self, subject_id: &str) -> usize {
        self.calendar
            .days()
            .iter()
            .filter(|&&day| self.count_for_subject_on_day(subject_id, day) > 0)
            .count()
    }

    /// Occupied cells in calendar order.
    pub fn entries(&self) -> impl Iterator<Item = GridEntry<'_>> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let cell = cell.as_ref()?;
            let (day, slot) = self.calendar.cell_at(i)?;
            Some(GridEntry { day, slot, cell })
        })
    }
}

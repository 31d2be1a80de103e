//! Working calendar model.
//!
//! Defines the shape of a weekly timetable: which days of the week are
//! working days and how many period slots each day has.
//!
//! # Cell Model
//! A cell is addressed by `(day, slot)` where `day` is a day-of-week
//! number (0 = Sunday … 6 = Saturday) and `slot` is a 1-based period
//! index. Working days keep the order they were declared in; that order
//! is the calendar's notion of "earliest day".

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Day of the week (0 = Sunday … 6 = Saturday).
pub type Day = u8;

/// Period slot within a day (1-based).
pub type Slot = u8;

/// Day-of-week constants.
pub mod weekday {
    use super::Day;

    pub const SUNDAY: Day = 0;
    pub const MONDAY: Day = 1;
    pub const TUESDAY: Day = 2;
    pub const WEDNESDAY: Day = 3;
    pub const THURSDAY: Day = 4;
    pub const FRIDAY: Day = 5;
    pub const SATURDAY: Day = 6;

    /// English name of a day-of-week number.
    pub fn name(day: Day) -> &'static str {
        match day {
            SUNDAY => "Sunday",
            MONDAY => "Monday",
            TUESDAY => "Tuesday",
            WEDNESDAY => "Wednesday",
            THURSDAY => "Thursday",
            FRIDAY => "Friday",
            SATURDAY => "Saturday",
            _ => "Unknown day",
        }
    }
}

/// Highest valid day-of-week number.
pub const MAX_DAY: Day = 6;

/// Coordinates of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub day: Day,
    pub slot: Slot,
}

impl CellRef {
    pub fn new(day: Day, slot: Slot) -> Self {
        Self { day, slot }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} slot {}", weekday::name(self.day), self.slot)
    }
}

/// Errors raised when building a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("calendar has no working days")]
    NoWorkingDays,
    #[error("calendar has no period slots")]
    NoSlots,
    #[error("day {0} is out of range (0-6)")]
    DayOutOfRange(Day),
    #[error("day {0} is listed twice")]
    DuplicateDay(Day),
}

/// Ordered working days × period slots for one session or template.
///
/// Immutable once built; every grid of a generation run shares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CalendarFields", into = "CalendarFields")]
pub struct WorkingCalendar {
    days: Vec<Day>,
    slots_per_day: Slot,
    /// Day-of-week → row index, `None` for non-working days.
    day_rows: [Option<usize>; 7],
}

/// Serialized form of a calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarFields {
    working_days: Vec<Day>,
    slots_per_day: Slot,
}

impl TryFrom<CalendarFields> for WorkingCalendar {
    type Error = CalendarError;

    fn try_from(fields: CalendarFields) -> Result<Self, Self::Error> {
        Self::new(fields.working_days, fields.slots_per_day)
    }
}

impl From<WorkingCalendar> for CalendarFields {
    fn from(cal: WorkingCalendar) -> Self {
        Self {
            working_days: cal.days,
            slots_per_day: cal.slots_per_day,
        }
    }
}

impl WorkingCalendar {
    /// Creates a calendar from working days (in order) and a slot count.
    pub fn new(
        days: impl IntoIterator<Item = Day>,
        slots_per_day: Slot,
    ) -> Result<Self, CalendarError> {
        if slots_per_day == 0 {
            return Err(CalendarError::NoSlots);
        }

        let mut day_rows = [None; 7];
        let mut ordered = Vec::new();
        for day in days {
            if day > MAX_DAY {
                return Err(CalendarError::DayOutOfRange(day));
            }
            let row = &mut day_rows[day as usize];
            if row.is_some() {
                return Err(CalendarError::DuplicateDay(day));
            }
            *row = Some(ordered.len());
            ordered.push(day);
        }

        if ordered.is_empty() {
            return Err(CalendarError::NoWorkingDays);
        }

        Ok(Self {
            days: ordered,
            slots_per_day,
            day_rows,
        })
    }

    /// Monday through Friday.
    pub fn weekdays(slots_per_day: Slot) -> Result<Self, CalendarError> {
        Self::new(weekday::MONDAY..=weekday::FRIDAY, slots_per_day)
    }

    /// Monday through Saturday.
    pub fn six_day_week(slots_per_day: Slot) -> Result<Self, CalendarError> {
        Self::new(weekday::MONDAY..=weekday::SATURDAY, slots_per_day)
    }

    /// Working days in calendar order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Number of working days.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Number of period slots per day.
    #[inline]
    pub fn slots_per_day(&self) -> Slot {
        self.slots_per_day
    }

    /// Slot indices of one day (1..=N).
    pub fn slots(&self) -> std::ops::RangeInclusive<Slot> {
        1..=self.slots_per_day
    }

    /// Total cells in the week.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.days.len() * self.slots_per_day as usize
    }

    /// Row index of a day, `None` if it is not a working day.
    #[inline]
    pub fn day_row(&self, day: Day) -> Option<usize> {
        self.day_rows.get(day as usize).copied().flatten()
    }

    /// Working days directly before and after `day` in calendar order.
    pub fn neighbor_days(&self, day: Day) -> impl Iterator<Item = Day> + '_ {
        let row = self.day_row(day);
        [row.and_then(|r| r.checked_sub(1)), row.map(|r| r + 1)]
            .into_iter()
            .flatten()
            .filter_map(move |r| self.days.get(r).copied())
    }

    /// Whether `day` is a working day.
    pub fn is_working_day(&self, day: Day) -> bool {
        self.day_row(day).is_some()
    }

    /// Whether `slot` is within 1..=N.
    pub fn has_slot(&self, slot: Slot) -> bool {
        (1..=self.slots_per_day).contains(&slot)
    }

    /// Whether `(day, slot)` is a cell of this calendar.
    pub fn contains(&self, day: Day, slot: Slot) -> bool {
        self.is_working_day(day) && self.has_slot(slot)
    }

    /// Flat index of a cell (row-major: day row, then slot).
    #[inline]
    pub fn cell_index(&self, day: Day, slot: Slot) -> Option<usize> {
        if !self.has_slot(slot) {
            return None;
        }
        self.day_row(day)
            .map(|row| row * self.slots_per_day as usize + (slot as usize - 1))
    }

    /// Cell at a flat index.
    pub fn cell_at(&self, index: usize) -> Option<(Day, Slot)> {
        let per_day = self.slots_per_day as usize;
        let day = *self.days.get(index / per_day)?;
        Some((day, (index % per_day) as Slot + 1))
    }

    /// All cells in calendar order (earliest day, then earliest slot).
    pub fn cells(&self) -> impl Iterator<Item = (Day, Slot)> + '_ {
        self.days
            .iter()
            .flat_map(move |&day| self.slots().map(move |slot| (day, slot)))
    }

    /// Last slot of the morning half: ceil(N / 2).
    pub fn morning_end(&self) -> Slot {
        self.slots_per_day.div_ceil(2)
    }
}

//! Timetable domain models.
//!
//! Provides the data types the engine consumes and produces. The host's
//! academic configuration maps onto them directly.
//!
//! # Domain Mappings
//!
//! | u-timetable | School ERP |
//! |-------------|------------|
//! | WorkingCalendar | Session / timetable template |
//! | SubjectRequirement | Class-subject assignment |
//! | SchedulingPreferences | Assignment scheduling settings |
//! | Grid | Section timetable |

mod calendar;
mod grid;
mod preferences;
mod request;
mod subject;

pub use calendar::{weekday, CalendarError, CellRef, Day, Slot, WorkingCalendar, MAX_DAY};
pub use grid::{Cell, Grid, GridEntry};
pub use preferences::{FixedSlot, SchedulingPreferences, SlotPosition, SlotRef};
pub use request::{GenerateTimetableRequest, GenerationInput};
pub use subject::SubjectRequirement;

//! Raw per-subject scheduling preferences.
//!
//! These are the values exactly as the host's academic configuration
//! supplies them. Nothing here is validated; see
//! [`crate::validation::normalize_preferences`].

use serde::{Deserialize, Serialize};

use super::{CellRef, Day, Slot};

/// A hard-pinned `(day, slot)` commitment.
pub type FixedSlot = CellRef;

/// Symbolic position within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotPosition {
    First,
    Last,
    Morning,
    Afternoon,
}

/// A slot given either by index or by symbolic position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotRef {
    Index(Slot),
    Position(SlotPosition),
}

impl From<Slot> for SlotRef {
    fn from(slot: Slot) -> Self {
        Self::Index(slot)
    }
}

impl From<SlotPosition> for SlotRef {
    fn from(position: SlotPosition) -> Self {
        Self::Position(position)
    }
}

/// Scheduling preferences of one class-subject assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulingPreferences {
    /// Days the subject should land on.
    pub preferred_days: Vec<Day>,
    /// Days the subject should stay off.
    pub avoid_days: Vec<Day>,
    /// Slots the subject should land on.
    pub preferred_slots: Vec<SlotRef>,
    /// Slots the subject should stay off.
    pub avoid_slots: Vec<SlotRef>,
    /// Place multiple periods back-to-back on one day.
    pub prefer_consecutive: bool,
    /// Minimum slot distance between two placements on one day.
    pub min_gap_same_day: Option<u8>,
    /// 1-10, higher is placed first. Defaults to 5.
    pub priority: Option<i32>,
    /// Room type the subject needs.
    pub required_room_type: Option<String>,
    /// Hard-pinned cells.
    pub fixed_slots: Vec<FixedSlot>,
    /// Distribute periods across distinct days.
    pub spread_evenly: bool,
}

impl SchedulingPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferred_days(mut self, days: impl IntoIterator<Item = Day>) -> Self {
        self.preferred_days.extend(days);
        self
    }

    pub fn with_avoid_days(mut self, days: impl IntoIterator<Item = Day>) -> Self {
        self.avoid_days.extend(days);
        self
    }

    pub fn with_preferred_slot(mut self, slot: impl Into<SlotRef>) -> Self {
        self.preferred_slots.push(slot.into());
        self
    }

    pub fn with_avoid_slot(mut self, slot: impl Into<SlotRef>) -> Self {
        self.avoid_slots.push(slot.into());
        self
    }

    pub fn with_consecutive(mut self, prefer: bool) -> Self {
        self.prefer_consecutive = prefer;
        self
    }

    pub fn with_min_gap(mut self, gap: u8) -> Self {
        self.min_gap_same_day = Some(gap);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_room_type(mut self, room_type: impl Into<String>) -> Self {
        self.required_room_type = Some(room_type.into());
        self
    }

    pub fn with_fixed_slot(mut self, day: Day, slot: Slot) -> Self {
        self.fixed_slots.push(FixedSlot::new(day, slot));
        self
    }

    pub fn with_spread_evenly(mut self, spread: bool) -> Self {
        self.spread_evenly = spread;
        self
    }
}

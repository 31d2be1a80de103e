//! Subject requirement model.
//!
//! One requirement per class-subject assignment of the section being
//! generated: how many periods it needs, who teaches it, what room it
//! needs and how it prefers to be placed.

use serde::{Deserialize, Serialize};

use super::SchedulingPreferences;

/// Scheduling load of one subject for one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRequirement {
    /// Subject identifier, unique within a request.
    pub subject_id: String,
    /// Display name used in diagnostics.
    #[serde(default)]
    pub subject_name: Option<String>,
    /// Assigned teacher.
    #[serde(default)]
    pub teacher_id: Option<String>,
    /// Target periods per week.
    pub periods_per_week: u32,
    /// Cap per day. `None` = slots per day.
    #[serde(default)]
    pub max_periods_per_day: Option<u32>,
    /// Floor when partial placement is tolerated. `None` = `periods_per_week`.
    #[serde(default)]
    pub min_periods_per_week: Option<u32>,
    #[serde(default)]
    pub is_elective: bool,
    #[serde(default)]
    pub requires_special_room: bool,
    #[serde(default)]
    pub special_room_type: Option<String>,
    #[serde(default)]
    pub preferences: SchedulingPreferences,
}

impl SubjectRequirement {
    /// Creates a requirement with no teacher, room or preferences.
    pub fn new(subject_id: impl Into<String>, periods_per_week: u32) -> Self {
        Self {
            subject_id: subject_id.into(),
            subject_name: None,
            teacher_id: None,
            periods_per_week,
            max_periods_per_day: None,
            min_periods_per_week: None,
            is_elective: false,
            requires_special_room: false,
            special_room_type: None,
            preferences: SchedulingPreferences::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = Some(name.into());
        self
    }

    pub fn with_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_id = Some(teacher_id.into());
        self
    }

    pub fn with_max_per_day(mut self, max: u32) -> Self {
        self.max_periods_per_day = Some(max);
        self
    }

    pub fn with_min_per_week(mut self, min: u32) -> Self {
        self.min_periods_per_week = Some(min);
        self
    }

    pub fn with_elective(mut self, elective: bool) -> Self {
        self.is_elective = elective;
        self
    }

    /// Requires a special room of the given type.
    pub fn with_special_room(mut self, room_type: impl Into<String>) -> Self {
        self.requires_special_room = true;
        self.special_room_type = Some(room_type.into());
        self
    }

    pub fn with_preferences(mut self, preferences: SchedulingPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Name for diagnostics: the display name if set, else the id.
    pub fn label(&self) -> &str {
        self.subject_name.as_deref().unwrap_or(&self.subject_id)
    }
}

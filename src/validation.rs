//! Constraint normalization and input validation.
//!
//! Turns raw [`SchedulingPreferences`] and [`SubjectRequirement`]s into
//! validated, internally consistent constraint objects before any
//! placement starts. Detects:
//! - Fixed slots outside the calendar
//! - Day/slot preference entries outside the calendar
//! - Inconsistent period counts (floor above target, too many fixed slots)
//! - Special rooms without a room type
//! - Duplicate subject IDs
//!
//! Contradictions between preference lists are resolved, not rejected:
//! a preferred day or slot that is also avoided stays preferred, and a
//! fixed slot is never filtered by an avoidance list. Each resolution is
//! kept as a note on the normalized object.
//!
//! All errors of a request are collected so the caller sees every
//! problem at once; any error rejects the whole request.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use thiserror::Error;
use tracing::info;

use crate::models::{
    weekday, Day, FixedSlot, SchedulingPreferences, Slot, SlotPosition, SlotRef,
    SubjectRequirement, WorkingCalendar, MAX_DAY,
};

/// Priority used when a subject declares none.
pub const DEFAULT_PRIORITY: u8 = 5;

/// Validation result.
pub type ValidationResult<T> = Result<T, Vec<ValidationError>>;

/// A field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Path of the offending field, e.g. `subjects[math].preferences.fixedSlots[0]`.
    pub field: String,
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A day or slot lies outside the calendar.
    OutOfRange,
    /// A value is not acceptable on its own (e.g. zero periods).
    InvalidValue,
    /// Two fields contradict each other in a way that cannot be resolved.
    Inconsistent,
    /// A required value is absent.
    MissingValue,
    /// Two subjects share the same ID.
    DuplicateId,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Validated preferences of one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPreferences {
    pub preferred_days: BTreeSet<Day>,
    pub avoid_days: BTreeSet<Day>,
    pub preferred_slots: BTreeSet<Slot>,
    pub avoid_slots: BTreeSet<Slot>,
    pub prefer_consecutive: bool,
    /// Minimum slot distance between same-day placements (≤ 1 = no constraint).
    pub min_gap_same_day: u8,
    /// 1-10.
    pub priority: u8,
    pub required_room_type: Option<String>,
    /// Deduplicated, all inside the calendar.
    pub fixed_slots: Vec<FixedSlot>,
    pub spread_evenly: bool,
    /// Non-fatal resolutions applied during normalization.
    pub notes: Vec<String>,
}

impl NormalizedPreferences {
    /// Whether the cell falls on an avoided day or an avoided slot.
    pub fn is_avoided(&self, day: Day, slot: Slot) -> bool {
        self.avoid_days.contains(&day) || self.avoid_slots.contains(&slot)
    }

    /// Whether the cell is one of the fixed slots.
    pub fn is_fixed(&self, day: Day, slot: Slot) -> bool {
        self.fixed_slots.contains(&FixedSlot::new(day, slot))
    }

    /// Whether two same-day slots are far enough apart.
    #[inline]
    pub fn gap_ok(&self, a: Slot, b: Slot) -> bool {
        self.min_gap_same_day <= 1 || a.abs_diff(b) >= self.min_gap_same_day
    }
}

/// Validated requirement of one subject, ready for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequirement {
    pub subject_id: String,
    /// Name used in diagnostics.
    pub label: String,
    pub teacher_id: Option<String>,
    pub periods_per_week: u32,
    pub max_periods_per_day: u32,
    pub min_periods_per_week: u32,
    pub is_elective: bool,
    /// Effective room type (preference override, else special room type).
    pub room_type: Option<String>,
    pub preferences: NormalizedPreferences,
}

impl NormalizedRequirement {
    /// Periods still to be placed after the fixed slots.
    pub fn fill_target(&self) -> u32 {
        self.periods_per_week
            .saturating_sub(self.preferences.fixed_slots.len() as u32)
    }

    /// Priority (1-10).
    #[inline]
    pub fn priority(&self) -> u8 {
        self.preferences.priority
    }

    /// `label (subject_id)`, or just the id when they match.
    pub fn display(&self) -> String {
        if self.label == self.subject_id {
            self.subject_id.clone()
        } else {
            format!("{} ({})", self.label, self.subject_id)
        }
    }
}

/// Normalizes raw preferences against a calendar.
///
/// # Returns
/// The normalized preferences, or every validation error found.
pub fn normalize_preferences(
    raw: &SchedulingPreferences,
    calendar: &WorkingCalendar,
) -> ValidationResult<NormalizedPreferences> {
    normalize_preferences_at("preferences", raw, calendar)
}

fn normalize_preferences_at(
    prefix: &str,
    raw: &SchedulingPreferences,
    calendar: &WorkingCalendar,
) -> ValidationResult<NormalizedPreferences> {
    let mut errors = Vec::new();
    let mut notes = Vec::new();

    let priority = match raw.priority {
        None => DEFAULT_PRIORITY,
        Some(p) => {
            let clamped = p.clamp(1, 10) as u8;
            if i32::from(clamped) != p {
                notes.push(format!("priority {p} clamped to {clamped}"));
            }
            clamped
        }
    };

    let preferred_days = collect_days(
        &format!("{prefix}.preferredDays"),
        &raw.preferred_days,
        calendar,
        &mut errors,
        &mut notes,
    );
    let mut avoid_days = collect_days(
        &format!("{prefix}.avoidDays"),
        &raw.avoid_days,
        calendar,
        &mut errors,
        &mut notes,
    );
    let preferred_slots = resolve_slots(
        &format!("{prefix}.preferredSlots"),
        &raw.preferred_slots,
        calendar,
        &mut errors,
    );
    let mut avoid_slots = resolve_slots(
        &format!("{prefix}.avoidSlots"),
        &raw.avoid_slots,
        calendar,
        &mut errors,
    );

    for day in &preferred_days {
        if avoid_days.remove(day) {
            notes.push(format!(
                "{} is both preferred and avoided; kept as preferred",
                weekday::name(*day)
            ));
        }
    }
    for slot in &preferred_slots {
        if avoid_slots.remove(slot) {
            notes.push(format!(
                "slot {slot} is both preferred and avoided; kept as preferred"
            ));
        }
    }

    let mut fixed_slots = Vec::new();
    let mut seen = BTreeSet::new();
    for (i, fixed) in raw.fixed_slots.iter().enumerate() {
        let field = format!("{prefix}.fixedSlots[{i}]");
        if !calendar.is_working_day(fixed.day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                field,
                format!("day {} is not a working day of the calendar", fixed.day),
            ));
            continue;
        }
        if !calendar.has_slot(fixed.slot) {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                field,
                format!(
                    "slot {} is outside 1..={}",
                    fixed.slot,
                    calendar.slots_per_day()
                ),
            ));
            continue;
        }
        if !seen.insert(*fixed) {
            notes.push(format!(
                "duplicate fixed slot {} slot {} collapsed",
                weekday::name(fixed.day),
                fixed.slot
            ));
            continue;
        }
        if avoid_days.contains(&fixed.day) || avoid_slots.contains(&fixed.slot) {
            notes.push(format!(
                "fixed slot {} slot {} is avoided; fixed slot kept",
                weekday::name(fixed.day),
                fixed.slot
            ));
        }
        fixed_slots.push(*fixed);
    }

    let min_gap_same_day = raw.min_gap_same_day.unwrap_or(0);
    let mut prefer_consecutive = raw.prefer_consecutive;
    if prefer_consecutive && min_gap_same_day > 1 {
        prefer_consecutive = false;
        notes.push(format!(
            "preferConsecutive contradicts minGapSameDay {min_gap_same_day}; gap kept"
        ));
    }

    let required_room_type = match raw.required_room_type.as_deref().map(str::trim) {
        Some("") => {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidValue,
                format!("{prefix}.requiredRoomType"),
                "room type must not be empty",
            ));
            None
        }
        other => other.map(str::to_string),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NormalizedPreferences {
        preferred_days,
        avoid_days,
        preferred_slots,
        avoid_slots,
        prefer_consecutive,
        min_gap_same_day,
        priority,
        required_room_type,
        fixed_slots,
        spread_evenly: raw.spread_evenly,
        notes,
    })
}

/// Validates and normalizes one subject requirement.
pub fn normalize_requirement(
    req: &SubjectRequirement,
    calendar: &WorkingCalendar,
) -> ValidationResult<NormalizedRequirement> {
    let prefix = format!("subjects[{}]", req.subject_id);
    let mut errors = Vec::new();

    if req.subject_id.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingValue,
            format!("{prefix}.subjectId"),
            "subject id must not be empty",
        ));
    }
    if req.periods_per_week == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidValue,
            format!("{prefix}.periodsPerWeek"),
            "must be at least 1",
        ));
    }

    let max_periods_per_day = req
        .max_periods_per_day
        .unwrap_or(u32::from(calendar.slots_per_day()));
    if max_periods_per_day == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidValue,
            format!("{prefix}.maxPeriodsPerDay"),
            "must be at least 1",
        ));
    }

    let min_periods_per_week = req.min_periods_per_week.unwrap_or(req.periods_per_week);
    if min_periods_per_week > req.periods_per_week {
        errors.push(ValidationError::new(
            ValidationErrorKind::Inconsistent,
            format!("{prefix}.minPeriodsPerWeek"),
            format!(
                "minimum {min_periods_per_week} exceeds periodsPerWeek {}",
                req.periods_per_week
            ),
        ));
    }

    let mut preferences = match normalize_preferences_at(
        &format!("{prefix}.preferences"),
        &req.preferences,
        calendar,
    ) {
        Ok(p) => Some(p),
        Err(e) => {
            errors.extend(e);
            None
        }
    };

    let special_room_type = req
        .special_room_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let room_type = match preferences.as_mut() {
        Some(prefs) => match (prefs.required_room_type.as_deref(), special_room_type) {
            (Some(pref), Some(special)) if pref != special => {
                prefs.notes.push(format!(
                    "requiredRoomType '{pref}' overrides specialRoomType '{special}'"
                ));
                Some(pref.to_string())
            }
            (Some(pref), _) => Some(pref.to_string()),
            (None, Some(special)) if req.requires_special_room => Some(special.to_string()),
            _ => None,
        },
        None => None,
    };
    if req.requires_special_room && room_type.is_none() && preferences.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingValue,
            format!("{prefix}.specialRoomType"),
            "requiresSpecialRoom is set but no room type is given",
        ));
    }

    if let Some(prefs) = &preferences {
        let fixed = prefs.fixed_slots.len() as u32;
        if req.periods_per_week > 0 && fixed > req.periods_per_week {
            errors.push(ValidationError::new(
                ValidationErrorKind::Inconsistent,
                format!("{prefix}.preferences.fixedSlots"),
                format!(
                    "{fixed} fixed slots exceed periodsPerWeek {}",
                    req.periods_per_week
                ),
            ));
        }

        let mut per_day: BTreeMap<Day, u32> = BTreeMap::new();
        for f in &prefs.fixed_slots {
            *per_day.entry(f.day).or_default() += 1;
        }
        for (day, count) in per_day {
            if max_periods_per_day > 0 && count > max_periods_per_day {
                errors.push(ValidationError::new(
                    ValidationErrorKind::Inconsistent,
                    format!("{prefix}.preferences.fixedSlots"),
                    format!(
                        "{count} fixed slots on {} exceed maxPeriodsPerDay {max_periods_per_day}",
                        weekday::name(day)
                    ),
                ));
            }
        }
    }

    match preferences {
        Some(preferences) if errors.is_empty() => {
            for note in &preferences.notes {
                info!(subject_id = %req.subject_id, note = %note, "Normalized preference");
            }
            Ok(NormalizedRequirement {
                subject_id: req.subject_id.clone(),
                label: req.label().to_string(),
                teacher_id: req.teacher_id.clone(),
                periods_per_week: req.periods_per_week,
                max_periods_per_day,
                min_periods_per_week,
                is_elective: req.is_elective,
                room_type,
                preferences,
            })
        }
        _ => Err(errors),
    }
}

/// Validates every requirement of a request.
///
/// Checks:
/// 1. No duplicate subject IDs
/// 2. Each requirement normalizes cleanly
///
/// # Returns
/// Normalized requirements in input order, or all errors across all subjects.
pub fn normalize_all(
    reqs: &[SubjectRequirement],
    calendar: &WorkingCalendar,
) -> ValidationResult<Vec<NormalizedRequirement>> {
    let mut errors = Vec::new();
    let mut normalized = Vec::with_capacity(reqs.len());
    let mut ids = HashSet::new();

    for req in reqs {
        if !ids.insert(req.subject_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("subjects[{}]", req.subject_id),
                format!("Duplicate subject ID: {}", req.subject_id),
            ));
            continue;
        }
        match normalize_requirement(req, calendar) {
            Ok(n) => normalized.push(n),
            Err(e) => errors.extend(e),
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

fn collect_days(
    field: &str,
    days: &[Day],
    calendar: &WorkingCalendar,
    errors: &mut Vec<ValidationError>,
    notes: &mut Vec<String>,
) -> BTreeSet<Day> {
    let mut set = BTreeSet::new();
    for &day in days {
        if day > MAX_DAY {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                field,
                format!("day {day} is out of range (0-6)"),
            ));
        } else if !calendar.is_working_day(day) {
            notes.push(format!(
                "{} is not a working day; ignored in {field}",
                weekday::name(day)
            ));
        } else {
            set.insert(day);
        }
    }
    set
}

fn resolve_slots(
    field: &str,
    refs: &[SlotRef],
    calendar: &WorkingCalendar,
    errors: &mut Vec<ValidationError>,
) -> BTreeSet<Slot> {
    let mut set = BTreeSet::new();
    for slot_ref in refs {
        match *slot_ref {
            SlotRef::Index(slot) if calendar.has_slot(slot) => {
                set.insert(slot);
            }
            SlotRef::Index(slot) => errors.push(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                field,
                format!("slot {slot} is outside 1..={}", calendar.slots_per_day()),
            )),
            SlotRef::Position(position) => set.extend(resolve_position(position, calendar)),
        }
    }
    set
}

/// Concrete slots of a symbolic position.
///
/// Morning is the first ceil(N/2) slots, afternoon the rest.
pub fn resolve_position(
    position: SlotPosition,
    calendar: &WorkingCalendar,
) -> std::ops::RangeInclusive<Slot> {
    let last = calendar.slots_per_day();
    let morning_end = calendar.morning_end();
    match position {
        SlotPosition::First => 1..=1,
        SlotPosition::Last => last..=last,
        SlotPosition::Morning => 1..=morning_end,
        // Empty when the whole day is morning.
        SlotPosition::Afternoon => morning_end + 1..=last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::weekday::{FRIDAY, MONDAY, SUNDAY, TUESDAY};

    fn calendar() -> WorkingCalendar {
        WorkingCalendar::six_day_week(8).unwrap()
    }

    #[test]
    fn test_priority_default_and_clamp() {
        let cal = calendar();
        let p = normalize_preferences(&SchedulingPreferences::new(), &cal).unwrap();
        assert_eq!(p.priority, DEFAULT_PRIORITY);

        let p = normalize_preferences(&SchedulingPreferences::new().with_priority(42), &cal).unwrap();
        assert_eq!(p.priority, 10);
        assert_eq!(p.notes.len(), 1);

        let p = normalize_preferences(&SchedulingPreferences::new().with_priority(-3), &cal).unwrap();
        assert_eq!(p.priority, 1);
    }

    #[test]
    fn test_symbolic_slots_resolved() {
        let cal = calendar();
        let raw = SchedulingPreferences::new()
            .with_preferred_slot(SlotPosition::Morning)
            .with_avoid_slot(SlotPosition::Last);
        let p = normalize_preferences(&raw, &cal).unwrap();
        assert_eq!(p.preferred_slots, (1..=4).collect::<BTreeSet<Slot>>());
        assert_eq!(p.avoid_slots, BTreeSet::from([8]));

        let afternoon: Vec<Slot> = resolve_position(SlotPosition::Afternoon, &cal).collect();
        assert_eq!(afternoon, vec![5, 6, 7, 8]);
        let first: Vec<Slot> = resolve_position(SlotPosition::First, &cal).collect();
        assert_eq!(first, vec![1]);
    }

    #[test]
    fn test_single_slot_day_has_no_afternoon() {
        let cal = WorkingCalendar::weekdays(1).unwrap();
        assert_eq!(resolve_position(SlotPosition::Afternoon, &cal).count(), 0);
    }

    #[test]
    fn test_preferred_wins_over_avoided() {
        let cal = calendar();
        let raw = SchedulingPreferences::new()
            .with_preferred_days([MONDAY])
            .with_avoid_days([MONDAY, TUESDAY])
            .with_preferred_slot(2)
            .with_avoid_slot(2);
        let p = normalize_preferences(&raw, &cal).unwrap();
        assert!(p.preferred_days.contains(&MONDAY));
        assert!(!p.avoid_days.contains(&MONDAY));
        assert!(p.avoid_days.contains(&TUESDAY));
        assert!(p.avoid_slots.is_empty());
        assert_eq!(p.notes.len(), 2);
    }

    #[test]
    fn test_fixed_slot_survives_avoidance() {
        let cal = calendar();
        let raw = SchedulingPreferences::new()
            .with_avoid_days([FRIDAY])
            .with_fixed_slot(FRIDAY, 3);
        let p = normalize_preferences(&raw, &cal).unwrap();
        assert_eq!(p.fixed_slots, vec![FixedSlot::new(FRIDAY, 3)]);
        assert!(p.is_fixed(FRIDAY, 3));
        assert!(p.notes.iter().any(|n| n.contains("fixed slot kept")));
    }

    #[test]
    fn test_fixed_slot_out_of_range() {
        let cal = calendar();
        let raw = SchedulingPreferences::new()
            .with_fixed_slot(SUNDAY, 1)
            .with_fixed_slot(MONDAY, 9);
        let errors = normalize_preferences(&raw, &cal).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ValidationErrorKind::OutOfRange));
        assert_eq!(errors[0].field, "preferences.fixedSlots[0]");
        assert_eq!(errors[1].field, "preferences.fixedSlots[1]");
    }

    #[test]
    fn test_duplicate_fixed_slots_collapsed() {
        let cal = calendar();
        let raw = SchedulingPreferences::new()
            .with_fixed_slot(MONDAY, 1)
            .with_fixed_slot(MONDAY, 1);
        let p = normalize_preferences(&raw, &cal).unwrap();
        assert_eq!(p.fixed_slots.len(), 1);
    }

    #[test]
    fn test_day_out_of_range_and_non_working_day() {
        let cal = calendar();
        let raw = SchedulingPreferences::new().with_preferred_days([SUNDAY, 9]);
        let errors = normalize_preferences(&raw, &cal).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "preferences.preferredDays");

        let raw = SchedulingPreferences::new().with_preferred_days([SUNDAY, MONDAY]);
        let p = normalize_preferences(&raw, &cal).unwrap();
        assert_eq!(p.preferred_days, BTreeSet::from([MONDAY]));
    }

    #[test]
    fn test_gap_beats_consecutive() {
        let cal = calendar();
        let raw = SchedulingPreferences::new().with_consecutive(true).with_min_gap(3);
        let p = normalize_preferences(&raw, &cal).unwrap();
        assert!(!p.prefer_consecutive);
        assert_eq!(p.min_gap_same_day, 3);
        assert!(p.gap_ok(1, 4));
        assert!(!p.gap_ok(2, 4));
    }

    #[test]
    fn test_requirement_defaults() {
        let cal = calendar();
        let n = normalize_requirement(&SubjectRequirement::new("math", 5), &cal).unwrap();
        assert_eq!(n.max_periods_per_day, 8);
        assert_eq!(n.min_periods_per_week, 5);
        assert_eq!(n.fill_target(), 5);
        assert_eq!(n.room_type, None);
        assert_eq!(n.display(), "math");
    }

    #[test]
    fn test_requirement_inconsistent_counts() {
        let cal = calendar();
        let req = SubjectRequirement::new("math", 0).with_max_per_day(0);
        let errors = normalize_requirement(&req, &cal).unwrap_err();
        assert_eq!(errors.len(), 2);

        let req = SubjectRequirement::new("math", 3).with_min_per_week(4);
        let errors = normalize_requirement(&req, &cal).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::Inconsistent);
        assert_eq!(errors[0].field, "subjects[math].minPeriodsPerWeek");
    }

    #[test]
    fn test_too_many_fixed_slots() {
        let cal = calendar();
        let req = SubjectRequirement::new("pe", 1).with_preferences(
            SchedulingPreferences::new()
                .with_fixed_slot(MONDAY, 1)
                .with_fixed_slot(TUESDAY, 1),
        );
        let errors = normalize_requirement(&req, &cal).unwrap_err();
        assert!(errors[0].message.contains("exceed periodsPerWeek"));

        let req = SubjectRequirement::new("pe", 3)
            .with_max_per_day(1)
            .with_preferences(
                SchedulingPreferences::new()
                    .with_fixed_slot(MONDAY, 1)
                    .with_fixed_slot(MONDAY, 5),
            );
        let errors = normalize_requirement(&req, &cal).unwrap_err();
        assert!(errors[0].message.contains("exceed maxPeriodsPerDay"));
    }

    #[test]
    fn test_room_type_resolution() {
        let cal = calendar();
        let req = SubjectRequirement::new("chem", 2).with_special_room("lab");
        assert_eq!(
            normalize_requirement(&req, &cal).unwrap().room_type.as_deref(),
            Some("lab")
        );

        let req = SubjectRequirement::new("chem", 2)
            .with_special_room("lab")
            .with_preferences(SchedulingPreferences::new().with_room_type("chem-lab"));
        let n = normalize_requirement(&req, &cal).unwrap();
        assert_eq!(n.room_type.as_deref(), Some("chem-lab"));
        assert!(n.preferences.notes.iter().any(|s| s.contains("overrides")));

        let mut req = SubjectRequirement::new("chem", 2);
        req.requires_special_room = true;
        let errors = normalize_requirement(&req, &cal).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingValue);
    }

    #[test]
    fn test_normalize_all_collects_everything() {
        let cal = calendar();
        let reqs = vec![
            SubjectRequirement::new("math", 5),
            SubjectRequirement::new("math", 3),
            SubjectRequirement::new("art", 2)
                .with_preferences(SchedulingPreferences::new().with_fixed_slot(MONDAY, 20)),
        ];
        let errors = normalize_all(&reqs, &cal).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::DuplicateId));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::OutOfRange));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new(
            ValidationErrorKind::OutOfRange,
            "subjects[x].preferences.fixedSlots[0]",
            "slot 9 is outside 1..=8",
        );
        assert_eq!(
            err.to_string(),
            "subjects[x].preferences.fixedSlots[0]: slot 9 is outside 1..=8"
        );
    }
}

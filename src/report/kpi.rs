//! Timetable quality metrics (KPIs).
//!
//! Computes quality indicators of a finished section grid against the
//! requirements it was generated from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Fill Rate | Placed cells / cells of the week |
//! | Placement Rate | Placed periods / required periods |
//! | Preferred-Day Hit Rate | Fill periods on a preferred day / fill periods of subjects with preferred days |
//! | Avoided Cells Used | Fill periods on an avoided day or slot |
//! | Days Used | Distinct days per subject |
//! | Consecutive Pairs | Adjacent same-subject slot pairs |
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated
//! timetabling" (soft-constraint cost measures)

use std::collections::HashMap;

use crate::models::Grid;
use crate::validation::NormalizedRequirement;

/// Timetable performance indicators.
///
/// Rates are in 0.0..=1.0.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Fraction of the week's cells holding a period.
    pub fill_rate: f64,
    /// Fraction of required periods placed, over all subjects.
    pub placement_rate: f64,
    /// Per-subject placement rate.
    pub placement_rate_by_subject: HashMap<String, f64>,
    /// Fraction of fill periods landing on a preferred day.
    pub preferred_day_hit_rate: f64,
    /// Fill periods placed on avoided days or slots.
    pub avoided_cells_used: usize,
    /// Distinct days per subject.
    pub days_used_by_subject: HashMap<String, usize>,
    /// Same-subject periods directly following each other.
    pub consecutive_pairs: usize,
}

impl TimetableKpi {
    /// Computes KPIs from a grid and its requirements.
    ///
    /// # Arguments
    /// * `grid` - The finished section grid.
    /// * `reqs` - The normalized requirements (for targets and preferences).
    pub fn calculate(grid: &Grid, reqs: &[NormalizedRequirement]) -> Self {
        let calendar = grid.calendar();
        let capacity = calendar.capacity();

        let mut required: u32 = 0;
        let mut placed_total: u32 = 0;
        let mut placement_rate_by_subject = HashMap::new();
        let mut days_used_by_subject = HashMap::new();
        let mut preferred_hits: usize = 0;
        let mut preferred_total: usize = 0;
        let mut avoided_cells_used: usize = 0;

        for req in reqs {
            let placed = grid.count_for_subject(&req.subject_id) as u32;
            required += req.periods_per_week;
            placed_total += placed.min(req.periods_per_week);
            placement_rate_by_subject.insert(
                req.subject_id.clone(),
                ratio(placed as f64, req.periods_per_week as f64),
            );
            days_used_by_subject.insert(req.subject_id.clone(), grid.days_used_by(&req.subject_id));

            let prefs = &req.preferences;
            for entry in grid.entries() {
                if entry.cell.subject_id != req.subject_id || prefs.is_fixed(entry.day, entry.slot)
                {
                    continue;
                }
                if prefs.is_avoided(entry.day, entry.slot) {
                    avoided_cells_used += 1;
                }
                if !prefs.preferred_days.is_empty() {
                    preferred_total += 1;
                    if prefs.preferred_days.contains(&entry.day) {
                        preferred_hits += 1;
                    }
                }
            }
        }

        let mut consecutive_pairs = 0;
        for &day in calendar.days() {
            for slot in calendar.slots().skip(1) {
                if let (Some(prev), Some(cur)) = (grid.get(day, slot - 1), grid.get(day, slot)) {
                    if prev.subject_id == cur.subject_id {
                        consecutive_pairs += 1;
                    }
                }
            }
        }

        Self {
            fill_rate: if capacity == 0 {
                0.0
            } else {
                grid.placed_count() as f64 / capacity as f64
            },
            placement_rate: ratio(placed_total as f64, required as f64),
            placement_rate_by_subject,
            preferred_day_hit_rate: ratio(preferred_hits as f64, preferred_total as f64),
            avoided_cells_used,
            days_used_by_subject,
            consecutive_pairs,
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_placement_rate: f64, max_avoided_cells: usize) -> bool {
        self.placement_rate >= min_placement_rate && self.avoided_cells_used <= max_avoided_cells
    }
}

/// `num / den`, or 1.0 when nothing was asked for.
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        1.0
    } else {
        num / den
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::availability::{AvailabilityTracker, SharedResources};
    use crate::models::weekday::{MONDAY, TUESDAY};
    use crate::models::{SchedulingPreferences, SubjectRequirement, WorkingCalendar};
    use crate::validation::normalize_all;

    fn fixture(subjects: &[SubjectRequirement]) -> (Vec<NormalizedRequirement>, AvailabilityTracker) {
        let cal = WorkingCalendar::new([MONDAY, TUESDAY], 4).unwrap();
        let reqs = normalize_all(subjects, &cal).unwrap();
        let tracker = AvailabilityTracker::new("7A", cal, Arc::new(SharedResources::new()));
        (reqs, tracker)
    }

    #[test]
    fn test_kpi_basic() {
        let (reqs, mut t) = fixture(&[
            SubjectRequirement::new("math", 3),
            SubjectRequirement::new("art", 2),
        ]);
        t.reserve(MONDAY, 1, "math", None, None).unwrap();
        t.reserve(MONDAY, 2, "math", None, None).unwrap();
        t.reserve(TUESDAY, 1, "math", None, None).unwrap();
        t.reserve(TUESDAY, 2, "art", None, None).unwrap();

        let kpi = TimetableKpi::calculate(t.grid(), &reqs);
        assert!((kpi.fill_rate - 0.5).abs() < 1e-10); // 4 / 8
        assert!((kpi.placement_rate - 0.8).abs() < 1e-10); // 4 / 5
        assert!((kpi.placement_rate_by_subject["art"] - 0.5).abs() < 1e-10);
        assert_eq!(kpi.days_used_by_subject["math"], 2);
        assert_eq!(kpi.consecutive_pairs, 1);
        assert!((kpi.preferred_day_hit_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_preferences() {
        let (reqs, mut t) = fixture(&[SubjectRequirement::new("pe", 2).with_preferences(
            SchedulingPreferences::new()
                .with_preferred_days([MONDAY])
                .with_avoid_slot(4),
        )]);
        t.reserve(MONDAY, 3, "pe", None, None).unwrap();
        t.reserve(TUESDAY, 4, "pe", None, None).unwrap();

        let kpi = TimetableKpi::calculate(t.grid(), &reqs);
        assert!((kpi.preferred_day_hit_rate - 0.5).abs() < 1e-10);
        assert_eq!(kpi.avoided_cells_used, 1);
        assert!(kpi.meets_thresholds(1.0, 1));
        assert!(!kpi.meets_thresholds(1.0, 0));
    }

    #[test]
    fn test_kpi_empty() {
        let (reqs, t) = fixture(&[]);
        let kpi = TimetableKpi::calculate(t.grid(), &reqs);
        assert!((kpi.fill_rate - 0.0).abs() < 1e-10);
        assert!((kpi.placement_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.consecutive_pairs, 0);
    }
}

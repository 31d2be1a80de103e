//! Placement order (most constrained first).
//!
//! Subjects are compared on a lexicographic key, each level breaking
//! ties of the one before:
//!
//! 1. priority, descending
//! 2. number of fixed slots, descending
//! 3. tightness `1 / (periods - min + 1)`, descending (a subject with no
//!    slack between floor and target goes first)
//! 4. periods per week, descending
//! 5. input position, ascending
//!
//! The last level makes the order total, so equal inputs always produce
//! equal timetables.
//!
//! # Reference
//! Brélaz (1979), "New methods to color the vertices of a graph"
//! (most-constrained-first selection)

use std::cmp::Ordering;

use crate::validation::NormalizedRequirement;

/// Slack between target and floor; smaller is tighter.
fn slack(req: &NormalizedRequirement) -> u32 {
    req.periods_per_week - req.min_periods_per_week.min(req.periods_per_week)
}

/// Compares two subjects; `Less` means `a` is placed first.
pub fn compare(a: &NormalizedRequirement, b: &NormalizedRequirement) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| {
            b.preferences
                .fixed_slots
                .len()
                .cmp(&a.preferences.fixed_slots.len())
        })
        // 1/(s+1) descending == s ascending
        .then_with(|| slack(a).cmp(&slack(b)))
        .then_with(|| b.periods_per_week.cmp(&a.periods_per_week))
}

/// Returns indices into `reqs` in placement order.
pub fn placement_order(reqs: &[NormalizedRequirement]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..reqs.len()).collect();
    // Stable sort keeps input position as the final tie-breaker.
    order.sort_by(|&i, &j| compare(&reqs[i], &reqs[j]));
    order
}

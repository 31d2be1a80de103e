//! Candidate enumeration and preference scoring.
//!
//! # Algorithm
//!
//! Every calendar cell is a candidate when the section cell, the teacher
//! and the room type are free there and the subject is below its daily
//! cap. Which of the remaining cells are admitted depends on the
//! [`Relaxation`] tier; each admitted cell gets an additive score and the
//! highest score wins. Cells are visited in calendar order and only a
//! strictly higher score replaces the incumbent, so ties go to the
//! earliest day, then the earliest slot.
//!
//! # Complexity
//! O(D * S * p) per call, where p = periods already placed on a day.

use super::ScoreWeights;
use crate::availability::AvailabilityTracker;
use crate::models::{Day, Slot};
use crate::validation::NormalizedRequirement;

/// Which soft constraints may be broken for a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relaxation {
    /// Admit avoided days and avoided slots.
    pub avoidance: bool,
    /// Admit cells closer than `minGapSameDay` to an existing placement.
    pub min_gap: bool,
}

impl Relaxation {
    /// Tier 1: preferences honored.
    pub const STRICT: Self = Self {
        avoidance: false,
        min_gap: false,
    };

    pub fn with_avoidance(mut self) -> Self {
        self.avoidance = true;
        self
    }

    pub fn with_min_gap(mut self) -> Self {
        self.min_gap = true;
        self
    }
}

/// A scored cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub day: Day,
    pub slot: Slot,
    pub score: i32,
    /// The cell is on an avoided day or slot.
    pub avoided: bool,
    /// The cell breaks the same-day gap.
    pub gap_violated: bool,
}

/// Scores candidate cells for one subject.
#[derive(Debug, Clone, Copy)]
pub struct CandidateScorer<'a> {
    weights: &'a ScoreWeights,
}

impl<'a> CandidateScorer<'a> {
    pub fn new(weights: &'a ScoreWeights) -> Self {
        Self { weights }
    }

    /// Evaluates one cell, or `None` when it is not admitted.
    pub fn evaluate(
        &self,
        req: &NormalizedRequirement,
        tracker: &AvailabilityTracker,
        day: Day,
        slot: Slot,
        relaxation: Relaxation,
    ) -> Option<Candidate> {
        if !tracker.is_free(
            day,
            slot,
            req.teacher_id.as_deref(),
            req.room_type.as_deref(),
        ) {
            return None;
        }

        let same_day = tracker.grid().subject_slots_on_day(&req.subject_id, day);
        if same_day.len() as u32 >= req.max_periods_per_day {
            return None;
        }

        let prefs = &req.preferences;
        let avoided = prefs.is_avoided(day, slot);
        if avoided && !relaxation.avoidance {
            return None;
        }
        let gap_violated = same_day.iter().any(|&s| !prefs.gap_ok(s, slot));
        if gap_violated && !relaxation.min_gap {
            return None;
        }

        let w = self.weights;
        let mut score = 0;

        if prefs.preferred_days.contains(&day) {
            score += w.preferred_day;
        }
        if prefs.preferred_slots.contains(&slot) {
            score += w.preferred_slot;
        }
        if prefs.avoid_days.contains(&day) {
            score -= w.avoid_day;
        } else if tracker
            .calendar()
            .neighbor_days(day)
            .any(|d| prefs.avoid_days.contains(&d))
        {
            score -= w.avoid_day_adjacent;
        }
        if prefs.avoid_slots.contains(&slot) {
            score -= w.avoid_slot;
        } else if adjacent(slot).any(|s| prefs.avoid_slots.contains(&s)) {
            score -= w.avoid_slot_adjacent;
        }
        if prefs.prefer_consecutive && adjacent(slot).any(|s| same_day.contains(&s)) {
            score += w.consecutive;
        }
        if prefs.spread_evenly {
            if same_day.is_empty() {
                score += w.spread;
            } else {
                score -= w.same_day * same_day.len() as i32;
            }
        }
        if gap_violated {
            score -= w.min_gap_violation;
        }

        Some(Candidate {
            day,
            slot,
            score,
            avoided,
            gap_violated,
        })
    }

    /// Best admitted cell of the week, if any.
    pub fn best(
        &self,
        req: &NormalizedRequirement,
        tracker: &AvailabilityTracker,
        relaxation: Relaxation,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (day, slot) in tracker.calendar().cells() {
            if let Some(candidate) = self.evaluate(req, tracker, day, slot, relaxation) {
                if best.map_or(true, |b| candidate.score > b.score) {
                    best = Some(candidate);
                }
            }
        }
        best
    }
}

fn adjacent(slot: Slot) -> impl Iterator<Item = Slot> {
    [slot.checked_sub(1), slot.checked_add(1)]
        .into_iter()
        .flatten()
}

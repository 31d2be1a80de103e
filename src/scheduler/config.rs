//! Placement tuning.

use serde::{Deserialize, Serialize};

/// Candidate score weights.
///
/// Bonuses are added, penalties subtracted; the candidate with the
/// highest total wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreWeights {
    /// Bonus for a preferred day.
    pub preferred_day: i32,
    /// Bonus for a preferred slot.
    pub preferred_slot: i32,
    /// Bonus for a slot adjacent to an existing placement (consecutive subjects only).
    pub consecutive: i32,
    /// Bonus for a day without a placement yet (spread subjects only).
    pub spread: i32,
    /// Penalty for an avoided day (relaxed placements only).
    pub avoid_day: i32,
    /// Penalty for an avoided slot (relaxed placements only).
    pub avoid_slot: i32,
    /// Penalty for a slot next to an avoided slot.
    pub avoid_slot_adjacent: i32,
    /// Penalty for a day next to an avoided day (calendar order).
    pub avoid_day_adjacent: i32,
    /// Penalty per existing placement on the same day (spread subjects only).
    pub same_day: i32,
    /// Penalty for breaking the same-day gap (relaxed placements only).
    pub min_gap_violation: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            preferred_day: 10,
            preferred_slot: 5,
            consecutive: 8,
            spread: 6,
            avoid_day: 20,
            avoid_slot: 15,
            avoid_slot_adjacent: 2,
            avoid_day_adjacent: 3,
            same_day: 4,
            min_gap_violation: 12,
        }
    }
}

/// Engine configuration.
///
/// # Example
///
/// ```
/// use u_timetable::scheduler::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_backtrack_depth(5)
///     .with_relax_min_gap(true);
/// assert_eq!(config.backtrack_depth, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Maximum number of placements displaced per backtracking attempt (K).
    pub backtrack_depth: usize,
    /// Candidate score weights.
    pub weights: ScoreWeights,
    /// Admit cells that break `minGapSameDay` when nothing else is left.
    pub relax_min_gap: bool,
    /// Admit avoided cells even after the weekly floor is met.
    pub relax_avoidance_beyond_minimum: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backtrack_depth: 3,
            weights: ScoreWeights::default(),
            relax_min_gap: false,
            relax_avoidance_beyond_minimum: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets K; 0 disables backtracking.
    pub fn with_backtrack_depth(mut self, depth: usize) -> Self {
        self.backtrack_depth = depth;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_relax_min_gap(mut self, relax: bool) -> Self {
        self.relax_min_gap = relax;
        self
    }

    pub fn with_relax_avoidance_beyond_minimum(mut self, relax: bool) -> Self {
        self.relax_avoidance_beyond_minimum = relax;
        self
    }
}

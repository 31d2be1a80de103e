//! Per-subject placement outcomes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::CellRef;
use crate::validation::NormalizedRequirement;

/// Subject lifecycle during a run.
///
/// `Pending → FixedPlaced → Filling → {Placed | Partial | Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubjectStatus {
    /// Not reached yet.
    Pending,
    /// Fixed slots processed.
    FixedPlaced,
    /// Preference-scored fill in progress.
    Filling,
    /// All periods placed, fixed slots honored.
    Placed,
    /// At least the weekly floor placed.
    Partial,
    /// Below the weekly floor.
    Failed,
}

impl SubjectStatus {
    /// Whether the subject reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Placed | Self::Partial | Self::Failed)
    }
}

/// A per-subject error. Never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubjectError {
    /// A fixed slot could not be honored.
    #[error("{subject}: fixed slot {cell} could not be honored: {reason}")]
    ConstraintConflict {
        subject: String,
        cell: CellRef,
        reason: String,
    },
    /// The subject cannot reach its weekly floor.
    #[error("{subject}: placed {placed} of {periods} periods (minimum {minimum}): {reason}")]
    Infeasible {
        subject: String,
        placed: u32,
        periods: u32,
        minimum: u32,
        reason: String,
    },
    /// The run was cancelled before the subject was placed.
    #[error("{subject}: run cancelled")]
    Cancelled { subject: String },
}

/// Soft preferences a subject had to give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoftViolationKind {
    /// Periods placed on avoided days or slots.
    AvoidanceRelaxed,
    /// Same-day periods closer than the minimum gap.
    GapRelaxed,
    /// Periods placed off the preferred days.
    PreferredDayMissed,
}

/// One kind of soft violation and how many periods it affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftViolation {
    pub kind: SoftViolationKind,
    pub count: u32,
}

/// Result of placing one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectOutcome {
    pub subject_id: String,
    /// Name for diagnostics.
    pub label: String,
    pub status: SubjectStatus,
    pub periods_per_week: u32,
    pub min_periods_per_week: u32,
    /// Periods in the final grid, fixed included.
    pub placed: u32,
    /// Fixed slots held in the final grid.
    pub fixed_honored: u32,
    /// Fixed slots that could not be reserved.
    pub fixed_conflicts: Vec<CellRef>,
    pub errors: Vec<SubjectError>,
    pub soft_violations: Vec<SoftViolation>,
    /// Bounded backtracking was attempted for this subject.
    pub backtracked: bool,
    /// Periods of this subject displaced by another subject's backtracking.
    pub displaced: u32,
}

impl SubjectOutcome {
    /// A pending outcome for a requirement.
    pub fn new(req: &NormalizedRequirement) -> Self {
        Self {
            subject_id: req.subject_id.clone(),
            label: req.display(),
            status: SubjectStatus::Pending,
            periods_per_week: req.periods_per_week,
            min_periods_per_week: req.min_periods_per_week,
            placed: 0,
            fixed_honored: 0,
            fixed_conflicts: Vec::new(),
            errors: Vec::new(),
            soft_violations: Vec::new(),
            backtracked: false,
            displaced: 0,
        }
    }

    /// Periods placed by the fill phase.
    pub fn fill_placed(&self) -> u32 {
        self.placed.saturating_sub(self.fixed_honored)
    }

    /// Fill periods still missing; fixed conflicts are not counted.
    pub fn fill_shortfall(&self, req: &NormalizedRequirement) -> u32 {
        req.fill_target().saturating_sub(self.fill_placed())
    }

    /// Periods missing against the weekly target.
    pub fn shortfall(&self) -> u32 {
        self.periods_per_week.saturating_sub(self.placed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, SubjectError::Cancelled { .. }))
    }

    pub fn has_infeasible(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, SubjectError::Infeasible { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SubjectRequirement, WorkingCalendar};
    use crate::validation::normalize_requirement;

    #[test]
    fn test_shortfall_excludes_fixed_conflicts() {
        let cal = WorkingCalendar::weekdays(6).unwrap();
        let req = normalize_requirement(
            &SubjectRequirement::new("math", 4).with_preferences(
                crate::models::SchedulingPreferences::new()
                    .with_fixed_slot(1, 1)
                    .with_fixed_slot(2, 1),
            ),
            &cal,
        )
        .unwrap();

        let mut outcome = SubjectOutcome::new(&req);
        outcome.fixed_honored = 1;
        outcome.fixed_conflicts.push(CellRef::new(2, 1));
        outcome.placed = 3;

        assert_eq!(outcome.fill_placed(), 2);
        assert_eq!(outcome.fill_shortfall(&req), 0);
        assert_eq!(outcome.shortfall(), 1);
    }

    #[test]
    fn test_error_messages() {
        let err = SubjectError::ConstraintConflict {
            subject: "Physics (phy)".into(),
            cell: CellRef::new(1, 1),
            reason: "teacher T1 is busy".into(),
        };
        assert_eq!(
            err.to_string(),
            "Physics (phy): fixed slot Monday slot 1 could not be honored: teacher T1 is busy"
        );
        assert!(SubjectStatus::Partial.is_terminal());
        assert!(!SubjectStatus::Filling.is_terminal());
    }
}

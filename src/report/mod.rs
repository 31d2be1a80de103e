//! Result aggregation and persistence hand-off.
//!
//! Folds per-subject outcomes into the host-facing [`GenerationResult`]
//! and structured [`Diagnostic`]s, and hands the grid to the host's
//! [`TimetableSink`].
//!
//! # Rendering
//!
//! | Outcome | errors[] | warnings[] |
//! |---------|----------|------------|
//! | Fixed slot refused | one per slot | |
//! | FAILED with a fill shortfall | one | |
//! | Cancelled | one | |
//! | PARTIAL | | one |
//! | Soft preference given up | | one per kind |

mod kpi;

pub use kpi::TimetableKpi;

use serde::{Deserialize, Serialize};

use crate::models::{GenerateTimetableRequest, Grid};
use crate::scheduler::{SoftViolationKind, SubjectError, SubjectOutcome, SubjectStatus};

/// The only state that outlives a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Every subject is PLACED.
    pub success: bool,
    /// Placed cells in the section grid.
    pub slots_created: u32,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Diagnostic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A fixed slot could not be honored.
    ConstraintConflict,
    /// A subject stayed below its weekly floor.
    Infeasible,
    /// The run was cancelled before the subject was placed.
    Cancelled,
    /// A subject met its floor but not its target.
    PartialPlacement,
    /// Avoided cells or a tighter gap were accepted.
    PreferenceRelaxed,
    /// Periods landed off the preferred days.
    PreferenceMissed,
}

impl DiagnosticKind {
    /// Whether diagnostics of this kind render into `errors`.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::ConstraintConflict | Self::Infeasible | Self::Cancelled
        )
    }

    /// Severity (0-100, higher = worse).
    pub fn severity(&self) -> i32 {
        match self {
            Self::ConstraintConflict => 90,
            Self::Infeasible => 80,
            Self::Cancelled => 70,
            Self::PartialPlacement => 50,
            Self::PreferenceRelaxed => 30,
            Self::PreferenceMissed => 20,
        }
    }
}

/// A structured diagnostic behind one `errors`/`warnings` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub subject_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        subject_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject_id: subject_id.into(),
            message: message.into(),
            severity: kind.severity(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind.is_error()
    }
}

/// Everything a run produced: the host result plus its side channels.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub request: GenerateTimetableRequest,
    pub result: GenerationResult,
    /// Final section grid.
    pub grid: Grid,
    /// Per-subject outcomes, in input order.
    pub outcomes: Vec<SubjectOutcome>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    pub fn outcome(&self, subject_id: &str) -> Option<&SubjectOutcome> {
        self.outcomes.iter().find(|o| o.subject_id == subject_id)
    }

    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

/// Persistence collaborator owned by the host.
///
/// Receives the grid keyed by section and session; `Grid::entries`
/// yields the `(day, slot, subject, teacher, room)` rows.
pub trait TimetableSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn persist(
        &mut self,
        request: &GenerateTimetableRequest,
        grid: &Grid,
    ) -> Result<(), Self::Error>;
}

/// Aggregates outcomes into results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultReporter;

impl ResultReporter {
    pub fn new() -> Self {
        Self
    }

    /// Structured diagnostics, in outcome order.
    pub fn diagnostics(&self, outcomes: &[SubjectOutcome]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for outcome in outcomes {
            let id = &outcome.subject_id;
            for err in &outcome.errors {
                let kind = match err {
                    SubjectError::ConstraintConflict { .. } => DiagnosticKind::ConstraintConflict,
                    SubjectError::Infeasible { .. } => DiagnosticKind::Infeasible,
                    SubjectError::Cancelled { .. } => DiagnosticKind::Cancelled,
                };
                diagnostics.push(Diagnostic::new(kind, id, err.to_string()));
            }

            if outcome.status == SubjectStatus::Partial {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::PartialPlacement,
                    id,
                    format!(
                        "{}: placed {} of {} periods (minimum {})",
                        outcome.label,
                        outcome.placed,
                        outcome.periods_per_week,
                        outcome.min_periods_per_week
                    ),
                ));
            }

            for violation in &outcome.soft_violations {
                let (kind, what) = match violation.kind {
                    SoftViolationKind::AvoidanceRelaxed => (
                        DiagnosticKind::PreferenceRelaxed,
                        "placed on avoided days or slots",
                    ),
                    SoftViolationKind::GapRelaxed => (
                        DiagnosticKind::PreferenceRelaxed,
                        "placed closer than the minimum same-day gap",
                    ),
                    SoftViolationKind::PreferredDayMissed => (
                        DiagnosticKind::PreferenceMissed,
                        "placed outside the preferred days",
                    ),
                };
                diagnostics.push(Diagnostic::new(
                    kind,
                    id,
                    format!("{}: {} period(s) {what}", outcome.label, violation.count),
                ));
            }
        }
        diagnostics
    }

    /// Host-facing result from outcomes and their diagnostics.
    pub fn summarize(
        &self,
        grid: &Grid,
        outcomes: &[SubjectOutcome],
        diagnostics: &[Diagnostic],
    ) -> GenerationResult {
        let (errors, warnings): (Vec<&Diagnostic>, Vec<&Diagnostic>) =
            diagnostics.iter().partition(|d| d.is_error());

        GenerationResult {
            success: outcomes.iter().all(|o| o.status == SubjectStatus::Placed),
            slots_created: grid.placed_count() as u32,
            warnings: warnings.into_iter().map(|d| d.message.clone()).collect(),
            errors: errors.into_iter().map(|d| d.message.clone()).collect(),
        }
    }

    /// Builds the full report of a run.
    pub fn report(
        &self,
        request: GenerateTimetableRequest,
        grid: Grid,
        outcomes: Vec<SubjectOutcome>,
    ) -> GenerationReport {
        let diagnostics = self.diagnostics(&outcomes);
        let result = self.summarize(&grid, &outcomes, &diagnostics);
        GenerationReport {
            request,
            result,
            grid,
            outcomes,
            diagnostics,
        }
    }

    /// Hands the grid to the sink when at least one period was placed.
    ///
    /// # Returns
    /// Whether the sink was called.
    pub fn publish<S: TimetableSink + ?Sized>(
        &self,
        report: &GenerationReport,
        sink: &mut S,
    ) -> Result<bool, S::Error> {
        if report.result.slots_created == 0 {
            return Ok(false);
        }
        sink.persist(&report.request, &report.grid)?;
        Ok(true)
    }
}

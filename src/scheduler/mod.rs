//! Placement scheduling and tuning.
//!
//! Places one section's subjects into its weekly grid: fixed slots first
//! as hard commitments, then a preference-scored greedy fill with bounded
//! backtracking.
//!
//! # Algorithm
//!
//! `PlacementScheduler` is a greedy constructive heuristic over a
//! most-constrained-first ordering. It does not search for a global
//! optimum; it produces a deterministic, conflict-free grid and reports
//! what it could not place.
//!
//! # Tuning
//!
//! `EngineConfig` holds the backtracking depth K, the `ScoreWeights`
//! and the relaxation toggles.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod cancel;
mod config;
pub mod ordering;
mod outcome;
mod placement;
pub mod scoring;

pub use cancel::CancellationToken;
pub use config::{EngineConfig, ScoreWeights};
pub use ordering::placement_order;
pub use outcome::{SoftViolation, SoftViolationKind, SubjectError, SubjectOutcome, SubjectStatus};
pub use placement::PlacementScheduler;
pub use scoring::{Candidate, CandidateScorer, Relaxation};

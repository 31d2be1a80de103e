//! Timetable generation engine for school management systems.
//!
//! Given a class section's subject load (periods per week, teacher and
//! room requirements, day/slot preferences, fixed slots) and a working
//! calendar, produces a conflict-free weekly period grid plus
//! diagnostics for whatever could not be placed.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `WorkingCalendar`, `SubjectRequirement`,
//!   `SchedulingPreferences`, `Grid`, `GenerateTimetableRequest`
//! - **`validation`**: Constraint normalization and field-level validation
//! - **`availability`**: Section grid plus shared teacher/room bookings
//! - **`scheduler`**: Most-constrained-first ordering, preference-scored
//!   placement, bounded backtracking
//! - **`conflict`**: Conflict classification, remedies, final status
//! - **`report`**: `GenerationResult`, diagnostics, KPIs, persistence hand-off
//! - **`engine`**: Run state machine and concurrent section generation
//! - **`verify`**: Post-run invariant checks
//!
//! # Architecture
//!
//! The engine consumes academic configuration already loaded by the host
//! and returns a grid; tenant routing, CRUD and persistence stay with the
//! host behind [`report::TimetableSink`].
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6 (CSP)

pub mod availability;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod scheduler;
pub mod validation;
pub mod verify;

pub use engine::{GenerationRun, RunPhase, SectionJob, TimetableEngine};
pub use error::EngineError;
pub use report::{GenerationReport, GenerationResult};
pub use scheduler::{CancellationToken, EngineConfig};

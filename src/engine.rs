//! Timetable generation engine.
//!
//! Wires the pipeline together for one section:
//!
//! ```text
//! Init → Normalizing → Solving → Finalizing → Done
//!             └──────→ Aborted (validation errors, nothing placed)
//! ```
//!
//! Several sections can be generated concurrently against the same
//! [`SharedResources`]; each run owns its section grid and only the
//! teacher and room bookings are shared.
//!
//! # Determinism
//!
//! A single run is deterministic for a given input and shared state.
//! Concurrent runs that share teachers or rooms see each other's
//! bookings in whatever order the threads reach them.

use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::availability::{AvailabilityTracker, SharedResources};
use crate::error::EngineError;
use crate::models::{GenerateTimetableRequest, GenerationInput, SubjectRequirement};
use crate::report::{GenerationReport, ResultReporter, TimetableSink};
use crate::scheduler::{CancellationToken, EngineConfig, PlacementScheduler, SubjectOutcome};
use crate::validation::{normalize_all, NormalizedRequirement};

/// Phase of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    Init,
    Normalizing,
    Solving,
    Finalizing,
    Done,
    /// Rejected before solving.
    Aborted,
}

/// Ephemeral state of one invocation.
#[derive(Debug)]
pub struct GenerationRun {
    request: GenerateTimetableRequest,
    phase: RunPhase,
    reqs: Vec<NormalizedRequirement>,
    tracker: AvailabilityTracker,
    outcomes: Vec<SubjectOutcome>,
}

impl GenerationRun {
    /// Starts a run for a request.
    pub fn new(
        request: GenerateTimetableRequest,
        input: &GenerationInput,
        shared: Arc<SharedResources>,
    ) -> Self {
        let tracker =
            AvailabilityTracker::new(request.section_id.clone(), input.calendar.clone(), shared);
        Self {
            request,
            phase: RunPhase::Init,
            reqs: Vec::new(),
            tracker,
            outcomes: Vec::new(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn request(&self) -> &GenerateTimetableRequest {
        &self.request
    }

    /// Normalized requirements, once normalization succeeded.
    pub fn requirements(&self) -> &[NormalizedRequirement] {
        &self.reqs
    }

    fn enter(&mut self, next: RunPhase) {
        info!(
            section_id = %self.request.section_id,
            session_id = %self.request.session_id,
            from = ?self.phase,
            to = ?next,
            "Run phase"
        );
        self.phase = next;
    }

    /// Validates every subject; any error aborts the run.
    pub fn normalize(&mut self, subjects: &[SubjectRequirement]) -> Result<(), EngineError> {
        self.enter(RunPhase::Normalizing);
        match normalize_all(subjects, self.tracker.calendar()) {
            Ok(reqs) => {
                self.reqs = reqs;
                Ok(())
            }
            Err(errors) => {
                warn!(
                    section_id = %self.request.section_id,
                    errors = errors.len(),
                    "Request rejected"
                );
                self.enter(RunPhase::Aborted);
                Err(EngineError::Validation(errors))
            }
        }
    }

    /// Replaces the section's previous bookings with a fresh placement.
    pub fn solve(&mut self, scheduler: &PlacementScheduler, cancel: &CancellationToken) {
        self.enter(RunPhase::Solving);
        let released = self
            .tracker
            .shared()
            .release_section(&self.request.section_id);
        if released > 0 {
            info!(section_id = %self.request.section_id, released, "Released previous bookings");
        }
        self.outcomes = scheduler.schedule(&self.reqs, &mut self.tracker, cancel);
    }

    /// Aggregates the outcomes into a report.
    pub fn finish(mut self, reporter: &ResultReporter) -> GenerationReport {
        self.enter(RunPhase::Finalizing);
        let report = reporter.report(
            self.request.clone(),
            self.tracker.grid().clone(),
            std::mem::take(&mut self.outcomes),
        );
        self.enter(RunPhase::Done);
        info!(
            section_id = %self.request.section_id,
            success = report.result.success,
            slots_created = report.result.slots_created,
            warnings = report.result.warnings.len(),
            errors = report.result.errors.len(),
            "Run finished"
        );
        report
    }
}

/// One section to generate.
#[derive(Debug, Clone)]
pub struct SectionJob {
    pub request: GenerateTimetableRequest,
    pub input: GenerationInput,
}

impl SectionJob {
    pub fn new(request: GenerateTimetableRequest, input: GenerationInput) -> Self {
        Self { request, input }
    }
}

/// Entry point for timetable generation.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use u_timetable::availability::SharedResources;
/// use u_timetable::engine::TimetableEngine;
/// use u_timetable::models::{
///     GenerateTimetableRequest, GenerationInput, SubjectRequirement, WorkingCalendar,
/// };
///
/// let engine = TimetableEngine::new(Arc::new(SharedResources::new()));
/// let input = GenerationInput::new(WorkingCalendar::six_day_week(8).unwrap())
///     .with_subject(SubjectRequirement::new("math", 5).with_max_per_day(1));
///
/// let report = engine
///     .generate(&GenerateTimetableRequest::new("7A", "2025-26"), &input)
///     .unwrap();
/// assert!(report.result.success);
/// assert_eq!(report.result.slots_created, 5);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableEngine {
    scheduler: PlacementScheduler,
    reporter: ResultReporter,
    shared: Arc<SharedResources>,
}

impl TimetableEngine {
    /// Creates an engine with the default configuration.
    pub fn new(shared: Arc<SharedResources>) -> Self {
        Self {
            scheduler: PlacementScheduler::default(),
            reporter: ResultReporter::new(),
            shared,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.scheduler = PlacementScheduler::new(config);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        self.scheduler.config()
    }

    pub fn shared(&self) -> &Arc<SharedResources> {
        &self.shared
    }

    /// Generates one section's timetable.
    ///
    /// # Errors
    /// [`EngineError::Validation`] when any subject fails validation.
    pub fn generate(
        &self,
        request: &GenerateTimetableRequest,
        input: &GenerationInput,
    ) -> Result<GenerationReport, EngineError> {
        self.generate_with_cancel(request, input, &CancellationToken::new())
    }

    /// Generates one section's timetable, stopping at the next subject
    /// once `cancel` is set.
    pub fn generate_with_cancel(
        &self,
        request: &GenerateTimetableRequest,
        input: &GenerationInput,
        cancel: &CancellationToken,
    ) -> Result<GenerationReport, EngineError> {
        info!(
            section_id = %request.section_id,
            session_id = %request.session_id,
            subjects = input.subjects.len(),
            "Generating timetable"
        );
        let mut run = GenerationRun::new(request.clone(), input, Arc::clone(&self.shared));
        run.normalize(&input.subjects)?;
        run.solve(&self.scheduler, cancel);
        Ok(run.finish(&self.reporter))
    }

    /// Generates a timetable and hands it to the sink.
    ///
    /// The sink is skipped when nothing was placed.
    ///
    /// # Errors
    /// [`EngineError::Validation`], or [`EngineError::Persistence`] when
    /// the sink fails.
    pub fn generate_and_persist<S: TimetableSink + ?Sized>(
        &self,
        request: &GenerateTimetableRequest,
        input: &GenerationInput,
        sink: &mut S,
    ) -> Result<GenerationReport, EngineError> {
        let report = self.generate(request, input)?;
        match self.reporter.publish(&report, sink) {
            Ok(true) => info!(section_id = %request.section_id, "Timetable persisted"),
            Ok(false) => info!(section_id = %request.section_id, "Nothing placed, not persisting"),
            Err(err) => {
                error!(
                    section_id = %request.section_id,
                    result = ?report.result,
                    error = %err,
                    "Persisting timetable failed"
                );
                return Err(EngineError::Persistence {
                    section_id: request.section_id.clone(),
                    source: Box::new(err),
                });
            }
        }
        Ok(report)
    }

    /// Generates several sections concurrently, one thread each.
    ///
    /// # Returns
    /// One result per job, in job order.
    pub fn generate_sections(
        &self,
        jobs: &[SectionJob],
        cancel: &CancellationToken,
    ) -> Vec<Result<GenerationReport, EngineError>> {
        info!(sections = jobs.len(), "Generating sections concurrently");
        thread::scope(|scope| {
            let handles: Vec<_> = jobs
                .iter()
                .map(|job| {
                    scope.spawn(move || self.generate_with_cancel(&job.request, &job.input, cancel))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }
}

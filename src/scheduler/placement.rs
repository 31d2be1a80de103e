//! Placement scheduler.
//!
//! # Algorithm
//!
//! 1. Order subjects most-constrained first (see [`placement_order`]).
//! 2. Per subject, reserve every fixed slot. A refused fixed slot is a
//!    hard conflict for that subject; it is never retried or relocated.
//! 3. Fill the remaining `periods - |fixed|` periods greedily, each time
//!    reserving the best-scored admissible cell. Tier 1 keeps avoided
//!    cells out; tier 2 admits them while the subject is below its
//!    weekly floor (or always, when configured); tier 3 breaks the
//!    same-day gap, when configured.
//! 4. Below the floor with the week exhausted, displace up to K recent
//!    fill placements of subjects with no higher priority that stay at or
//!    above their own floor without them, and retry once
//!    up to the floor. On success the displaced subjects re-fill first,
//!    then the subject tops up. A retry that does not reach the floor is
//!    undone and the displaced placements are restored.
//! 5. Derive every subject's final status from the grid.
//!
//! Every reservation is pushed on an undo stack, so backtracking never
//! recurses and its cost is bounded by K.
//!
//! # Complexity
//! O(n * p * D * S) where n = subjects, p = periods per subject,
//! D * S = cells of the week.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", §3 (direct heuristics)

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::ordering::placement_order;
use super::scoring::{Candidate, CandidateScorer, Relaxation};
use super::{
    CancellationToken, EngineConfig, SoftViolation, SoftViolationKind, SubjectError,
    SubjectOutcome, SubjectStatus,
};
use crate::availability::{AvailabilityTracker, Reservation};
use crate::conflict::{ConflictResolver, Remedy};
use crate::models::Grid;
use crate::validation::NormalizedRequirement;

/// Greedy, preference-scored scheduler with bounded backtracking.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use u_timetable::availability::{AvailabilityTracker, SharedResources};
/// use u_timetable::models::{SubjectRequirement, WorkingCalendar};
/// use u_timetable::scheduler::{CancellationToken, PlacementScheduler, SubjectStatus};
/// use u_timetable::validation::normalize_all;
///
/// let calendar = WorkingCalendar::weekdays(6).unwrap();
/// let subjects = vec![SubjectRequirement::new("math", 5).with_max_per_day(1)];
/// let reqs = normalize_all(&subjects, &calendar).unwrap();
///
/// let mut tracker = AvailabilityTracker::new("7A", calendar, Arc::new(SharedResources::new()));
/// let outcomes = PlacementScheduler::default().schedule(&reqs, &mut tracker, &CancellationToken::new());
///
/// assert_eq!(outcomes[0].status, SubjectStatus::Placed);
/// assert_eq!(tracker.grid().days_used_by("math"), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlacementScheduler {
    config: EngineConfig,
}

impl PlacementScheduler {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Places every requirement into the tracker's section grid.
    ///
    /// # Returns
    /// One outcome per requirement, in input order.
    pub fn schedule(
        &self,
        reqs: &[NormalizedRequirement],
        tracker: &mut AvailabilityTracker,
        cancel: &CancellationToken,
    ) -> Vec<SubjectOutcome> {
        let mut run = SolveState {
            reqs,
            tracker,
            config: &self.config,
            scorer: CandidateScorer::new(&self.config.weights),
            resolver: ConflictResolver::new(self.config.backtrack_depth),
            outcomes: reqs.iter().map(SubjectOutcome::new).collect(),
            undo: Vec::new(),
        };

        let order = placement_order(reqs);
        for (pos, &idx) in order.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(
                    section_id = %run.tracker.section_id(),
                    remaining = order.len() - pos,
                    "Run cancelled"
                );
                for &rest in &order[pos..] {
                    run.cancel_subject(rest);
                }
                break;
            }
            run.place_subject(idx);
        }

        run.finalize();
        run.outcomes
    }
}

/// One reservation made during the run.
#[derive(Debug, Clone)]
struct UndoEntry {
    subject: usize,
    token: Reservation,
    fixed: bool,
}

struct SolveState<'a> {
    reqs: &'a [NormalizedRequirement],
    tracker: &'a mut AvailabilityTracker,
    config: &'a EngineConfig,
    scorer: CandidateScorer<'a>,
    resolver: ConflictResolver,
    outcomes: Vec<SubjectOutcome>,
    undo: Vec<UndoEntry>,
}

impl SolveState<'_> {
    fn place_subject(&mut self, idx: usize) {
        let reqs = self.reqs;
        let req = &reqs[idx];
        let capacity = self.tracker.calendar().capacity() as u32;

        if req.periods_per_week > capacity {
            warn!(
                subject_id = %req.subject_id,
                periods = req.periods_per_week,
                capacity,
                "Subject cannot fit the week"
            );
            let outcome = &mut self.outcomes[idx];
            outcome.status = SubjectStatus::Failed;
            outcome.errors.push(SubjectError::Infeasible {
                subject: req.display(),
                placed: 0,
                periods: req.periods_per_week,
                minimum: req.min_periods_per_week,
                reason: format!("the week only has {capacity} periods"),
            });
            return;
        }

        self.place_fixed(idx);
        self.outcomes[idx].status = SubjectStatus::FixedPlaced;

        self.outcomes[idx].status = SubjectStatus::Filling;
        let target = req.fill_target();
        let mut filled = self.fill(idx, target);

        if filled < target {
            let placed = self.placed_of(idx);
            if let Some(Remedy::Backtrack) =
                self.resolver
                    .on_exhausted(placed, req.min_periods_per_week, false)
            {
                filled += self.backtrack(idx, target - filled);
                if filled < target {
                    filled += self.fill(idx, target - filled);
                }
            }

            let placed = self.placed_of(idx);
            match self
                .resolver
                .on_exhausted(placed, req.min_periods_per_week, true)
            {
                Some(Remedy::Downgrade) => warn!(
                    subject_id = %req.subject_id,
                    placed,
                    minimum = req.min_periods_per_week,
                    "Subject below its weekly floor"
                ),
                _ => debug!(
                    subject_id = %req.subject_id,
                    filled,
                    target,
                    "Week exhausted above the floor"
                ),
            }
        }

        let outcome = &self.outcomes[idx];
        let status = self.resolver.outcome_status(
            self.placed_of(idx),
            req.min_periods_per_week,
            req.periods_per_week,
            outcome.fixed_conflicts.len(),
        );
        self.outcomes[idx].status = status;
        debug!(subject_id = %req.subject_id, ?status, "Subject scheduled");
    }

    fn place_fixed(&mut self, idx: usize) {
        let reqs = self.reqs;
        let req = &reqs[idx];

        for &cell in &req.preferences.fixed_slots {
            match self.tracker.reserve(
                cell.day,
                cell.slot,
                &req.subject_id,
                req.teacher_id.as_deref(),
                req.room_type.as_deref(),
            ) {
                Ok(token) => {
                    debug!(subject_id = %req.subject_id, day = cell.day, slot = cell.slot, "Fixed slot placed");
                    self.undo.push(UndoEntry {
                        subject: idx,
                        token,
                        fixed: true,
                    });
                }
                Err(err) => {
                    if self.resolver.on_clash(&err, true) != Remedy::HardError {
                        continue;
                    }
                    let reason = self.resolver.describe(&err);
                    warn!(
                        subject_id = %req.subject_id,
                        day = cell.day,
                        slot = cell.slot,
                        kind = ?self.resolver.classify(&err),
                        %reason,
                        "Fixed slot conflict"
                    );
                    let outcome = &mut self.outcomes[idx];
                    outcome.fixed_conflicts.push(cell);
                    outcome.errors.push(SubjectError::ConstraintConflict {
                        subject: req.display(),
                        cell,
                        reason,
                    });
                }
            }
        }
    }

    /// Places up to `budget` periods; returns how many landed.
    fn fill(&mut self, idx: usize, budget: u32) -> u32 {
        let reqs = self.reqs;
        let req = &reqs[idx];
        let mut placed = 0;
        let mut retries = self.tracker.calendar().capacity();

        while placed < budget {
            let Some(candidate) = self.next_candidate(req) else {
                break;
            };
            match self.tracker.reserve(
                candidate.day,
                candidate.slot,
                &req.subject_id,
                req.teacher_id.as_deref(),
                req.room_type.as_deref(),
            ) {
                Ok(token) => {
                    debug!(
                        subject_id = %req.subject_id,
                        day = candidate.day,
                        slot = candidate.slot,
                        score = candidate.score,
                        avoided = candidate.avoided,
                        gap_violated = candidate.gap_violated,
                        "Period placed"
                    );
                    self.undo.push(UndoEntry {
                        subject: idx,
                        token,
                        fixed: false,
                    });
                    placed += 1;
                }
                Err(err) => match self.resolver.on_clash(&err, false) {
                    Remedy::NextCandidate if retries > 0 => {
                        retries -= 1;
                        debug!(subject_id = %req.subject_id, reason = %err, "Candidate taken, trying next");
                    }
                    _ => break,
                },
            }
        }
        placed
    }

    /// Best cell over the relaxation tiers the subject may use right now.
    fn next_candidate(&self, req: &NormalizedRequirement) -> Option<Candidate> {
        let mut relaxation = Relaxation::STRICT;
        if let Some(candidate) = self.scorer.best(req, self.tracker, relaxation) {
            return Some(candidate);
        }

        let below_floor = self.placed_of_req(req) < req.min_periods_per_week;
        if below_floor || self.config.relax_avoidance_beyond_minimum {
            relaxation = relaxation.with_avoidance();
            if let Some(candidate) = self.scorer.best(req, self.tracker, relaxation) {
                return Some(candidate);
            }
        }

        if self.config.relax_min_gap {
            return self
                .scorer
                .best(req, self.tracker, relaxation.with_min_gap());
        }
        None
    }

    /// Displaces recent placements and retries the subject once.
    ///
    /// Returns the number of periods the retry added.
    fn backtrack(&mut self, idx: usize, missing: u32) -> u32 {
        let reqs = self.reqs;
        let req = &reqs[idx];
        self.outcomes[idx].backtracked = true;

        let depth = self.config.backtrack_depth;
        let mut picked = Vec::with_capacity(depth);
        // Periods each victim keeps; a victim never drops below its own floor.
        let mut kept: BTreeMap<usize, u32> = BTreeMap::new();
        for (pos, entry) in self.undo.iter().enumerate().rev() {
            if picked.len() == depth {
                break;
            }
            let victim = &reqs[entry.subject];
            if entry.fixed || entry.subject == idx || victim.priority() > req.priority() {
                continue;
            }
            let left = kept
                .entry(entry.subject)
                .or_insert_with(|| self.placed_of_req(victim));
            if *left <= victim.min_periods_per_week {
                continue;
            }
            *left -= 1;
            picked.push(pos);
        }
        if picked.is_empty() {
            debug!(subject_id = %req.subject_id, "No placement can be displaced");
            return 0;
        }

        // Positions are descending, so earlier removals keep later ones valid.
        let mut victims = Vec::with_capacity(picked.len());
        for pos in picked {
            let entry = self.undo.remove(pos);
            self.tracker
                .release(entry.token.cell.day, entry.token.cell.slot);
            victims.push(entry);
        }
        info!(
            subject_id = %req.subject_id,
            displaced = victims.len(),
            missing,
            "Backtracking"
        );

        // The retry only claims what the floor needs; displaced subjects
        // re-fill before the subject tops up.
        let floor_gap = req
            .min_periods_per_week
            .saturating_sub(self.placed_of(idx));
        let mark = self.undo.len();
        let gained = self.fill(idx, missing.min(floor_gap));

        if self.placed_of(idx) >= req.min_periods_per_week {
            let mut lost: BTreeMap<usize, u32> = BTreeMap::new();
            for victim in &victims {
                *lost.entry(victim.subject).or_insert(0) += 1;
            }
            self.refill(lost);
            return gained;
        }

        debug!(subject_id = %req.subject_id, gained, "Retry missed the floor, restoring");
        let retry = self.undo.split_off(mark);
        for entry in retry.into_iter().rev() {
            self.tracker
                .release(entry.token.cell.day, entry.token.cell.slot);
        }

        let mut lost: BTreeMap<usize, u32> = BTreeMap::new();
        for victim in victims.into_iter().rev() {
            match self.tracker.restore(&victim.token) {
                Ok(token) => self.undo.push(UndoEntry { token, ..victim }),
                Err(err) => {
                    warn!(subject_id = %victim.token.subject_id, reason = %err, "Displaced period not restored");
                    *lost.entry(victim.subject).or_insert(0) += 1;
                }
            }
        }
        self.refill(lost);
        0
    }

    /// Re-places periods lost by displaced subjects.
    fn refill(&mut self, lost: BTreeMap<usize, u32>) {
        for (subject, count) in lost {
            let regained = self.fill(subject, count);
            let missing = count - regained;
            if missing > 0 {
                warn!(
                    subject_id = %self.reqs[subject].subject_id,
                    missing,
                    "Displaced periods could not be re-placed"
                );
            }
            self.outcomes[subject].displaced += missing;
        }
    }

    fn cancel_subject(&mut self, idx: usize) {
        let outcome = &mut self.outcomes[idx];
        outcome.status = SubjectStatus::Failed;
        outcome.errors.push(SubjectError::Cancelled {
            subject: outcome.label.clone(),
        });
    }

    /// Derives every final status from the grid.
    fn finalize(&mut self) {
        let reqs = self.reqs;
        for (idx, req) in reqs.iter().enumerate() {
            let grid = self.tracker.grid();
            let outcome = &mut self.outcomes[idx];

            outcome.placed = grid.count_for_subject(&req.subject_id) as u32;
            outcome.fixed_honored = req
                .preferences
                .fixed_slots
                .iter()
                .filter(|cell| grid.holds(cell.day, cell.slot, &req.subject_id))
                .count() as u32;
            outcome.soft_violations = soft_violations(req, grid);

            if outcome.is_cancelled() || outcome.has_infeasible() {
                outcome.status = SubjectStatus::Failed;
                continue;
            }

            outcome.status = self.resolver.outcome_status(
                outcome.placed,
                req.min_periods_per_week,
                req.periods_per_week,
                outcome.fixed_conflicts.len(),
            );

            if outcome.status == SubjectStatus::Failed && outcome.fill_shortfall(req) > 0 {
                let reason = self.resolver.explain_shortfall(req, self.tracker);
                outcome.errors.push(SubjectError::Infeasible {
                    subject: req.display(),
                    placed: outcome.placed,
                    periods: req.periods_per_week,
                    minimum: req.min_periods_per_week,
                    reason,
                });
            }
        }
    }

    fn placed_of(&self, idx: usize) -> u32 {
        self.placed_of_req(&self.reqs[idx])
    }

    fn placed_of_req(&self, req: &NormalizedRequirement) -> u32 {
        self.tracker.grid().count_for_subject(&req.subject_id) as u32
    }
}

/// Soft preferences given up by a subject's non-fixed periods.
fn soft_violations(req: &NormalizedRequirement, grid: &Grid) -> Vec<SoftViolation> {
    let prefs = &req.preferences;
    let mut avoided = 0;
    let mut gap = 0;
    let mut missed = 0;

    for &day in grid.calendar().days() {
        let slots = grid.subject_slots_on_day(&req.subject_id, day);
        for (i, &slot) in slots.iter().enumerate() {
            if prefs.is_fixed(day, slot) {
                continue;
            }
            if prefs.is_avoided(day, slot) {
                avoided += 1;
            }
            if slots[..i].iter().any(|&s| !prefs.gap_ok(s, slot)) {
                gap += 1;
            }
            if !prefs.preferred_days.is_empty() && !prefs.preferred_days.contains(&day) {
                missed += 1;
            }
        }
    }

    [
        (SoftViolationKind::AvoidanceRelaxed, avoided),
        (SoftViolationKind::GapRelaxed, gap),
        (SoftViolationKind::PreferredDayMissed, missed),
    ]
    .into_iter()
    .filter(|&(_, count)| count > 0)
    .map(|(kind, count)| SoftViolation { kind, count })
    .collect()
}

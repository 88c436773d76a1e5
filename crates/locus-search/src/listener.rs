//! Search listeners.
//!
//! Listeners observe a search's lifecycle: run start and stop, status
//! transitions, completed steps, and new current/best solutions. Callbacks
//! are invoked synchronously on the search thread, in registration order;
//! they must not mutate the search except through its public control
//! surface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use locus_core::{Evaluation, Result, Solution, Validation};
use tracing::debug;

use crate::algorithm::SearchDescriptor;
use crate::status::SearchStatus;

/// Observer of search lifecycle events. All hooks default to no-ops.
pub trait SearchListener<S: Solution>: Send + Sync {
    /// Called when a run starts.
    fn search_started(&self, _name: &str) {}

    /// Called when a run has wound down.
    fn search_stopped(&self, _name: &str, _steps: u64, _runtime: Duration) {}

    /// Called whenever the best-ever solution improves.
    fn new_best_solution(
        &self,
        _solution: &S,
        _evaluation: &dyn Evaluation,
        _validation: &dyn Validation,
    ) {
    }

    /// Called whenever a local search adopts a new current solution.
    /// Never fired by searches that do not track a current solution.
    fn new_current_solution(&self, _solution: &S, _evaluation: &dyn Evaluation) {}

    /// Called after every completed step.
    fn step_completed(&self, _step: u64) {}

    /// Called on every status transition.
    fn status_changed(&self, _status: SearchStatus) {}

    /// Checks whether this listener can observe the described search.
    ///
    /// Implementations that require a capability the search lacks (e.g.
    /// current-solution tracking) return
    /// [`LocusError::IncompatibleSearchListener`].
    ///
    /// [`LocusError::IncompatibleSearchListener`]: locus_core::LocusError::IncompatibleSearchListener
    fn check_attachment(&self, _descriptor: &SearchDescriptor) -> Result<()> {
        Ok(())
    }
}

/// Listener that logs search progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl LogListener {
    pub fn new() -> Self {
        Self
    }
}

impl<S: Solution> SearchListener<S> for LogListener {
    fn search_started(&self, name: &str) {
        debug!(search = name, "search started");
    }

    fn search_stopped(&self, name: &str, steps: u64, runtime: Duration) {
        debug!(search = name, steps, ?runtime, "search stopped");
    }

    fn new_best_solution(
        &self,
        _solution: &S,
        evaluation: &dyn Evaluation,
        _validation: &dyn Validation,
    ) {
        debug!(value = evaluation.value(), "new best solution");
    }

    fn status_changed(&self, status: SearchStatus) {
        debug!(%status, "status changed");
    }
}

/// Listener that counts event occurrences, for tests and statistics.
#[derive(Debug, Default)]
pub struct CountingListener {
    started: AtomicU64,
    stopped: AtomicU64,
    new_best: AtomicU64,
    new_current: AtomicU64,
    steps: AtomicU64,
    status_changes: AtomicU64,
}

impl CountingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_count(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }

    pub fn stopped_count(&self) -> u64 {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn new_best_count(&self) -> u64 {
        self.new_best.load(Ordering::SeqCst)
    }

    pub fn new_current_count(&self) -> u64 {
        self.new_current.load(Ordering::SeqCst)
    }

    pub fn step_count(&self) -> u64 {
        self.steps.load(Ordering::SeqCst)
    }

    pub fn status_change_count(&self) -> u64 {
        self.status_changes.load(Ordering::SeqCst)
    }
}

impl<S: Solution> SearchListener<S> for CountingListener {
    fn search_started(&self, _name: &str) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn search_stopped(&self, _name: &str, _steps: u64, _runtime: Duration) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }

    fn new_best_solution(
        &self,
        _solution: &S,
        _evaluation: &dyn Evaluation,
        _validation: &dyn Validation,
    ) {
        self.new_best.fetch_add(1, Ordering::SeqCst);
    }

    fn new_current_solution(&self, _solution: &S, _evaluation: &dyn Evaluation) {
        self.new_current.fetch_add(1, Ordering::SeqCst);
    }

    fn step_completed(&self, _step: u64) {
        self.steps.fetch_add(1, Ordering::SeqCst);
    }

    fn status_changed(&self, _status: SearchStatus) {
        self.status_changes.fetch_add(1, Ordering::SeqCst);
    }
}

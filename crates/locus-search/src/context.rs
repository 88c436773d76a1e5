//! Mutable per-search state shared by the driver and the algorithms.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use locus_core::{
    Evaluation, LocusError, Move, Neighbourhood, Problem, Result, Solution, Validation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::handle::{SearchControl, SearchHandle};
use crate::listener::SearchListener;
use crate::status::SearchStatus;
use crate::stop::{SearchProgress, StopCriterion};

/// The current solution of a neighbourhood search, with its evaluation and
/// validation.
#[derive(Clone, Debug)]
pub struct CurrentSolution<S: Solution> {
    pub solution: S,
    pub evaluation: Arc<dyn Evaluation>,
    pub validation: Arc<dyn Validation>,
}

/// Snapshot of the best solution found so far, with its evaluation and
/// validation.
#[derive(Clone, Debug)]
pub struct BestSolution<S: Solution> {
    pub solution: S,
    pub evaluation: Arc<dyn Evaluation>,
    pub validation: Arc<dyn Validation>,
}

/// State a [`SearchAlgorithm`] works against: the problem, the RNG, the
/// current and best-ever solutions, step bookkeeping, listeners and stop
/// criteria.
///
/// The outer driver owns the context and hands it to the algorithm one step
/// at a time; everything the algorithm needs goes through here.
///
/// [`SearchAlgorithm`]: crate::SearchAlgorithm
pub struct SearchContext<S: Solution, P: Problem<S>> {
    problem: Arc<P>,
    control: Arc<SearchControl>,
    shared_best: Arc<Mutex<Option<BestSolution<S>>>>,
    listeners: Vec<Arc<dyn SearchListener<S>>>,
    criteria: Vec<Arc<dyn StopCriterion>>,
    rng: StdRng,
    current: Option<CurrentSolution<S>>,
    best: Option<BestSolution<S>>,
    step: u64,
    steps_since_improvement: u64,
    improved_this_step: bool,
    last_improvement_at: Option<Instant>,
    started_at: Option<Instant>,
    last_run_duration: Option<Duration>,
    fires_new_current: bool,
}

impl<S: Solution, P: Problem<S>> SearchContext<S, P> {
    pub(crate) fn new(problem: Arc<P>, fires_new_current: bool) -> Self {
        Self {
            problem,
            control: Arc::new(SearchControl::new()),
            shared_best: Arc::new(Mutex::new(None)),
            listeners: Vec::new(),
            criteria: Vec::new(),
            rng: StdRng::from_os_rng(),
            current: None,
            best: None,
            step: 0,
            steps_since_improvement: 0,
            improved_this_step: false,
            last_improvement_at: None,
            started_at: None,
            last_run_duration: None,
            fires_new_current,
        }
    }

    // === Problem access ===

    /// Returns the problem this search runs against.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Returns a shared handle to the problem, for worker threads.
    pub fn problem_arc(&self) -> Arc<P> {
        Arc::clone(&self.problem)
    }

    /// Returns the per-run random number generator.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(crate) fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // === Current solution ===

    /// Returns the current solution, if one has been installed.
    pub fn current(&self) -> Option<&CurrentSolution<S>> {
        self.current.as_ref()
    }

    /// Returns the current solution or fails with a `Search` error.
    pub fn require_current(&self) -> Result<&CurrentSolution<S>> {
        self.current
            .as_ref()
            .ok_or_else(|| LocusError::Search("search has no current solution".into()))
    }

    /// Installs a current solution if none is present, generating a random
    /// one from the problem, and (re)announces it to the listeners.
    ///
    /// Called from algorithm `init` at the start of each run.
    pub fn ensure_current(&mut self) -> Result<()> {
        match self.current.take() {
            Some(current) => {
                self.set_current(current.solution, current.evaluation, current.validation)
            }
            None => {
                let solution = self.problem.create_random_solution(&mut self.rng);
                let evaluation: Arc<dyn Evaluation> = self.problem.evaluate(&solution).into();
                let validation: Arc<dyn Validation> = self.problem.validate(&solution).into();
                self.set_current(solution, evaluation, validation);
            }
        }
        Ok(())
    }

    /// Replaces the current solution, fires `new_current` and offers the new
    /// solution as a best-ever candidate.
    pub fn set_current(
        &mut self,
        solution: S,
        evaluation: Arc<dyn Evaluation>,
        validation: Arc<dyn Validation>,
    ) {
        self.current = Some(CurrentSolution {
            solution,
            evaluation,
            validation,
        });
        self.fire_new_current();
        self.offer_current_best();
    }

    /// Installs a current solution without firing events; used for
    /// configuring an initial solution before a run.
    pub(crate) fn preload_current(&mut self, solution: S) {
        let evaluation: Arc<dyn Evaluation> = self.problem.evaluate(&solution).into();
        let validation: Arc<dyn Validation> = self.problem.validate(&solution).into();
        self.current = Some(CurrentSolution {
            solution,
            evaluation,
            validation,
        });
    }

    /// Applies an accepted move to the current solution and adopts the given
    /// evaluation and validation for it.
    pub fn commit_move(
        &mut self,
        mv: &dyn Move<S>,
        evaluation: Arc<dyn Evaluation>,
        validation: Arc<dyn Validation>,
    ) -> Result<()> {
        let current = self
            .current
            .as_mut()
            .ok_or_else(|| LocusError::Search("search has no current solution".into()))?;
        mv.apply(&mut current.solution)?;
        current.evaluation = evaluation;
        current.validation = validation;
        self.fire_new_current();
        self.offer_current_best();
        Ok(())
    }

    /// Draws a random move from the given neighbourhood for the current
    /// solution.
    pub fn draw_move<N: Neighbourhood<S>>(&mut self, neighbourhood: &N) -> Option<N::Move> {
        let current = self.current.as_ref()?;
        neighbourhood.random_move(&current.solution, &mut self.rng)
    }

    /// Delta-evaluates and delta-validates a move against the current
    /// solution.
    pub fn delta(&self, mv: &dyn Move<S>) -> Result<(Arc<dyn Evaluation>, Arc<dyn Validation>)> {
        let current = self.require_current()?;
        let evaluation = self
            .problem
            .evaluate_delta(mv, &current.solution, current.evaluation.as_ref())?;
        let validation = self
            .problem
            .validate_delta(mv, &current.solution, current.validation.as_ref())?;
        Ok((evaluation.into(), validation.into()))
    }

    /// Generates a random solution from the problem.
    pub fn random_solution(&mut self) -> S {
        self.problem.create_random_solution(&mut self.rng)
    }

    // === Best solution ===

    /// Returns the best solution found so far across all runs.
    pub fn best(&self) -> Option<&BestSolution<S>> {
        self.best.as_ref()
    }

    /// Offers a solution as a best-ever candidate. Rejected solutions never
    /// become best; equal evaluations do not replace the incumbent.
    ///
    /// Returns whether the best solution was replaced.
    pub fn offer_best(
        &mut self,
        solution: &S,
        evaluation: Arc<dyn Evaluation>,
        validation: Arc<dyn Validation>,
    ) -> bool {
        if self.problem.rejects(validation.as_ref()) {
            return false;
        }
        let improved = match &self.best {
            None => true,
            Some(best) => self
                .problem
                .is_improvement(evaluation.as_ref(), best.evaluation.as_ref()),
        };
        if !improved {
            return false;
        }
        let snapshot = BestSolution {
            solution: solution.clone(),
            evaluation,
            validation,
        };
        debug!(
            step = self.step,
            value = snapshot.evaluation.value(),
            "new best solution"
        );
        self.best = Some(snapshot.clone());
        *self
            .shared_best
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        self.improved_this_step = true;
        self.last_improvement_at = Some(Instant::now());
        for listener in &self.listeners {
            listener.new_best_solution(
                &snapshot.solution,
                snapshot.evaluation.as_ref(),
                snapshot.validation.as_ref(),
            );
        }
        true
    }

    /// Offers the current solution as a best-ever candidate.
    pub fn offer_current_best(&mut self) -> bool {
        let Some(current) = self.current.take() else {
            return false;
        };
        let improved = self.offer_best(
            &current.solution,
            Arc::clone(&current.evaluation),
            Arc::clone(&current.validation),
        );
        self.current = Some(current);
        improved
    }

    // === Stop handling ===

    /// Returns true if the search should wind down: an external stop or
    /// dispose request arrived, or a stop criterion is satisfied.
    ///
    /// Polled by the driver before every step; long-running steps poll it
    /// between candidate moves as well.
    pub fn should_stop(&self) -> bool {
        if self.control.stop_requested() {
            return true;
        }
        let progress = self.progress();
        self.criteria.iter().any(|c| c.should_stop(&progress))
    }

    /// Returns a snapshot of the run's progress, as seen by stop criteria.
    pub fn progress(&self) -> SearchProgress {
        let runtime = self.started_at.map(|t| t.elapsed()).unwrap_or_default();
        SearchProgress {
            runtime,
            steps: self.step,
            steps_since_improvement: self.steps_since_improvement,
            time_since_improvement: self
                .last_improvement_at
                .map(|t| t.elapsed())
                .unwrap_or(runtime),
            best_value: self.best.as_ref().map(|b| b.evaluation.value()),
            minimizing: self.problem.is_minimizing(),
        }
    }

    // === Bookkeeping, driver side ===

    pub(crate) fn control(&self) -> &Arc<SearchControl> {
        &self.control
    }

    pub(crate) fn handle(&self, name: Arc<str>) -> SearchHandle<S> {
        SearchHandle::new(name, Arc::clone(&self.control), Arc::clone(&self.shared_best))
    }

    pub(crate) fn begin_run(&mut self) {
        self.step = 0;
        self.steps_since_improvement = 0;
        self.improved_this_step = false;
        self.last_improvement_at = None;
        self.started_at = Some(Instant::now());
    }

    pub(crate) fn finish_run(&mut self) {
        self.last_run_duration = self.started_at.map(|t| t.elapsed());
    }

    pub(crate) fn complete_step(&mut self) {
        self.step += 1;
        if self.improved_this_step {
            self.steps_since_improvement = 0;
        } else {
            self.steps_since_improvement += 1;
        }
        self.improved_this_step = false;
        trace!(step = self.step, "step completed");
        for listener in &self.listeners {
            listener.step_completed(self.step);
        }
    }

    /// Returns the number of completed steps of the current (or last) run.
    pub fn steps(&self) -> u64 {
        self.step
    }

    /// Returns the elapsed time of the current run, or the duration of the
    /// last finished run.
    pub fn time_since_started(&self) -> Option<Duration> {
        match self.control.status() {
            SearchStatus::Initializing | SearchStatus::Running | SearchStatus::Terminating => {
                self.started_at.map(|t| t.elapsed())
            }
            _ => self.last_run_duration,
        }
    }

    // === Listener dispatch ===

    pub(crate) fn add_listener(&mut self, listener: Arc<dyn SearchListener<S>>) {
        self.listeners.push(listener);
    }

    pub(crate) fn remove_listener(&mut self, listener: &Arc<dyn SearchListener<S>>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
        self.listeners.len() < before
    }

    pub(crate) fn add_criterion(&mut self, criterion: Arc<dyn StopCriterion>) {
        self.criteria.push(criterion);
    }

    pub(crate) fn remove_criterion(&mut self, criterion: &Arc<dyn StopCriterion>) -> bool {
        let before = self.criteria.len();
        self.criteria.retain(|c| !Arc::ptr_eq(c, criterion));
        self.criteria.len() < before
    }

    pub(crate) fn fire_started(&self, name: &str) {
        for listener in &self.listeners {
            listener.search_started(name);
        }
    }

    pub(crate) fn fire_stopped(&self, name: &str) {
        let runtime = self.time_since_started().unwrap_or_default();
        for listener in &self.listeners {
            listener.search_stopped(name, self.step, runtime);
        }
    }

    pub(crate) fn set_status(&self, status: SearchStatus) {
        self.control.set_status(status);
        for listener in &self.listeners {
            listener.status_changed(status);
        }
    }

    fn fire_new_current(&self) {
        if !self.fires_new_current {
            return;
        }
        if let Some(current) = &self.current {
            for listener in &self.listeners {
                listener.new_current_solution(&current.solution, current.evaluation.as_ref());
            }
        }
    }
}

//! The search driver.

use std::sync::Arc;
use std::time::Duration;

use locus_core::{Evaluation, LocusError, Problem, Result, Solution, Validation};
use tracing::debug;

use crate::algorithm::{SearchAlgorithm, SearchDescriptor, StepOutcome};
use crate::context::SearchContext;
use crate::handle::SearchHandle;
use crate::listener::SearchListener;
use crate::status::SearchStatus;
use crate::stop::StopCriterion;

/// A runnable search: an algorithm plus the state and lifecycle around it.
///
/// The driver owns the outer loop: status transitions, stop-criterion
/// polling, listener dispatch, best-ever tracking and timing. The algorithm
/// provides the per-step routine.
///
/// [`start`](Search::start) blocks the calling thread until the run winds
/// down; other threads observe and control the search through its
/// [`SearchHandle`]. A search may be started any number of times; each run
/// resets the step counter but the best-ever solution is kept across runs.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use locus_core::{GenericProblem, Objective, SimpleEvaluation, Evaluation, Solution};
/// use locus_search::{RandomSearch, Search};
/// use locus_search::stop::MaxSteps;
///
/// # #[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// # struct Sol(u32);
/// # impl Solution for Sol {}
/// # struct Obj;
/// # impl Objective<Sol, ()> for Obj {
/// #     fn evaluate(&self, s: &Sol, _: &()) -> Box<dyn Evaluation> {
/// #         Box::new(SimpleEvaluation::new(s.0 as f64))
/// #     }
/// # }
/// # let problem = Arc::new(GenericProblem::new(
/// #     (),
/// #     Obj,
/// #     Box::new(|_: &(), rng: &mut dyn rand::RngCore| Sol(rng.next_u32() % 10)),
/// # ));
/// let mut search = Search::new("random", problem, RandomSearch::new());
/// search.add_stop_criterion(Arc::new(MaxSteps::new(1000))).unwrap();
/// search.start().unwrap();
/// let best = search.best_solution();
/// ```
pub struct Search<S, P, A>
where
    S: Solution,
    P: Problem<S>,
    A: SearchAlgorithm<S, P>,
{
    name: Arc<str>,
    algorithm: A,
    ctx: SearchContext<S, P>,
    descriptor: SearchDescriptor,
}

impl<S, P, A> Search<S, P, A>
where
    S: Solution,
    P: Problem<S>,
    A: SearchAlgorithm<S, P>,
{
    /// Creates a search over the given problem.
    pub fn new(name: impl Into<String>, problem: Arc<P>, algorithm: A) -> Self {
        let name: Arc<str> = name.into().into();
        let descriptor = SearchDescriptor {
            name: name.to_string(),
            local_search: algorithm.is_local_search(),
        };
        let ctx = SearchContext::new(problem, descriptor.local_search);
        Self {
            name,
            algorithm,
            ctx,
            descriptor,
        }
    }

    /// Seeds the search's random number generator for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ctx.reseed(seed);
        self
    }

    /// Returns the search's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the algorithm.
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Returns a cloneable handle for cross-thread observation and control.
    pub fn handle(&self) -> SearchHandle<S> {
        self.ctx.handle(Arc::clone(&self.name))
    }

    /// Returns the current search status.
    pub fn status(&self) -> SearchStatus {
        self.ctx.control().status()
    }

    /// Requests a cooperative stop of the current run.
    pub fn stop(&self) {
        self.ctx.control().request_stop();
    }

    /// Disposes the search; idempotent and terminal.
    pub fn dispose(&mut self) {
        self.algorithm.disposed();
        self.ctx.control().request_dispose();
    }

    /// Returns the number of completed steps of the current (or last) run.
    pub fn steps(&self) -> u64 {
        self.ctx.steps()
    }

    /// Returns the elapsed time of the current run, or the duration of the
    /// last finished run.
    pub fn time_since_started(&self) -> Option<Duration> {
        self.ctx.time_since_started()
    }

    /// Returns the best solution found so far.
    pub fn best_solution(&self) -> Option<S> {
        self.ctx.best().map(|best| best.solution.clone())
    }

    /// Returns the evaluation of the best solution found so far.
    pub fn best_solution_evaluation(&self) -> Option<Arc<dyn Evaluation>> {
        self.ctx.best().map(|best| Arc::clone(&best.evaluation))
    }

    /// Returns the validation of the best solution found so far.
    pub fn best_solution_validation(&self) -> Option<Arc<dyn Validation>> {
        self.ctx.best().map(|best| Arc::clone(&best.validation))
    }

    /// Attaches a stop criterion. Fails when the criterion is incompatible
    /// with this search, or when the search is not idle.
    pub fn add_stop_criterion(&mut self, criterion: Arc<dyn StopCriterion>) -> Result<()> {
        self.assert_idle()?;
        criterion.check_attachment(&self.descriptor)?;
        self.ctx.add_criterion(criterion);
        Ok(())
    }

    /// Detaches a stop criterion; returns whether it was attached.
    pub fn remove_stop_criterion(&mut self, criterion: &Arc<dyn StopCriterion>) -> bool {
        self.ctx.remove_criterion(criterion)
    }

    /// Attaches a listener. Fails when the listener is incompatible with
    /// this search, or when the search is not idle.
    pub fn add_listener(&mut self, listener: Arc<dyn SearchListener<S>>) -> Result<()> {
        self.assert_idle()?;
        listener.check_attachment(&self.descriptor)?;
        self.ctx.add_listener(listener);
        Ok(())
    }

    /// Detaches a listener; returns whether it was attached.
    pub fn remove_listener(&mut self, listener: &Arc<dyn SearchListener<S>>) -> bool {
        self.ctx.remove_listener(listener)
    }

    /// Reseeds the random number generator; only allowed while idle.
    pub fn set_random_seed(&mut self, seed: u64) -> Result<()> {
        self.assert_idle()?;
        self.ctx.reseed(seed);
        Ok(())
    }

    /// Sets the solution the next run starts from; only allowed while idle.
    pub fn set_initial_solution(&mut self, solution: S) -> Result<()> {
        self.assert_idle()?;
        self.ctx.preload_current(solution);
        Ok(())
    }

    /// Reconfigures the algorithm; only allowed while idle.
    pub fn configure(&mut self, configure: impl FnOnce(&mut A)) -> Result<()> {
        self.assert_idle()?;
        configure(&mut self.algorithm);
        Ok(())
    }

    /// Runs the search until a stop criterion fires, a stop or dispose
    /// request arrives, or the algorithm finishes. Blocks the caller.
    pub fn start(&mut self) -> Result<()> {
        self.ctx.control().try_activate().map_err(|status| {
            LocusError::Search(format!(
                "search '{}' cannot be started while {status}",
                self.name
            ))
        })?;
        // try_activate already flipped the status; announce it.
        self.ctx.set_status(SearchStatus::Initializing);
        debug!(search = %self.name, algorithm = self.algorithm.name(), "starting search");
        self.ctx.begin_run();
        self.ctx.fire_started(&self.name);

        let result = self.run_loop();

        self.ctx.set_status(SearchStatus::Terminating);
        self.algorithm.run_finished(&mut self.ctx);
        self.ctx.finish_run();
        self.ctx.fire_stopped(&self.name);
        let final_status = if self.ctx.control().dispose_requested() {
            SearchStatus::Disposed
        } else {
            SearchStatus::Idle
        };
        self.ctx.set_status(final_status);
        debug!(
            search = %self.name,
            steps = self.ctx.steps(),
            best = self.ctx.best().map(|b| b.evaluation.value()),
            "search stopped"
        );
        result
    }

    fn run_loop(&mut self) -> Result<()> {
        self.algorithm.init(&mut self.ctx)?;
        // A stop requested during initialization prevents the run from ever
        // entering the step loop.
        if self.ctx.should_stop() {
            return Ok(());
        }
        self.ctx.set_status(SearchStatus::Running);
        loop {
            if self.ctx.should_stop() {
                return Ok(());
            }
            match self.algorithm.step(&mut self.ctx)? {
                StepOutcome::Continue => self.ctx.complete_step(),
                StepOutcome::Finished => {
                    debug!(search = %self.name, "algorithm finished");
                    return Ok(());
                }
            }
        }
    }

    fn assert_idle(&self) -> Result<()> {
        let status = self.status();
        if status != SearchStatus::Idle {
            return Err(LocusError::Search(format!(
                "search '{}' can only be configured while idle (status: {status})",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::{RandomSearch, SteepestDescent};
    use crate::listener::{CountingListener, SearchListener};
    use crate::stop::MaxSteps;
    use locus_core::{GenericProblem, Objective, SimpleEvaluation};
    use rand::RngCore;
    use std::sync::Mutex;

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct Num(u32);

    impl Solution for Num {}

    struct Value;

    impl Objective<Num, ()> for Value {
        fn evaluate(&self, solution: &Num, _data: &()) -> Box<dyn Evaluation> {
            Box::new(SimpleEvaluation::new(solution.0 as f64))
        }
    }

    fn problem() -> Arc<GenericProblem<(), Num, Value>> {
        Arc::new(GenericProblem::new(
            (),
            Value,
            Box::new(|_: &(), rng: &mut dyn RngCore| Num(rng.next_u32() % 100)),
        ))
    }

    #[derive(Default)]
    struct StatusRecorder(Mutex<Vec<SearchStatus>>);

    impl SearchListener<Num> for StatusRecorder {
        fn status_changed(&self, status: SearchStatus) {
            self.0.lock().unwrap().push(status);
        }
    }

    #[test]
    fn a_run_walks_the_status_machine() {
        let mut search = Search::new("lifecycle", problem(), RandomSearch::new());
        let recorder = Arc::new(StatusRecorder::default());
        search.add_listener(recorder.clone()).unwrap();
        search.add_stop_criterion(Arc::new(MaxSteps::new(5))).unwrap();
        search.start().unwrap();
        let observed = recorder.0.lock().unwrap().clone();
        assert_eq!(
            observed,
            vec![
                SearchStatus::Initializing,
                SearchStatus::Running,
                SearchStatus::Terminating,
                SearchStatus::Idle,
            ]
        );
    }

    #[test]
    fn restarting_resets_steps_but_keeps_the_best() {
        let mut search =
            Search::new("restart", problem(), RandomSearch::new()).with_seed(5);
        search.add_stop_criterion(Arc::new(MaxSteps::new(50))).unwrap();
        search.start().unwrap();
        let first_best = search.best_solution_evaluation().unwrap().value();
        assert_eq!(search.steps(), 50);

        search.start().unwrap();
        assert_eq!(search.steps(), 50);
        let second_best = search.best_solution_evaluation().unwrap().value();
        assert!(second_best >= first_best);
    }

    #[test]
    fn listeners_see_every_run() {
        let mut search = Search::new("events", problem(), RandomSearch::new());
        let counter = Arc::new(CountingListener::new());
        search.add_listener(counter.clone()).unwrap();
        search.add_stop_criterion(Arc::new(MaxSteps::new(10))).unwrap();
        search.start().unwrap();
        search.start().unwrap();
        assert_eq!(counter.started_count(), 2);
        assert_eq!(counter.stopped_count(), 2);
        assert_eq!(counter.step_count(), 20);
        assert!(counter.new_best_count() >= 1);
        // Random search tracks no current solution.
        assert_eq!(counter.new_current_count(), 0);
    }

    #[test]
    fn external_threads_stop_a_running_search() {
        let mut search = Search::new("external", problem(), RandomSearch::new());
        let handle = search.handle();
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(30));
            handle.stop();
        });
        // No stop criterion: only the external request ends the run.
        search.start().unwrap();
        stopper.join().unwrap();
        assert_eq!(search.status(), SearchStatus::Idle);
        assert!(search.best_solution().is_some());
    }

    #[test]
    fn disposal_is_terminal_and_idempotent() {
        let mut search = Search::new("disposed", problem(), RandomSearch::new());
        search.dispose();
        search.dispose();
        assert_eq!(search.status(), SearchStatus::Disposed);
        assert!(matches!(search.start(), Err(LocusError::Search(_))));
        assert!(matches!(
            search.add_stop_criterion(Arc::new(MaxSteps::new(1))),
            Err(LocusError::Search(_))
        ));
        assert!(matches!(search.set_random_seed(1), Err(LocusError::Search(_))));
    }

    #[test]
    fn removed_listeners_and_criteria_stop_observing() {
        let mut search = Search::new("removal", problem(), RandomSearch::new());
        let counter = Arc::new(CountingListener::new());
        let listener: Arc<dyn SearchListener<Num>> = counter.clone();
        search.add_listener(Arc::clone(&listener)).unwrap();
        assert!(search.remove_listener(&listener));
        assert!(!search.remove_listener(&listener));

        let criterion: Arc<dyn crate::stop::StopCriterion> = Arc::new(MaxSteps::new(3));
        search.add_stop_criterion(Arc::clone(&criterion)).unwrap();
        assert!(search.remove_stop_criterion(&criterion));

        search.add_stop_criterion(Arc::new(MaxSteps::new(5))).unwrap();
        search.start().unwrap();
        assert_eq!(counter.started_count(), 0);
        assert_eq!(search.steps(), 5);
    }

    #[test]
    fn initial_solution_seeds_the_first_run() {
        // A steepest descent with no improving move finishes immediately,
        // leaving the preloaded solution as the best.
        struct NoMoves;
        impl locus_core::Neighbourhood<Num> for NoMoves {
            type Move = NumMove;
            fn random_move(
                &self,
                _solution: &Num,
                _rng: &mut dyn RngCore,
            ) -> Option<Self::Move> {
                None
            }
            fn all_moves(&self, _solution: &Num) -> Vec<Self::Move> {
                Vec::new()
            }
        }
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        struct NumMove;
        impl locus_core::Move<Num> for NumMove {
            fn apply(&self, _solution: &mut Num) -> Result<()> {
                Ok(())
            }
            fn undo(&self, _solution: &mut Num) -> Result<()> {
                Ok(())
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        let mut search = Search::new("seeded", problem(), SteepestDescent::new(NoMoves));
        search.set_initial_solution(Num(42)).unwrap();
        search.start().unwrap();
        assert_eq!(search.best_solution(), Some(Num(42)));
        assert_eq!(search.best_solution_evaluation().unwrap().value(), 42.0);
    }
}

//! Basic parallel search.

use std::marker::PhantomData;
use std::thread;
use std::time::Duration;

use locus_core::{LocusError, Problem, Result, Solution};
use tracing::debug;

use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;
use crate::handle::SearchHandle;
use crate::search::Search;

/// A search that can be driven by a coordinating search: type-erased over
/// its problem and algorithm.
pub trait RunnableSearch<S: Solution>: Send {
    /// Runs the search to completion; equivalent to `start`.
    fn run(&mut self) -> Result<()>;

    /// Returns a handle for observing and stopping the search.
    fn search_handle(&self) -> SearchHandle<S>;

    /// Returns the search's name.
    fn search_name(&self) -> String;

    /// Sets the solution the next run starts from.
    fn seed_with(&mut self, solution: S) -> Result<()>;

    /// Disposes the search.
    fn dispose_search(&mut self);
}

impl<S, P, A> RunnableSearch<S> for Search<S, P, A>
where
    S: Solution,
    P: Problem<S>,
    A: SearchAlgorithm<S, P>,
{
    fn run(&mut self) -> Result<()> {
        self.start()
    }

    fn search_handle(&self) -> SearchHandle<S> {
        self.handle()
    }

    fn search_name(&self) -> String {
        self.name().to_string()
    }

    fn seed_with(&mut self, solution: S) -> Result<()> {
        self.set_initial_solution(solution)
    }

    fn dispose_search(&mut self) {
        self.dispose();
    }
}

/// How often the coordinator polls its children while they run.
const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Basic parallel search: runs several independent child searches over the
/// same problem, each on its own worker thread, and reports the best of
/// their bests.
///
/// The whole fan-out is a single step of the owning [`Search`]: spawn one
/// worker per child, wait for all of them, fold their best solutions.
/// Stopping the parent stops every child cooperatively; disposing it
/// disposes the children. A failing child fails the parent run.
///
/// [`Search`]: crate::Search
pub struct BasicParallelSearch<S: Solution> {
    children: Vec<Box<dyn RunnableSearch<S>>>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S: Solution> BasicParallelSearch<S> {
    /// Creates a parallel search with no children yet.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Adds a child search.
    pub fn add_search(&mut self, child: Box<dyn RunnableSearch<S>>) {
        self.children.push(child);
    }

    /// Builder-style variant of [`add_search`](Self::add_search).
    pub fn with_search(mut self, child: Box<dyn RunnableSearch<S>>) -> Self {
        self.add_search(child);
        self
    }

    /// Returns the number of child searches.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

impl<S: Solution> Default for BasicParallelSearch<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> SearchAlgorithm<S, P> for BasicParallelSearch<S>
where
    S: Solution,
    P: Problem<S>,
{
    fn name(&self) -> &'static str {
        "BasicParallelSearch"
    }

    fn is_local_search(&self) -> bool {
        false
    }

    fn init(&mut self, _ctx: &mut SearchContext<S, P>) -> Result<()> {
        if self.children.is_empty() {
            return Err(LocusError::Search(
                "parallel search requires at least one child search".into(),
            ));
        }
        Ok(())
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let child_handles: Vec<SearchHandle<S>> =
            self.children.iter().map(|c| c.search_handle()).collect();
        debug!(children = self.children.len(), "fanning out child searches");

        let mut first_error: Option<LocusError> = None;
        thread::scope(|scope| {
            let workers: Vec<_> = self
                .children
                .iter_mut()
                .map(|child| scope.spawn(move || child.run()))
                .collect();

            let mut stop_forwarded = false;
            while !workers.iter().all(|worker| worker.is_finished()) {
                if !stop_forwarded && ctx.should_stop() {
                    debug!("forwarding stop request to children");
                    for handle in &child_handles {
                        handle.stop();
                    }
                    stop_forwarded = true;
                }
                thread::sleep(WORKER_POLL_INTERVAL);
            }

            for worker in workers {
                match worker.join() {
                    Ok(Ok(())) => {}
                    Ok(Err(error)) => {
                        first_error.get_or_insert(error);
                    }
                    Err(_) => {
                        first_error.get_or_insert(LocusError::Search(
                            "parallel child worker terminated abnormally".into(),
                        ));
                    }
                }
            }
        });
        if let Some(error) = first_error {
            return Err(error);
        }

        for handle in &child_handles {
            if let Some(best) = handle.best() {
                ctx.offer_best(&best.solution, best.evaluation, best.validation);
            }
        }
        Ok(StepOutcome::Finished)
    }

    fn disposed(&mut self) {
        for child in &mut self.children {
            child.dispose_search();
        }
    }
}

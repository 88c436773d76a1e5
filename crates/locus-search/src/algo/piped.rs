//! Piped search.

use std::marker::PhantomData;

use locus_core::{LocusError, Problem, Result, Solution};
use tracing::debug;

use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;
use crate::parallel::RunnableSearch;

/// Piped search: runs a sequence of child searches, seeding every child with
/// the best solution of its predecessor.
///
/// Typical use is a cheap constructive search (e.g. LR greedy) followed by
/// one or more refining local searches. The whole pipe is a single step of
/// the owning [`Search`]; the parent's best is the best across all children.
/// Children run on the calling thread, one after the other, so they should
/// carry their own stop criteria; a stop request on the parent takes effect
/// between children.
///
/// [`Search`]: crate::Search
pub struct PipedSearch<S: Solution> {
    children: Vec<Box<dyn RunnableSearch<S>>>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S: Solution> PipedSearch<S> {
    /// Creates a piped search with no children yet.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Appends a child search to the pipe.
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

impl<S: Solution> Default for PipedSearch<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P> SearchAlgorithm<S, P> for PipedSearch<S>
where
    S: Solution,
    P: Problem<S>,
{
    fn name(&self) -> &'static str {
        "PipedSearch"
    }

    fn is_local_search(&self) -> bool {
        false
    }

    fn init(&mut self, _ctx: &mut SearchContext<S, P>) -> Result<()> {
        if self.children.is_empty() {
            return Err(LocusError::Search(
                "piped search requires at least one child search".into(),
            ));
        }
        Ok(())
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let mut carried: Option<S> = ctx.best().map(|best| best.solution.clone());
        for child in &mut self.children {
            if ctx.should_stop() {
                debug!("stop requested, cutting the pipe short");
                break;
            }
            if let Some(seed) = carried.take() {
                child.seed_with(seed)?;
            }
            debug!(child = %child.search_name(), "running pipe stage");
            child.run()?;
            if let Some(best) = child.search_handle().best() {
                carried = Some(best.solution.clone());
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

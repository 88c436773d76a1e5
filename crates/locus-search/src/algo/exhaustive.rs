//! Exhaustive search.

use locus_core::{Problem, Result, Solution};
use tracing::debug;

use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;

/// Exhaustive search: per step, pull the next solution from a finite
/// solution iterator and keep it when it beats the best so far. Finishes
/// when the iterator is drained.
///
/// The iterator is consumed; rerunning the search after it is drained
/// finishes immediately.
///
/// # Example
///
/// ```no_run
/// use std::collections::BTreeSet;
/// use locus_search::ExhaustiveSearch;
/// use locus_subset::SubsetSolutionIterator;
///
/// let ids: BTreeSet<usize> = (0..8).collect();
/// let algorithm = ExhaustiveSearch::new(SubsetSolutionIterator::new(&ids, 2, 2));
/// ```
pub struct ExhaustiveSearch<I> {
    solutions: I,
}

impl<I> ExhaustiveSearch<I> {
    pub fn new(solutions: I) -> Self {
        Self { solutions }
    }
}

impl<S, P, I> SearchAlgorithm<S, P> for ExhaustiveSearch<I>
where
    S: Solution,
    P: Problem<S>,
    I: Iterator<Item = S> + Send,
{
    fn name(&self) -> &'static str {
        "ExhaustiveSearch"
    }

    fn is_local_search(&self) -> bool {
        false
    }

    fn init(&mut self, _ctx: &mut SearchContext<S, P>) -> Result<()> {
        Ok(())
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let Some(solution) = self.solutions.next() else {
            debug!("solution iterator drained, finishing");
            return Ok(StepOutcome::Finished);
        };
        let evaluation = ctx.problem().evaluate(&solution);
        let validation = ctx.problem().validate(&solution);
        ctx.offer_best(&solution, evaluation.into(), validation.into());
        Ok(StepOutcome::Continue)
    }
}

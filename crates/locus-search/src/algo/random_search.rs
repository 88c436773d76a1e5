//! Random search.

use locus_core::{Problem, Result, Solution};

use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;

/// Random search: per step, generate a fresh random solution from the
/// problem and keep it when it beats the best so far. No neighbourhood is
/// involved.
///
/// Never finishes on its own; bound the run with stop criteria.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSearch;

impl RandomSearch {
    pub fn new() -> Self {
        Self
    }
}

impl<S, P> SearchAlgorithm<S, P> for RandomSearch
where
    S: Solution,
    P: Problem<S>,
{
    fn name(&self) -> &'static str {
        "RandomSearch"
    }

    fn is_local_search(&self) -> bool {
        false
    }

    fn init(&mut self, _ctx: &mut SearchContext<S, P>) -> Result<()> {
        Ok(())
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let solution = ctx.random_solution();
        let evaluation = ctx.problem().evaluate(&solution);
        let validation = ctx.problem().validate(&solution);
        ctx.offer_best(&solution, evaluation.into(), validation.into());
        Ok(StepOutcome::Continue)
    }
}

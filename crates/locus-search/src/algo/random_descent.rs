//! Random descent.

use std::marker::PhantomData;

use locus_core::{Neighbourhood, Problem, Result, Solution};
use tracing::debug;

use super::{evaluate_move_cached, improves_current};
use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::cache::{EvaluatedMoveCache, SingleEvaluatedMoveCache};
use crate::context::SearchContext;

/// Random descent: per step, draw one random move and accept it iff the
/// modified solution is not rejected and strictly improves on the current
/// one. Cheap, unbiased exploration of improving moves.
///
/// Finishes only when the neighbourhood reports no move at all; bound the
/// run with stop criteria.
pub struct RandomDescent<S, N>
where
    S: Solution,
    N: Neighbourhood<S>,
{
    neighbourhood: N,
    cache: SingleEvaluatedMoveCache<N::Move>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, N> RandomDescent<S, N>
where
    S: Solution,
    N: Neighbourhood<S>,
{
    pub fn new(neighbourhood: N) -> Self {
        Self {
            neighbourhood,
            cache: SingleEvaluatedMoveCache::new(),
            _phantom: PhantomData,
        }
    }
}

impl<S, P, N> SearchAlgorithm<S, P> for RandomDescent<S, N>
where
    S: Solution,
    P: Problem<S>,
    N: Neighbourhood<S>,
{
    fn name(&self) -> &'static str {
        "RandomDescent"
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let Some(mv) = ctx.draw_move(&self.neighbourhood) else {
            debug!("neighbourhood offers no move, finishing");
            return Ok(StepOutcome::Finished);
        };
        let (evaluation, validation) = evaluate_move_cached(ctx, &mut self.cache, &mv)?;
        let accept = improves_current(
            ctx.problem(),
            ctx.require_current()?,
            evaluation.as_ref(),
            validation.as_ref(),
        );
        if accept {
            ctx.commit_move(&mv, evaluation, validation)?;
            self.cache.clear();
        }
        Ok(StepOutcome::Continue)
    }

    fn run_finished(&mut self, _ctx: &mut SearchContext<S, P>) {
        self.cache.clear();
    }
}

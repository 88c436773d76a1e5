//! Steepest descent.

use std::marker::PhantomData;
use std::sync::Arc;

use locus_core::{Evaluation, Neighbourhood, Problem, Result, Solution, Validation};
use tracing::debug;

use super::{improves_current, STOP_POLL_INTERVAL};
use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;

/// Steepest descent: per step, enumerate the whole neighbourhood and take
/// the best non-rejected improving move (ties broken by first-seen).
/// Finishes as soon as no move improves on the current solution.
pub struct SteepestDescent<S, N>
where
    S: Solution,
    N: Neighbourhood<S>,
{
    neighbourhood: N,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, N> SteepestDescent<S, N>
where
    S: Solution,
    N: Neighbourhood<S>,
{
    pub fn new(neighbourhood: N) -> Self {
        Self {
            neighbourhood,
            _phantom: PhantomData,
        }
    }
}

impl<S, P, N> SearchAlgorithm<S, P> for SteepestDescent<S, N>
where
    S: Solution,
    P: Problem<S>,
    N: Neighbourhood<S>,
{
    fn name(&self) -> &'static str {
        "SteepestDescent"
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let moves = {
            let current = ctx.require_current()?;
            self.neighbourhood.all_moves(&current.solution)
        };
        let mut best: Option<(N::Move, Arc<dyn Evaluation>, Arc<dyn Validation>)> = None;
        for (index, mv) in moves.iter().enumerate() {
            if index % STOP_POLL_INTERVAL == 0 && index > 0 && ctx.should_stop() {
                break;
            }
            let (evaluation, validation) = ctx.delta(mv)?;
            if !improves_current(
                ctx.problem(),
                ctx.require_current()?,
                evaluation.as_ref(),
                validation.as_ref(),
            ) {
                continue;
            }
            let improves_best = match &best {
                None => true,
                Some((_, best_evaluation, _)) => ctx
                    .problem()
                    .is_improvement(evaluation.as_ref(), best_evaluation.as_ref()),
            };
            if improves_best {
                best = Some((mv.clone(), evaluation, validation));
            }
        }
        match best {
            Some((mv, evaluation, validation)) => {
                ctx.commit_move(&mv, evaluation, validation)?;
                Ok(StepOutcome::Continue)
            }
            None => {
                debug!("no improving move, finishing");
                Ok(StepOutcome::Finished)
            }
        }
    }
}

//! Reduced variable-neighbourhood search.

use std::hash::Hash;
use std::marker::PhantomData;

use locus_core::{LocusError, Move, Neighbourhood, Problem, Result, Solution};
use tracing::{debug, trace};

use super::improves_current;
use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;

/// Reduced variable-neighbourhood search: the shake-only variant.
///
/// Per step a single random move is drawn from the current neighbourhood
/// `Ni` and accepted iff it yields an improvement; on improvement `i` resets
/// to 1, otherwise it advances, wrapping around after `Nk`. No inner
/// refinement runs, which makes a step as cheap as random descent while the
/// growing neighbourhoods still provide diversification.
///
/// Finishes only when every neighbourhood is disabled; bound the run with
/// stop criteria.
pub struct ReducedVariableNeighbourhoodSearch<S, M>
where
    S: Solution,
    M: Move<S> + Clone + PartialEq + Eq + Hash,
{
    neighbourhoods: Vec<Box<dyn Neighbourhood<S, Move = M>>>,
    index: usize,
    consecutive_disabled: usize,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, M> ReducedVariableNeighbourhoodSearch<S, M>
where
    S: Solution,
    M: Move<S> + Clone + PartialEq + Eq + Hash,
{
    pub fn new(neighbourhoods: Vec<Box<dyn Neighbourhood<S, Move = M>>>) -> Self {
        Self {
            neighbourhoods,
            index: 0,
            consecutive_disabled: 0,
            _phantom: PhantomData,
        }
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.neighbourhoods.len();
    }
}

impl<S, P, M> SearchAlgorithm<S, P> for ReducedVariableNeighbourhoodSearch<S, M>
where
    S: Solution,
    P: Problem<S>,
    M: Move<S> + Clone + PartialEq + Eq + Hash,
{
    fn name(&self) -> &'static str {
        "ReducedVariableNeighbourhoodSearch"
    }

    fn init(&mut self, ctx: &mut SearchContext<S, P>) -> Result<()> {
        if self.neighbourhoods.is_empty() {
            return Err(LocusError::Search(
                "reduced variable-neighbourhood search requires at least one neighbourhood"
                    .into(),
            ));
        }
        self.index = 0;
        self.consecutive_disabled = 0;
        ctx.ensure_current()
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let mv = {
            let neighbourhood = &self.neighbourhoods[self.index];
            ctx.draw_move(neighbourhood)
        };
        let Some(mv) = mv else {
            self.consecutive_disabled += 1;
            if self.consecutive_disabled >= self.neighbourhoods.len() {
                debug!("all neighbourhoods disabled, finishing");
                return Ok(StepOutcome::Finished);
            }
            self.advance();
            return Ok(StepOutcome::Continue);
        };
        self.consecutive_disabled = 0;

        let (evaluation, validation) = ctx.delta(&mv)?;
        let improved = improves_current(
            ctx.problem(),
            ctx.require_current()?,
            evaluation.as_ref(),
            validation.as_ref(),
        );
        if improved {
            trace!(index = self.index, "shake improved, restarting from N1");
            ctx.commit_move(&mv, evaluation, validation)?;
            self.index = 0;
        } else {
            self.advance();
        }
        Ok(StepOutcome::Continue)
    }
}

//! Variable-neighbourhood search.

use std::hash::Hash;
use std::marker::PhantomData;

use locus_core::{Evaluation, LocusError, Move, Neighbourhood, Problem, Result, Solution};
use tracing::{debug, trace};

use super::STOP_POLL_INTERVAL;
use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;

/// Variable-neighbourhood search over an ordered list of shaking
/// neighbourhoods `N1..Nk`.
///
/// Per step: draw a random move from the current neighbourhood `Ni` (the
/// shake), refine the shaken solution with a steepest descent over that same
/// neighbourhood, and compare the result to the current solution. On
/// improvement the current solution is replaced and `i` resets to 1;
/// otherwise `i` advances, wrapping around after `Nk`.
///
/// Finishes only when every neighbourhood in the list is disabled; bound the
/// run with stop criteria.
pub struct VariableNeighbourhoodSearch<S, M>
where
    S: Solution,
    M: Move<S> + Clone + PartialEq + Eq + Hash,
{
    neighbourhoods: Vec<Box<dyn Neighbourhood<S, Move = M>>>,
    index: usize,
    consecutive_disabled: usize,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, M> VariableNeighbourhoodSearch<S, M>
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

    /// Returns the index of the neighbourhood the next shake draws from.
    pub fn neighbourhood_index(&self) -> usize {
        self.index
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.neighbourhoods.len();
    }

    /// Runs a steepest descent on `candidate` with the given neighbourhood,
    /// until no improving move remains or a stop is requested.
    fn descend<P: Problem<S>>(
        ctx: &SearchContext<S, P>,
        neighbourhood: &dyn Neighbourhood<S, Move = M>,
        candidate: &mut S,
        evaluation: &mut Box<dyn Evaluation>,
    ) -> Result<()> {
        loop {
            if ctx.should_stop() {
                return Ok(());
            }
            let validation = ctx.problem().validate(candidate);
            let mut best: Option<(M, Box<dyn Evaluation>)> = None;
            for (index, mv) in neighbourhood.all_moves(candidate).iter().enumerate() {
                if index % STOP_POLL_INTERVAL == 0 && index > 0 && ctx.should_stop() {
                    break;
                }
                let move_evaluation =
                    ctx.problem()
                        .evaluate_delta(mv, candidate, evaluation.as_ref())?;
                let move_validation =
                    ctx.problem()
                        .validate_delta(mv, candidate, validation.as_ref())?;
                if ctx.problem().rejects(move_validation.as_ref()) {
                    continue;
                }
                if !ctx
                    .problem()
                    .is_improvement(move_evaluation.as_ref(), evaluation.as_ref())
                {
                    continue;
                }
                let improves_best = match &best {
                    None => true,
                    Some((_, best_evaluation)) => ctx
                        .problem()
                        .is_improvement(move_evaluation.as_ref(), best_evaluation.as_ref()),
                };
                if improves_best {
                    best = Some((mv.clone(), move_evaluation));
                }
            }
            match best {
                Some((mv, move_evaluation)) => {
                    mv.apply(candidate)?;
                    *evaluation = move_evaluation;
                }
                None => return Ok(()),
            }
        }
    }
}

impl<S, P, M> SearchAlgorithm<S, P> for VariableNeighbourhoodSearch<S, M>
where
    S: Solution,
    P: Problem<S>,
    M: Move<S> + Clone + PartialEq + Eq + Hash,
{
    fn name(&self) -> &'static str {
        "VariableNeighbourhoodSearch"
    }

    fn init(&mut self, ctx: &mut SearchContext<S, P>) -> Result<()> {
        if self.neighbourhoods.is_empty() {
            return Err(LocusError::Search(
                "variable-neighbourhood search requires at least one neighbourhood".into(),
            ));
        }
        self.index = 0;
        self.consecutive_disabled = 0;
        ctx.ensure_current()
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let shake = {
            let neighbourhood = &self.neighbourhoods[self.index];
            ctx.draw_move(neighbourhood)
        };
        let Some(shake) = shake else {
            trace!(index = self.index, "neighbourhood disabled, advancing");
            self.consecutive_disabled += 1;
            if self.consecutive_disabled >= self.neighbourhoods.len() {
                debug!("all neighbourhoods disabled, finishing");
                return Ok(StepOutcome::Finished);
            }
            self.advance();
            return Ok(StepOutcome::Continue);
        };
        self.consecutive_disabled = 0;

        let mut candidate = ctx.require_current()?.solution.clone();
        shake.apply(&mut candidate)?;
        let mut evaluation = ctx.problem().evaluate(&candidate);
        Self::descend(
            ctx,
            self.neighbourhoods[self.index].as_ref(),
            &mut candidate,
            &mut evaluation,
        )?;

        let validation = ctx.problem().validate(&candidate);
        let improved = {
            let current = ctx.require_current()?;
            super::improves_current(
                ctx.problem(),
                current,
                evaluation.as_ref(),
                validation.as_ref(),
            )
        };
        if improved {
            trace!(index = self.index, "shake improved, restarting from N1");
            ctx.set_current(candidate, evaluation.into(), validation.into());
            self.index = 0;
        } else {
            self.advance();
        }
        Ok(StepOutcome::Continue)
    }
}

//! Variable-neighbourhood descent.

use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use locus_core::{
    Evaluation, LocusError, Move, Neighbourhood, Problem, Result, Solution, Validation,
};
use tracing::{debug, trace};

use super::{improves_current, STOP_POLL_INTERVAL};
use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;

/// Variable-neighbourhood descent: a deterministic descent over an ordered
/// list of neighbourhoods `N1..Nk`.
///
/// Per step the current neighbourhood is enumerated exhaustively and the
/// best improving move taken; on improvement the walk restarts from `N1`,
/// otherwise it advances to the next neighbourhood. Finishes when the last
/// neighbourhood offers no improving move either: the current solution is
/// then a local optimum with respect to every neighbourhood in the list.
pub struct VariableNeighbourhoodDescent<S, M>
where
    S: Solution,
    M: Move<S> + Clone + PartialEq + Eq + Hash,
{
    neighbourhoods: Vec<Box<dyn Neighbourhood<S, Move = M>>>,
    index: usize,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, M> VariableNeighbourhoodDescent<S, M>
where
    S: Solution,
    M: Move<S> + Clone + PartialEq + Eq + Hash,
{
    pub fn new(neighbourhoods: Vec<Box<dyn Neighbourhood<S, Move = M>>>) -> Self {
        Self {
            neighbourhoods,
            index: 0,
            _phantom: PhantomData,
        }
    }
}

impl<S, P, M> SearchAlgorithm<S, P> for VariableNeighbourhoodDescent<S, M>
where
    S: Solution,
    P: Problem<S>,
    M: Move<S> + Clone + PartialEq + Eq + Hash,
{
    fn name(&self) -> &'static str {
        "VariableNeighbourhoodDescent"
    }

    fn init(&mut self, ctx: &mut SearchContext<S, P>) -> Result<()> {
        if self.neighbourhoods.is_empty() {
            return Err(LocusError::Search(
                "variable-neighbourhood descent requires at least one neighbourhood".into(),
            ));
        }
        self.index = 0;
        ctx.ensure_current()
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let moves = {
            let current = ctx.require_current()?;
            self.neighbourhoods[self.index].all_moves(&current.solution)
        };
        let mut best: Option<(M, Arc<dyn Evaluation>, Arc<dyn Validation>)> = None;
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
                trace!(index = self.index, "improving move found, restarting from N1");
                ctx.commit_move(&mv, evaluation, validation)?;
                self.index = 0;
                Ok(StepOutcome::Continue)
            }
            None if self.index + 1 < self.neighbourhoods.len() => {
                self.index += 1;
                Ok(StepOutcome::Continue)
            }
            None => {
                debug!("local optimum for every neighbourhood, finishing");
                Ok(StepOutcome::Finished)
            }
        }
    }
}

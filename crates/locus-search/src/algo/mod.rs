//! Search algorithms.
//!
//! Each algorithm is a struct implementing [`SearchAlgorithm`] that composes
//! a problem (through the [`SearchContext`]) with whatever it needs — a
//! neighbourhood, a tabu memory, a temperature ladder. Run them through
//! [`Search`].
//!
//! [`Search`]: crate::Search
//! [`SearchAlgorithm`]: crate::SearchAlgorithm
//! [`SearchContext`]: crate::SearchContext

mod exhaustive;
mod lr_subset;
mod metropolis;
mod piped;
mod random_descent;
mod random_search;
mod reduced_vns;
mod steepest_descent;
mod tabu;
mod tempering;
mod vnd;
mod vns;

use std::sync::Arc;

use locus_core::{Evaluation, Move, Problem, Result, Solution, Validation};

use crate::cache::EvaluatedMoveCache;
use crate::context::SearchContext;

pub use exhaustive::ExhaustiveSearch;
pub use lr_subset::LrSubsetSearch;
pub use metropolis::MetropolisSearch;
pub use piped::PipedSearch;
pub use random_descent::RandomDescent;
pub use random_search::RandomSearch;
pub use reduced_vns::ReducedVariableNeighbourhoodSearch;
pub use steepest_descent::SteepestDescent;
pub use tabu::{RecentIdsMemory, RecentSolutionsMemory, TabuMemory, TabuSearch};
pub use tempering::ParallelTempering;
pub use vnd::VariableNeighbourhoodDescent;
pub use vns::VariableNeighbourhoodSearch;

/// How many candidate moves an enumerating step examines between stop polls.
pub(crate) const STOP_POLL_INTERVAL: usize = 32;

/// Signed improvement of `candidate` over `current`: positive when the
/// candidate is better, regardless of the optimization direction.
pub(crate) fn improvement_delta(minimizing: bool, candidate: f64, current: f64) -> f64 {
    if minimizing {
        current - candidate
    } else {
        candidate - current
    }
}

/// Whether a candidate improves on the current solution: rejected candidates
/// never do, any valid candidate improves on a rejected current solution,
/// and between valid solutions the evaluations decide.
pub(crate) fn improves_current<P, S>(
    problem: &P,
    current: &crate::context::CurrentSolution<S>,
    evaluation: &dyn Evaluation,
    validation: &dyn Validation,
) -> bool
where
    S: Solution,
    P: Problem<S>,
{
    if problem.rejects(validation) {
        return false;
    }
    if problem.rejects(current.validation.as_ref()) {
        return true;
    }
    problem.is_improvement(evaluation, current.evaluation.as_ref())
}

/// Delta-evaluates a move against the current solution, going through the
/// given move cache.
pub(crate) fn evaluate_move_cached<S, P, M>(
    ctx: &SearchContext<S, P>,
    cache: &mut dyn EvaluatedMoveCache<M>,
    mv: &M,
) -> Result<(Arc<dyn Evaluation>, Arc<dyn Validation>)>
where
    S: Solution,
    P: Problem<S>,
    M: Move<S> + Clone + Eq,
{
    if let (Some(evaluation), Some(validation)) =
        (cache.cached_evaluation(mv), cache.cached_validation(mv))
    {
        return Ok((evaluation, validation));
    }
    let (evaluation, validation) = ctx.delta(mv)?;
    cache.cache_evaluation(mv, Arc::clone(&evaluation));
    cache.cache_validation(mv, Arc::clone(&validation));
    Ok((evaluation, validation))
}

//! Objective trait definition.

use crate::error::Result;
use crate::evaluation::Evaluation;
use crate::moves::Move;
use crate::solution::Solution;

/// An objective function over solutions of type `S` and problem data `D`.
///
/// Objectives are evaluated in full with [`evaluate`](Objective::evaluate)
/// and incrementally with [`evaluate_delta`](Objective::evaluate_delta). The
/// delta path receives the move that is about to be applied together with the
/// current solution and its evaluation, and must return an evaluation equal
/// (within numeric tolerance) to fully evaluating the modified solution.
///
/// The default delta implementation copies the solution, applies the move and
/// evaluates in full. Implementations should override it when the objective
/// admits a cheaper incremental computation; such overrides typically inspect
/// the concrete move through [`Move::as_any`] and return
/// [`LocusError::IncompatibleDeltaEvaluation`] for variants they do not
/// recognize.
///
/// [`LocusError::IncompatibleDeltaEvaluation`]: crate::LocusError::IncompatibleDeltaEvaluation
pub trait Objective<S: Solution, D>: Send + Sync {
    /// Fully evaluates the given solution. Deterministic given its inputs.
    fn evaluate(&self, solution: &S, data: &D) -> Box<dyn Evaluation>;

    /// Returns true if lower values are better.
    ///
    /// "Better than" is `<` when minimizing and `>` when maximizing.
    fn is_minimizing(&self) -> bool {
        false
    }

    /// Evaluates the solution obtained by applying `mv` to `solution`,
    /// given the current evaluation of `solution`.
    fn evaluate_delta(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        current: &dyn Evaluation,
        data: &D,
    ) -> Result<Box<dyn Evaluation>> {
        let _ = current;
        let mut modified = solution.clone();
        mv.apply(&mut modified)?;
        Ok(self.evaluate(&modified, data))
    }
}

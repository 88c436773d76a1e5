//! Constraint trait definitions.

use crate::error::Result;
use crate::moves::Move;
use crate::solution::Solution;
use crate::validation::{PenalizingValidation, Validation};

/// Identity of a penalizing constraint within a problem.
///
/// Assigned when the constraint is registered and stable for the lifetime of
/// the problem. Penalized evaluations key their per-constraint validations on
/// this identity so that delta paths can resolve the previous validation of a
/// specific constraint regardless of registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PenalizingConstraintId(u64);

impl PenalizingConstraintId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// A mandatory constraint: solutions that fail it are rejected outright.
///
/// Like objectives, constraints offer a full and a delta validation path; the
/// default delta copies the solution, applies the move and validates in full.
/// Overrides that exploit a specific move variant return
/// [`LocusError::IncompatibleDeltaValidation`] for variants they do not
/// recognize.
///
/// [`LocusError::IncompatibleDeltaValidation`]: crate::LocusError::IncompatibleDeltaValidation
pub trait Constraint<S: Solution, D>: Send + Sync {
    /// Fully validates the given solution.
    fn validate(&self, solution: &S, data: &D) -> Box<dyn Validation>;

    /// Validates the solution obtained by applying `mv` to `solution`,
    /// given the current validation of `solution`.
    fn validate_delta(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        current: &dyn Validation,
        data: &D,
    ) -> Result<Box<dyn Validation>> {
        let _ = current;
        let mut modified = solution.clone();
        mv.apply(&mut modified)?;
        Ok(self.validate(&modified, data))
    }
}

/// A soft constraint that penalizes violations instead of rejecting them.
///
/// The returned penalty is strictly positive iff the constraint is violated.
/// Problems fold these penalties into a [`PenalizedEvaluation`] so that
/// violating solutions remain comparable but always score worse than they
/// would unpenalized.
///
/// [`PenalizedEvaluation`]: crate::PenalizedEvaluation
pub trait PenalizingConstraint<S: Solution, D>: Send + Sync {
    /// Fully validates the given solution, assigning a penalty.
    fn validate(&self, solution: &S, data: &D) -> PenalizingValidation;

    /// Validates the solution obtained by applying `mv` to `solution`,
    /// given the current validation of `solution`.
    fn validate_delta(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        current: &PenalizingValidation,
        data: &D,
    ) -> Result<PenalizingValidation> {
        let _ = current;
        let mut modified = solution.clone();
        mv.apply(&mut modified)?;
        Ok(self.validate(&modified, data))
    }
}

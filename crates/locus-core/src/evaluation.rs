//! Evaluation result carriers.

use std::any::Any;
use std::fmt::Debug;

use crate::constraint::PenalizingConstraintId;
use crate::validation::PenalizingValidation;

/// Outcome of evaluating a solution against an objective.
///
/// The only required projection is a scalar [`value`](Evaluation::value);
/// implementations may carry arbitrary extra metadata (sums, counts, partial
/// aggregates) to make delta evaluation possible without recomputing from
/// scratch.
pub trait Evaluation: Debug + Send + Sync + 'static {
    /// Returns the scalar value of this evaluation.
    fn value(&self) -> f64;

    /// Returns self as [`Any`] so delta implementations can inspect the
    /// concrete carrier.
    fn as_any(&self) -> &dyn Any;
}

/// Evaluation that is nothing more than its scalar value.
///
/// # Example
///
/// ```
/// use locus_core::{Evaluation, SimpleEvaluation};
///
/// let eval = SimpleEvaluation::new(3.5);
/// assert_eq!(eval.value(), 3.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleEvaluation {
    value: f64,
}

impl SimpleEvaluation {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl From<f64> for SimpleEvaluation {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Evaluation for SimpleEvaluation {
    fn value(&self) -> f64 {
        self.value
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Evaluation composed of a base objective evaluation and the penalties of
/// one or more penalizing constraints.
///
/// The composed value is `base + Σ penalty` when minimizing and
/// `base − Σ penalty` when maximizing, so a violation always makes the
/// solution worse. Penalties are keyed by the identity of the constraint
/// that produced them; delta paths resolve the previous validation of a
/// specific constraint through [`penalty_validation`], never by position.
///
/// [`penalty_validation`]: PenalizedEvaluation::penalty_validation
#[derive(Debug)]
pub struct PenalizedEvaluation {
    base: Box<dyn Evaluation>,
    penalties: Vec<(PenalizingConstraintId, PenalizingValidation)>,
    minimizing: bool,
}

impl PenalizedEvaluation {
    /// Creates a penalized evaluation around a base evaluation with no
    /// penalties registered yet.
    pub fn new(base: Box<dyn Evaluation>, minimizing: bool) -> Self {
        Self {
            base,
            penalties: Vec::new(),
            minimizing,
        }
    }

    /// Registers the validation of a penalizing constraint.
    pub fn add_penalty(&mut self, id: PenalizingConstraintId, validation: PenalizingValidation) {
        self.penalties.push((id, validation));
    }

    /// Builder-style variant of [`add_penalty`](Self::add_penalty).
    pub fn with_penalty(
        mut self,
        id: PenalizingConstraintId,
        validation: PenalizingValidation,
    ) -> Self {
        self.add_penalty(id, validation);
        self
    }

    /// Returns the unpenalized objective evaluation.
    pub fn base(&self) -> &dyn Evaluation {
        self.base.as_ref()
    }

    /// Returns the validation registered for the given constraint, if any.
    pub fn penalty_validation(
        &self,
        id: PenalizingConstraintId,
    ) -> Option<&PenalizingValidation> {
        self.penalties
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, validation)| validation)
    }

    /// Returns the sum of all registered penalties.
    pub fn total_penalty(&self) -> f64 {
        self.penalties
            .iter()
            .map(|(_, validation)| validation.penalty())
            .sum()
    }

    /// Returns true if this evaluation belongs to a minimizing objective.
    pub fn is_minimizing(&self) -> bool {
        self.minimizing
    }
}

impl Evaluation for PenalizedEvaluation {
    fn value(&self) -> f64 {
        let penalty = self.total_penalty();
        if self.minimizing {
            self.base.value() + penalty
        } else {
            self.base.value() - penalty
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

//! Validation result carriers.

use std::any::Any;
use std::fmt::Debug;

/// Outcome of checking a solution against one or more constraints.
///
/// Carriers are cheap value objects produced by [`Constraint::validate`] and
/// consumed by problems and searches. Custom implementations may carry extra
/// metadata that makes delta validation possible.
///
/// [`Constraint::validate`]: crate::Constraint::validate
pub trait Validation: Debug + Send + Sync + 'static {
    /// Returns true if the validated solution satisfies the constraint.
    fn passed(&self) -> bool;

    /// Returns self as [`Any`] so delta implementations can inspect the
    /// concrete carrier.
    fn as_any(&self) -> &dyn Any;
}

/// Plain pass/fail validation.
///
/// # Example
///
/// ```
/// use locus_core::{SimpleValidation, Validation};
///
/// assert!(SimpleValidation::PASSED.passed());
/// assert!(!SimpleValidation::new(false).passed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleValidation {
    passed: bool,
}

impl SimpleValidation {
    /// A validation that passed.
    pub const PASSED: SimpleValidation = SimpleValidation { passed: true };
    /// A validation that failed.
    pub const FAILED: SimpleValidation = SimpleValidation { passed: false };

    pub fn new(passed: bool) -> Self {
        Self { passed }
    }
}

impl Validation for SimpleValidation {
    fn passed(&self) -> bool {
        self.passed
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Validation produced by a penalizing constraint.
///
/// Carries a non-negative penalty that is strictly positive iff the
/// constraint is violated. Penalizing constraints never reject a solution;
/// the penalty is folded into a [`PenalizedEvaluation`] instead.
///
/// [`PenalizedEvaluation`]: crate::PenalizedEvaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenalizingValidation {
    penalty: f64,
}

impl PenalizingValidation {
    /// A penalizing validation without any penalty.
    pub const PASSED: PenalizingValidation = PenalizingValidation { penalty: 0.0 };

    /// Creates a validation carrying the given penalty.
    ///
    /// The penalty must be non-negative; zero means the constraint passed.
    pub fn new(penalty: f64) -> Self {
        debug_assert!(penalty >= 0.0, "penalty must be non-negative");
        Self { penalty }
    }

    /// Returns the assigned penalty.
    pub fn penalty(&self) -> f64 {
        self.penalty
    }
}

impl Validation for PenalizingValidation {
    fn passed(&self) -> bool {
        self.penalty == 0.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

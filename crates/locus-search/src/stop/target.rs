//! Target evaluation criterion.

use super::{SearchProgress, StopCriterion};

/// Stops the search once the best evaluation reaches a target value:
/// at most the target when minimizing, at least the target when maximizing.
///
/// # Example
///
/// ```
/// use locus_search::stop::TargetEvaluation;
///
/// let criterion = TargetEvaluation::new(100.0);
/// ```
#[derive(Debug, Clone)]
pub struct TargetEvaluation {
    target: f64,
}

impl TargetEvaluation {
    pub fn new(target: f64) -> Self {
        Self { target }
    }
}

impl StopCriterion for TargetEvaluation {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        match progress.best_value {
            None => false,
            Some(value) => {
                if progress.minimizing {
                    value <= self.target
                } else {
                    value >= self.target
                }
            }
        }
    }
}

//! Step count criterion.

use super::{SearchProgress, StopCriterion};

/// Stops the search after an absolute number of completed steps.
///
/// # Example
///
/// ```
/// use locus_search::stop::MaxSteps;
///
/// let criterion = MaxSteps::new(10_000);
/// ```
#[derive(Debug, Clone)]
pub struct MaxSteps {
    limit: u64,
}

impl MaxSteps {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl StopCriterion for MaxSteps {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        progress.steps >= self.limit
    }
}

//! Criteria on progress without improvement.

use std::time::Duration;

use super::{SearchProgress, StopCriterion};

/// Stops the search when the best solution has not improved for the given
/// number of completed steps.
///
/// # Example
///
/// ```
/// use locus_search::stop::MaxStepsWithoutImprovement;
///
/// let criterion = MaxStepsWithoutImprovement::new(500);
/// ```
#[derive(Debug, Clone)]
pub struct MaxStepsWithoutImprovement {
    limit: u64,
}

impl MaxStepsWithoutImprovement {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl StopCriterion for MaxStepsWithoutImprovement {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        progress.steps_since_improvement >= self.limit
    }
}

/// Stops the search when the best solution has not improved for the given
/// wall-clock duration.
///
/// # Example
///
/// ```
/// use locus_search::stop::MaxTimeWithoutImprovement;
///
/// let criterion = MaxTimeWithoutImprovement::seconds(5);
/// ```
#[derive(Debug, Clone)]
pub struct MaxTimeWithoutImprovement {
    limit: Duration,
}

impl MaxTimeWithoutImprovement {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn seconds(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

impl StopCriterion for MaxTimeWithoutImprovement {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        progress.time_since_improvement >= self.limit
    }
}

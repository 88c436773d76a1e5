//! Wall-clock runtime criterion.

use std::time::Duration;

use super::{SearchProgress, StopCriterion};

/// Stops the search after a wall-clock budget, measured from the start of
/// the current run.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use locus_search::stop::MaxRuntime;
///
/// let criterion = MaxRuntime::new(Duration::from_secs(30));
/// let criterion = MaxRuntime::seconds(30);
/// let criterion = MaxRuntime::millis(500);
/// ```
#[derive(Debug, Clone)]
pub struct MaxRuntime {
    limit: Duration,
}

impl MaxRuntime {
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

impl StopCriterion for MaxRuntime {
    fn should_stop(&self, progress: &SearchProgress) -> bool {
        progress.runtime >= self.limit
    }
}

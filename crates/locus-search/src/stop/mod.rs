//! Stop criteria for searches.

mod composite;
mod runtime;
mod steps;
mod target;
mod unimproved;

use std::fmt::Debug;
use std::time::Duration;

use locus_core::Result;

use crate::algorithm::SearchDescriptor;

pub use composite::{AllCriteria, AnyCriterion};
pub use runtime::MaxRuntime;
pub use steps::MaxSteps;
pub use target::TargetEvaluation;
pub use unimproved::{MaxStepsWithoutImprovement, MaxTimeWithoutImprovement};

/// Snapshot of a run's progress, handed to stop criteria when they are
/// polled.
#[derive(Debug, Clone)]
pub struct SearchProgress {
    /// Time elapsed since the current run started.
    pub runtime: Duration,
    /// Completed steps in the current run.
    pub steps: u64,
    /// Completed steps since the best solution last improved.
    pub steps_since_improvement: u64,
    /// Time since the best solution last improved; equals `runtime` while no
    /// solution has been accepted yet.
    pub time_since_improvement: Duration,
    /// Value of the best evaluation so far, if any solution was accepted.
    pub best_value: Option<f64>,
    /// Improvement direction of the problem's objective.
    pub minimizing: bool,
}

/// A pollable predicate deciding when a search should stop.
///
/// Criteria are polled at least once per completed step; searches with long
/// step phases poll more often. Criteria must be cheap and side-effect free.
pub trait StopCriterion: Send + Sync + Debug {
    /// Returns true if the search should stop now.
    fn should_stop(&self, progress: &SearchProgress) -> bool;

    /// Checks whether this criterion can be attached to the described
    /// search; incompatible attachments return
    /// [`LocusError::IncompatibleStopCriterion`].
    ///
    /// [`LocusError::IncompatibleStopCriterion`]: locus_core::LocusError::IncompatibleStopCriterion
    fn check_attachment(&self, _descriptor: &SearchDescriptor) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests;

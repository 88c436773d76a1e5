//! Search algorithm contract.

use locus_core::{Problem, Result, Solution};

use crate::context::SearchContext;

/// Outcome of a single search step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Keep stepping.
    Continue,
    /// The algorithm is done (neighbourhood exhausted, iterator drained,
    /// target reached); wind the run down.
    Finished,
}

/// Static description of a search, used for compatibility checks when
/// attaching stop criteria and listeners.
#[derive(Debug, Clone)]
pub struct SearchDescriptor {
    /// The search's name.
    pub name: String,
    /// Whether the search tracks a current solution (a local search).
    pub local_search: bool,
}

/// The per-step core of a search algorithm.
///
/// The outer [`Search`] driver owns the lifecycle: status transitions,
/// stop-criterion polling, listener dispatch, best-ever tracking and timing.
/// Implementations only provide the step routine, plus optional hooks for
/// run setup and teardown.
///
/// [`Search`]: crate::Search
pub trait SearchAlgorithm<S: Solution, P: Problem<S>>: Send {
    /// The algorithm's name, used in logs.
    fn name(&self) -> &'static str;

    /// Whether this algorithm maintains a current solution. Local searches
    /// fire `new_current` events; others do not.
    fn is_local_search(&self) -> bool {
        true
    }

    /// Prepares a run. The default installs a current solution.
    fn init(&mut self, ctx: &mut SearchContext<S, P>) -> Result<()> {
        ctx.ensure_current()
    }

    /// Performs one step.
    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome>;

    /// Releases per-run resources; called when a run winds down, whether it
    /// stopped normally or with an error.
    fn run_finished(&mut self, _ctx: &mut SearchContext<S, P>) {}

    /// Called when the owning search is disposed.
    fn disposed(&mut self) {}
}

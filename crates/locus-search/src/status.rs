//! Search status enumeration.

use std::fmt;

/// Lifecycle status of a search.
///
/// ```text
/// Idle --start--> Initializing --ok--> Running --stop/criterion--> Terminating --> Idle
///                                                    dispose (non-terminating) --> Disposed
/// ```
///
/// A search may be started any number of times from `Idle`; `Disposed` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// Not currently running; may be (re)started.
    Idle,
    /// Between `start` and entering the step loop.
    Initializing,
    /// Executing the step loop.
    Running,
    /// Winding a run down.
    Terminating,
    /// Released; terminal.
    Disposed,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Initializing => "initializing",
            SearchStatus::Running => "running",
            SearchStatus::Terminating => "terminating",
            SearchStatus::Disposed => "disposed",
        };
        f.write_str(label)
    }
}

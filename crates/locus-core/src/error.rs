//! Error types for the locus engine.

use thiserror::Error;

/// Main error type for locus operations.
#[derive(Debug, Error)]
pub enum LocusError {
    /// A move or solution mutator violated the solution's preconditions.
    #[error("Invalid solution modification: {0}")]
    SolutionModification(String),

    /// A delta evaluation received a move or evaluation variant it cannot handle.
    #[error("Incompatible delta evaluation: {0}")]
    IncompatibleDeltaEvaluation(String),

    /// A delta validation received a move or validation variant it cannot handle.
    #[error("Incompatible delta validation: {0}")]
    IncompatibleDeltaValidation(String),

    /// A stop criterion was attached to a search that cannot satisfy it.
    #[error("Incompatible stop criterion: {0}")]
    IncompatibleStopCriterion(String),

    /// A listener was attached to a search that cannot satisfy it.
    #[error("Incompatible search listener: {0}")]
    IncompatibleSearchListener(String),

    /// Invalid search operation: configuration change while active, start with
    /// no children, a failed parallel worker, or a disposed search.
    #[error("Search error: {0}")]
    Search(String),
}

/// Result type alias for locus operations.
pub type Result<T> = std::result::Result<T, LocusError>;

//! Subset problem data contract.

use std::collections::BTreeSet;

/// Data backing a subset-selection problem.
///
/// The only obligation towards the engine is exposing the universe of
/// selectable ids; objectives and constraints access their domain fields
/// through the concrete data type.
pub trait SubsetData: Send + Sync {
    /// Returns the universe of selectable ids.
    fn ids(&self) -> &BTreeSet<usize>;
}

impl SubsetData for BTreeSet<usize> {
    fn ids(&self) -> &BTreeSet<usize> {
        self
    }
}

//! Subset neighbourhoods.
//!
//! Every neighbourhood in this module produces [`SubsetMove`]s and accepts an
//! optional set of fixed ids that are never added to or removed from the
//! selection: add candidates are `unselected \ fixed`, remove candidates are
//! `selected \ fixed`.
//!
//! All disabled cases — capacity reached, floor reached, empty candidate
//! sets — are reported uniformly as `None` from `random_move` and as an
//! empty enumeration from `all_moves`.

mod disjoint_multi_addition;
mod disjoint_multi_deletion;
mod disjoint_multi_swap;
mod multi_addition;
mod multi_deletion;
mod multi_swap;
mod single_addition;
mod single_deletion;
mod single_perturbation;
mod single_swap;

use std::collections::BTreeSet;

use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;

pub use disjoint_multi_addition::DisjointMultiAdditionNeighbourhood;
pub use disjoint_multi_deletion::DisjointMultiDeletionNeighbourhood;
pub use disjoint_multi_swap::DisjointMultiSwapNeighbourhood;
pub use multi_addition::MultiAdditionNeighbourhood;
pub use multi_deletion::MultiDeletionNeighbourhood;
pub use multi_swap::MultiSwapNeighbourhood;
pub use single_addition::SingleAdditionNeighbourhood;
pub use single_deletion::SingleDeletionNeighbourhood;
pub use single_perturbation::SinglePerturbationNeighbourhood;
pub use single_swap::SingleSwapNeighbourhood;

/// Ids that may be added to the selection, sorted.
pub(crate) fn add_candidates(
    solution: &SubsetSolution,
    fixed: Option<&BTreeSet<usize>>,
) -> Vec<usize> {
    match fixed {
        None => solution.unselected().iter().copied().collect(),
        Some(fixed) => solution
            .unselected()
            .iter()
            .copied()
            .filter(|id| !fixed.contains(id))
            .collect(),
    }
}

/// Ids that may be removed from the selection, sorted.
pub(crate) fn remove_candidates(
    solution: &SubsetSolution,
    fixed: Option<&BTreeSet<usize>>,
) -> Vec<usize> {
    match fixed {
        None => solution.selected().iter().copied().collect(),
        Some(fixed) => solution
            .selected()
            .iter()
            .copied()
            .filter(|id| !fixed.contains(id))
            .collect(),
    }
}

/// Builds a general move adding the given candidate ids.
pub(crate) fn addition_of(ids: impl IntoIterator<Item = usize>) -> SubsetMove {
    SubsetMove::General {
        add: ids.into_iter().collect(),
        remove: BTreeSet::new(),
    }
}

/// Builds a general move removing the given candidate ids.
pub(crate) fn deletion_of(ids: impl IntoIterator<Item = usize>) -> SubsetMove {
    SubsetMove::General {
        add: BTreeSet::new(),
        remove: ids.into_iter().collect(),
    }
}

/// Builds a general move exchanging the given candidate id sets.
pub(crate) fn swap_of(
    add: impl IntoIterator<Item = usize>,
    remove: impl IntoIterator<Item = usize>,
) -> SubsetMove {
    SubsetMove::General {
        add: add.into_iter().collect(),
        remove: remove.into_iter().collect(),
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;

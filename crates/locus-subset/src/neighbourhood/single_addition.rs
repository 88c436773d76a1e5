//! Single-addition neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::{Rng, RngCore};

use super::add_candidates;
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;

/// Neighbourhood that selects one currently unselected id.
///
/// Disabled when the optional maximum selection size is reached or no add
/// candidate remains.
///
/// # Example
///
/// ```
/// use locus_core::Neighbourhood;
/// use locus_subset::neighbourhood::SingleAdditionNeighbourhood;
/// use locus_subset::SubsetSolution;
///
/// let neighbourhood = SingleAdditionNeighbourhood::new().with_max_size(2);
/// let solution = SubsetSolution::new(0..4);
/// assert_eq!(neighbourhood.all_moves(&solution).len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SingleAdditionNeighbourhood {
    max_size: Option<usize>,
    fixed: Option<BTreeSet<usize>>,
}

impl SingleAdditionNeighbourhood {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the selection size; no move is generated at or above the cap.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Excludes the given ids from being added.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.fixed = Some(ids.into_iter().collect());
        self
    }

    fn capacity_reached(&self, solution: &SubsetSolution) -> bool {
        self.max_size
            .is_some_and(|max| solution.selected_count() >= max)
    }
}

impl Neighbourhood<SubsetSolution> for SingleAdditionNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        if self.capacity_reached(solution) {
            return None;
        }
        let candidates = add_candidates(solution, self.fixed.as_ref());
        if candidates.is_empty() {
            return None;
        }
        let id = candidates[rng.random_range(0..candidates.len())];
        Some(SubsetMove::addition(id))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        if self.capacity_reached(solution) {
            return Vec::new();
        }
        add_candidates(solution, self.fixed.as_ref())
            .into_iter()
            .map(SubsetMove::addition)
            .collect()
    }
}

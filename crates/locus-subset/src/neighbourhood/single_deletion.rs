//! Single-deletion neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::{Rng, RngCore};

use super::remove_candidates;
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;

/// Neighbourhood that deselects one currently selected id.
///
/// Disabled when the optional minimum selection size is reached or no remove
/// candidate remains.
#[derive(Debug, Clone, Default)]
pub struct SingleDeletionNeighbourhood {
    min_size: Option<usize>,
    fixed: Option<BTreeSet<usize>>,
}

impl SingleDeletionNeighbourhood {
    pub fn new() -> Self {
        Self::default()
    }

    /// Floors the selection size; no move is generated at or below the floor.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = Some(min_size);
        self
    }

    /// Excludes the given ids from being removed.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.fixed = Some(ids.into_iter().collect());
        self
    }

    fn floor_reached(&self, solution: &SubsetSolution) -> bool {
        self.min_size
            .is_some_and(|min| solution.selected_count() <= min)
    }
}

impl Neighbourhood<SubsetSolution> for SingleDeletionNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        if self.floor_reached(solution) {
            return None;
        }
        let candidates = remove_candidates(solution, self.fixed.as_ref());
        if candidates.is_empty() {
            return None;
        }
        let id = candidates[rng.random_range(0..candidates.len())];
        Some(SubsetMove::deletion(id))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        if self.floor_reached(solution) {
            return Vec::new();
        }
        remove_candidates(solution, self.fixed.as_ref())
            .into_iter()
            .map(SubsetMove::deletion)
            .collect()
    }
}

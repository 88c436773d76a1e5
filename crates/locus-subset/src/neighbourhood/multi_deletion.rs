//! Multi-deletion neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::{Rng, RngCore};

use super::{deletion_of, remove_candidates};
use crate::iter::k_subsets;
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;
use crate::util;

/// Neighbourhood that deselects up to `max_deletions` selected ids at once.
///
/// Disabled when the optional minimum selection size is reached or no remove
/// candidate remains.
#[derive(Debug, Clone)]
pub struct MultiDeletionNeighbourhood {
    max_deletions: usize,
    min_size: Option<usize>,
    fixed: Option<BTreeSet<usize>>,
}

impl MultiDeletionNeighbourhood {
    /// Creates a neighbourhood removing between 1 and `max_deletions` ids.
    ///
    /// # Panics
    ///
    /// Panics if `max_deletions` is zero.
    pub fn new(max_deletions: usize) -> Self {
        assert!(max_deletions >= 1, "at least one deletion is required");
        Self {
            max_deletions,
            min_size: None,
            fixed: None,
        }
    }

    /// Floors the selection size; moves never shrink the selection below it.
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = Some(min_size);
        self
    }

    /// Excludes the given ids from being removed.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.fixed = Some(ids.into_iter().collect());
        self
    }

    fn removable(&self, solution: &SubsetSolution) -> usize {
        solution
            .selected_count()
            .saturating_sub(self.min_size.unwrap_or(0))
    }
}

impl Neighbourhood<SubsetSolution> for MultiDeletionNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        let candidates = remove_candidates(solution, self.fixed.as_ref());
        let max_k = self
            .max_deletions
            .min(candidates.len())
            .min(self.removable(solution));
        if max_k == 0 {
            return None;
        }
        let k = rng.random_range(1..=max_k);
        Some(deletion_of(util::sample_ids(&candidates, k, rng)))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        let candidates = remove_candidates(solution, self.fixed.as_ref());
        let max_k = self
            .max_deletions
            .min(candidates.len())
            .min(self.removable(solution));
        let mut moves = Vec::new();
        for k in 1..=max_k {
            for indices in k_subsets(candidates.len(), k) {
                moves.push(deletion_of(indices.iter().map(|&i| candidates[i])));
            }
        }
        moves
    }
}

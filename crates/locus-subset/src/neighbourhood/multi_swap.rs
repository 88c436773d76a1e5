//! Multi-swap neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::{Rng, RngCore};

use super::{add_candidates, remove_candidates, swap_of};
use crate::iter::k_subsets;
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;
use crate::util;

/// Neighbourhood that exchanges up to `max_swaps` pairs of ids at once,
/// keeping the selection size constant.
///
/// Disabled when either candidate set is empty.
#[derive(Debug, Clone)]
pub struct MultiSwapNeighbourhood {
    max_swaps: usize,
    fixed: Option<BTreeSet<usize>>,
}

impl MultiSwapNeighbourhood {
    /// Creates a neighbourhood swapping between 1 and `max_swaps` id pairs.
    ///
    /// # Panics
    ///
    /// Panics if `max_swaps` is zero.
    pub fn new(max_swaps: usize) -> Self {
        assert!(max_swaps >= 1, "at least one swap is required");
        Self {
            max_swaps,
            fixed: None,
        }
    }

    /// Excludes the given ids from both sides of the swap.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.fixed = Some(ids.into_iter().collect());
        self
    }
}

impl Neighbourhood<SubsetSolution> for MultiSwapNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        let adds = add_candidates(solution, self.fixed.as_ref());
        let removes = remove_candidates(solution, self.fixed.as_ref());
        let max_k = self.max_swaps.min(adds.len()).min(removes.len());
        if max_k == 0 {
            return None;
        }
        let k = rng.random_range(1..=max_k);
        Some(swap_of(
            util::sample_ids(&adds, k, rng),
            util::sample_ids(&removes, k, rng),
        ))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        let adds = add_candidates(solution, self.fixed.as_ref());
        let removes = remove_candidates(solution, self.fixed.as_ref());
        let max_k = self.max_swaps.min(adds.len()).min(removes.len());
        let mut moves = Vec::new();
        for k in 1..=max_k {
            let add_subsets = k_subsets(adds.len(), k);
            let remove_subsets = k_subsets(removes.len(), k);
            for add_indices in &add_subsets {
                for remove_indices in &remove_subsets {
                    moves.push(swap_of(
                        add_indices.iter().map(|&i| adds[i]),
                        remove_indices.iter().map(|&i| removes[i]),
                    ));
                }
            }
        }
        moves
    }
}

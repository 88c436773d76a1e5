//! Disjoint multi-swap neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::RngCore;

use super::{add_candidates, remove_candidates, swap_of};
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;
use crate::util;

/// Neighbourhood that exchanges exactly `swaps` pairs of ids per move, or
/// fewer when a candidate side runs short.
///
/// `all_moves` pairs consecutive groups of add and remove candidates, so the
/// enumerated moves touch mutually disjoint ids: every move swaps exactly
/// `swaps` pairs except possibly a single final remainder move.
///
/// Disabled when either candidate set is empty.
#[derive(Debug, Clone)]
pub struct DisjointMultiSwapNeighbourhood {
    swaps: usize,
    fixed: Option<BTreeSet<usize>>,
}

impl DisjointMultiSwapNeighbourhood {
    /// Creates a neighbourhood swapping `swaps` id pairs per move.
    ///
    /// # Panics
    ///
    /// Panics if `swaps` is zero.
    pub fn new(swaps: usize) -> Self {
        assert!(swaps >= 1, "at least one swap is required");
        Self { swaps, fixed: None }
    }

    /// Excludes the given ids from both sides of the swap.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.fixed = Some(ids.into_iter().collect());
        self
    }
}

impl Neighbourhood<SubsetSolution> for DisjointMultiSwapNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        let adds = add_candidates(solution, self.fixed.as_ref());
        let removes = remove_candidates(solution, self.fixed.as_ref());
        let count = self.swaps.min(adds.len()).min(removes.len());
        if count == 0 {
            return None;
        }
        Some(swap_of(
            util::sample_ids(&adds, count, rng),
            util::sample_ids(&removes, count, rng),
        ))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        let adds = add_candidates(solution, self.fixed.as_ref());
        let removes = remove_candidates(solution, self.fixed.as_ref());
        let count = self.swaps.min(adds.len()).min(removes.len());
        if count == 0 {
            return Vec::new();
        }
        let mut moves = Vec::new();
        for (add_chunk, remove_chunk) in adds.chunks(count).zip(removes.chunks(count)) {
            let pair_count = add_chunk.len().min(remove_chunk.len());
            moves.push(swap_of(
                add_chunk[..pair_count].iter().copied(),
                remove_chunk[..pair_count].iter().copied(),
            ));
        }
        moves
    }
}

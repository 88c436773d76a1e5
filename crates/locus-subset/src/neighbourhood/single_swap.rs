//! Single-swap neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::{Rng, RngCore};

use super::{add_candidates, remove_candidates};
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;

/// Neighbourhood that exchanges one selected id for one unselected id,
/// keeping the selection size constant.
///
/// Disabled when either candidate set is empty.
#[derive(Debug, Clone, Default)]
pub struct SingleSwapNeighbourhood {
    fixed: Option<BTreeSet<usize>>,
}

impl SingleSwapNeighbourhood {
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes the given ids from both sides of the swap.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.fixed = Some(ids.into_iter().collect());
        self
    }
}

impl Neighbourhood<SubsetSolution> for SingleSwapNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        let adds = add_candidates(solution, self.fixed.as_ref());
        let removes = remove_candidates(solution, self.fixed.as_ref());
        if adds.is_empty() || removes.is_empty() {
            return None;
        }
        let add = adds[rng.random_range(0..adds.len())];
        let remove = removes[rng.random_range(0..removes.len())];
        Some(SubsetMove::swap(add, remove))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        let adds = add_candidates(solution, self.fixed.as_ref());
        let removes = remove_candidates(solution, self.fixed.as_ref());
        let mut moves = Vec::with_capacity(adds.len() * removes.len());
        for &add in &adds {
            for &remove in &removes {
                moves.push(SubsetMove::swap(add, remove));
            }
        }
        moves
    }
}

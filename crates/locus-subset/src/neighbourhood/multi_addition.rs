//! Multi-addition neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::{Rng, RngCore};

use super::{add_candidates, addition_of};
use crate::iter::k_subsets;
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;
use crate::util;

/// Neighbourhood that selects up to `max_additions` unselected ids at once.
///
/// `random_move` draws the number of additions uniformly from the feasible
/// range before sampling the ids; `all_moves` enumerates every candidate
/// subset of each feasible cardinality in revolving-door order.
///
/// Disabled when the optional maximum selection size is reached or no add
/// candidate remains.
#[derive(Debug, Clone)]
pub struct MultiAdditionNeighbourhood {
    max_additions: usize,
    max_size: Option<usize>,
    fixed: Option<BTreeSet<usize>>,
}

impl MultiAdditionNeighbourhood {
    /// Creates a neighbourhood adding between 1 and `max_additions` ids.
    ///
    /// # Panics
    ///
    /// Panics if `max_additions` is zero.
    pub fn new(max_additions: usize) -> Self {
        assert!(max_additions >= 1, "at least one addition is required");
        Self {
            max_additions,
            max_size: None,
            fixed: None,
        }
    }

    /// Caps the selection size; moves never grow the selection past the cap.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Excludes the given ids from being added.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.fixed = Some(ids.into_iter().collect());
        self
    }

    fn capacity(&self, solution: &SubsetSolution) -> usize {
        self.max_size
            .map_or(usize::MAX, |max| max.saturating_sub(solution.selected_count()))
    }
}

impl Neighbourhood<SubsetSolution> for MultiAdditionNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        let candidates = add_candidates(solution, self.fixed.as_ref());
        let max_k = self
            .max_additions
            .min(candidates.len())
            .min(self.capacity(solution));
        if max_k == 0 {
            return None;
        }
        let k = rng.random_range(1..=max_k);
        Some(addition_of(util::sample_ids(&candidates, k, rng)))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        let candidates = add_candidates(solution, self.fixed.as_ref());
        let max_k = self
            .max_additions
            .min(candidates.len())
            .min(self.capacity(solution));
        let mut moves = Vec::new();
        for k in 1..=max_k {
            for indices in k_subsets(candidates.len(), k) {
                moves.push(addition_of(indices.iter().map(|&i| candidates[i])));
            }
        }
        moves
    }
}

//! Disjoint multi-addition neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::RngCore;

use super::{add_candidates, addition_of};
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;
use crate::util;

/// Neighbourhood that selects exactly `additions` unselected ids per move,
/// or fewer when fewer candidates remain or the size cap would be exceeded.
///
/// `all_moves` partitions the candidates into consecutive groups, so the
/// enumerated moves are mutually disjoint: every move adds exactly
/// `additions` ids except possibly a single final remainder move.
///
/// Disabled when no add candidate remains.
#[derive(Debug, Clone)]
pub struct DisjointMultiAdditionNeighbourhood {
    additions: usize,
    max_size: Option<usize>,
    fixed: Option<BTreeSet<usize>>,
}

impl DisjointMultiAdditionNeighbourhood {
    /// Creates a neighbourhood adding `additions` ids per move.
    ///
    /// # Panics
    ///
    /// Panics if `additions` is zero.
    pub fn new(additions: usize) -> Self {
        assert!(additions >= 1, "at least one addition is required");
        Self {
            additions,
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

impl Neighbourhood<SubsetSolution> for DisjointMultiAdditionNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        let candidates = add_candidates(solution, self.fixed.as_ref());
        let count = self
            .additions
            .min(candidates.len())
            .min(self.capacity(solution));
        if count == 0 {
            return None;
        }
        Some(addition_of(util::sample_ids(&candidates, count, rng)))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        let candidates = add_candidates(solution, self.fixed.as_ref());
        let chunk_size = self.additions.min(self.capacity(solution));
        if chunk_size == 0 || candidates.is_empty() {
            return Vec::new();
        }
        candidates
            .chunks(chunk_size)
            .map(|chunk| addition_of(chunk.iter().copied()))
            .collect()
    }
}

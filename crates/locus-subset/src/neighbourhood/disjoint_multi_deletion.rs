//! Disjoint multi-deletion neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::RngCore;

use super::{deletion_of, remove_candidates};
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;
use crate::util;

/// Neighbourhood that deselects exactly `deletions` selected ids per move,
/// or fewer when fewer candidates remain or the size floor would be crossed.
///
/// `all_moves` partitions the candidates into consecutive groups, so the
/// enumerated moves are mutually disjoint: every move removes exactly
/// `deletions` ids except possibly a single final remainder move.
///
/// Disabled when no remove candidate remains.
#[derive(Debug, Clone)]
pub struct DisjointMultiDeletionNeighbourhood {
    deletions: usize,
    min_size: Option<usize>,
    fixed: Option<BTreeSet<usize>>,
}

impl DisjointMultiDeletionNeighbourhood {
    /// Creates a neighbourhood removing `deletions` ids per move.
    ///
    /// # Panics
    ///
    /// Panics if `deletions` is zero.
    pub fn new(deletions: usize) -> Self {
        assert!(deletions >= 1, "at least one deletion is required");
        Self {
            deletions,
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

impl Neighbourhood<SubsetSolution> for DisjointMultiDeletionNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        let candidates = remove_candidates(solution, self.fixed.as_ref());
        let count = self
            .deletions
            .min(candidates.len())
            .min(self.removable(solution));
        if count == 0 {
            return None;
        }
        Some(deletion_of(util::sample_ids(&candidates, count, rng)))
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        let candidates = remove_candidates(solution, self.fixed.as_ref());
        let chunk_size = self.deletions.min(self.removable(solution));
        if chunk_size == 0 || candidates.is_empty() {
            return Vec::new();
        }
        candidates
            .chunks(chunk_size)
            .map(|chunk| deletion_of(chunk.iter().copied()))
            .collect()
    }
}

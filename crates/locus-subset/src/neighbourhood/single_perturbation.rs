//! Single-perturbation neighbourhood.

use std::collections::BTreeSet;

use locus_core::Neighbourhood;
use rand::{Rng, RngCore};
use smallvec::SmallVec;

use super::{add_candidates, remove_candidates};
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Addition,
    Deletion,
    Swap,
}

/// Neighbourhood that perturbs the selection with a single addition,
/// deletion or swap, whichever respects the size window `[min_size,
/// max_size]`.
///
/// Disabled when all three move kinds are.
#[derive(Debug, Clone)]
pub struct SinglePerturbationNeighbourhood {
    min_size: usize,
    max_size: usize,
    fixed: Option<BTreeSet<usize>>,
}

impl SinglePerturbationNeighbourhood {
    /// Creates a perturbation neighbourhood respecting the given size window.
    ///
    /// # Panics
    ///
    /// Panics if `min_size > max_size`.
    pub fn new(min_size: usize, max_size: usize) -> Self {
        assert!(
            min_size <= max_size,
            "minimum subset size exceeds maximum subset size"
        );
        Self {
            min_size,
            max_size,
            fixed: None,
        }
    }

    /// Excludes the given ids from being added or removed.
    pub fn with_fixed_ids(mut self, ids: impl IntoIterator<Item = usize>) -> Self {
        self.fixed = Some(ids.into_iter().collect());
        self
    }

    fn enabled_kinds(
        &self,
        solution: &SubsetSolution,
        adds: &[usize],
        removes: &[usize],
    ) -> SmallVec<[Kind; 3]> {
        let size = solution.selected_count();
        let mut kinds = SmallVec::new();
        if size < self.max_size && !adds.is_empty() {
            kinds.push(Kind::Addition);
        }
        if size > self.min_size && !removes.is_empty() {
            kinds.push(Kind::Deletion);
        }
        if !adds.is_empty() && !removes.is_empty() {
            kinds.push(Kind::Swap);
        }
        kinds
    }
}

impl Neighbourhood<SubsetSolution> for SinglePerturbationNeighbourhood {
    type Move = SubsetMove;

    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<SubsetMove> {
        let adds = add_candidates(solution, self.fixed.as_ref());
        let removes = remove_candidates(solution, self.fixed.as_ref());
        let kinds = self.enabled_kinds(solution, &adds, &removes);
        if kinds.is_empty() {
            return None;
        }
        let kind = kinds[rng.random_range(0..kinds.len())];
        match kind {
            Kind::Addition => {
                let id = adds[rng.random_range(0..adds.len())];
                Some(SubsetMove::addition(id))
            }
            Kind::Deletion => {
                let id = removes[rng.random_range(0..removes.len())];
                Some(SubsetMove::deletion(id))
            }
            Kind::Swap => {
                let add = adds[rng.random_range(0..adds.len())];
                let remove = removes[rng.random_range(0..removes.len())];
                Some(SubsetMove::swap(add, remove))
            }
        }
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        let adds = add_candidates(solution, self.fixed.as_ref());
        let removes = remove_candidates(solution, self.fixed.as_ref());
        let kinds = self.enabled_kinds(solution, &adds, &removes);
        let mut moves = Vec::new();
        if kinds.contains(&Kind::Addition) {
            moves.extend(adds.iter().copied().map(SubsetMove::addition));
        }
        if kinds.contains(&Kind::Deletion) {
            moves.extend(removes.iter().copied().map(SubsetMove::deletion));
        }
        if kinds.contains(&Kind::Swap) {
            for &add in &adds {
                for &remove in &removes {
                    moves.push(SubsetMove::swap(add, remove));
                }
            }
        }
        moves
    }
}

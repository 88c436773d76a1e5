//! Revolving-door subset enumeration.

use std::collections::BTreeSet;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::solution::SubsetSolution;

type IndexSubset = SmallVec<[usize; 8]>;

/// Generates all k-subsets of `{0, .., n-1}` in revolving-door
/// (minimum-change) order: consecutive subsets differ by the exchange of
/// exactly one element, and the first subset is `{0, .., k-1}`.
///
/// Built with the classic recursion `R(n, k) = R(n-1, k) ++
/// reverse(R(n-1, k-1)) * (n-1)` (Kreher–Stinson ordering).
pub(crate) fn k_subsets(n: usize, k: usize) -> Vec<IndexSubset> {
    if k == 0 {
        return vec![SmallVec::new()];
    }
    if k > n {
        return Vec::new();
    }
    if k == n {
        return vec![(0..n).collect()];
    }
    let mut subsets = k_subsets(n - 1, k);
    let mut tail = k_subsets(n - 1, k - 1);
    tail.reverse();
    for subset in &mut tail {
        subset.push(n - 1);
    }
    subsets.extend(tail);
    subsets
}

/// One-shot iterator over every subset of a universe with sizes in `[a, b]`,
/// in revolving-door order within each size class.
///
/// The iterator is not restartable; create a new one to enumerate again.
///
/// # Example
///
/// ```
/// use locus_subset::SubsetIterator;
///
/// // C(4,1) + C(4,2) = 4 + 6 subsets.
/// let count = SubsetIterator::new(0..4, 1, 2).count();
/// assert_eq!(count, 10);
/// ```
pub struct SubsetIterator {
    ids: Vec<usize>,
    current_size: usize,
    max_size: usize,
    pending: std::vec::IntoIter<IndexSubset>,
}

impl SubsetIterator {
    /// Creates an iterator over all subsets of `ids` with sizes in
    /// `[min_size, max_size]`.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= min_size <= max_size <= |ids|`.
    pub fn new(ids: impl IntoIterator<Item = usize>, min_size: usize, max_size: usize) -> Self {
        let ids: Vec<usize> = {
            let sorted: BTreeSet<usize> = ids.into_iter().collect();
            sorted.into_iter().collect()
        };
        assert!(min_size >= 1, "minimum subset size must be at least one");
        assert!(
            min_size <= max_size,
            "minimum subset size exceeds maximum subset size"
        );
        assert!(
            max_size <= ids.len(),
            "maximum subset size exceeds the universe"
        );
        let pending = k_subsets(ids.len(), min_size).into_iter();
        Self {
            ids,
            current_size: min_size,
            max_size,
            pending,
        }
    }
}

impl Iterator for SubsetIterator {
    type Item = BTreeSet<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(indices) = self.pending.next() {
                return Some(indices.iter().map(|&i| self.ids[i]).collect());
            }
            if self.current_size >= self.max_size {
                return None;
            }
            self.current_size += 1;
            self.pending = k_subsets(self.ids.len(), self.current_size).into_iter();
        }
    }
}

/// Adapts a [`SubsetIterator`] to produce [`SubsetSolution`]s over a shared
/// universe, for use with exhaustive search.
pub struct SubsetSolutionIterator {
    universe: Arc<BTreeSet<usize>>,
    inner: SubsetIterator,
}

impl SubsetSolutionIterator {
    /// Enumerates every solution with a selection size in
    /// `[min_size, max_size]`.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= min_size <= max_size <= |ids|`.
    pub fn new(ids: &BTreeSet<usize>, min_size: usize, max_size: usize) -> Self {
        Self {
            universe: Arc::new(ids.clone()),
            inner: SubsetIterator::new(ids.iter().copied(), min_size, max_size),
        }
    }
}

impl Iterator for SubsetSolutionIterator {
    type Item = SubsetSolution;

    fn next(&mut self) -> Option<Self::Item> {
        let selected = self.inner.next()?;
        // Ids come from the universe, so the constructor cannot fail.
        SubsetSolution::with_selection(Arc::clone(&self.universe), selected).ok()
    }
}

//! Subset solution implementation.

use std::collections::BTreeSet;
use std::sync::Arc;

use locus_core::{LocusError, Result, Solution};

/// A selected/unselected partition over a fixed universe of integer ids.
///
/// The universe is immutable after construction and shared between copies;
/// `selected` and `unselected` partition it at all times. Both partitions are
/// stored sorted, so iteration order is deterministic and equal solutions
/// hash equally.
///
/// # Example
///
/// ```
/// use locus_subset::SubsetSolution;
///
/// let mut solution = SubsetSolution::new(0..5);
/// assert_eq!(solution.selected_count(), 0);
/// assert!(solution.select(2).unwrap());
/// assert!(!solution.select(2).unwrap());
/// assert!(solution.select(7).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubsetSolution {
    selected: BTreeSet<usize>,
    unselected: BTreeSet<usize>,
    all: Arc<BTreeSet<usize>>,
}

impl SubsetSolution {
    /// Creates a solution over the given universe with nothing selected.
    pub fn new(ids: impl IntoIterator<Item = usize>) -> Self {
        let all: BTreeSet<usize> = ids.into_iter().collect();
        Self {
            selected: BTreeSet::new(),
            unselected: all.clone(),
            all: Arc::new(all),
        }
    }

    /// Creates a solution over a shared universe with the given selection.
    ///
    /// Fails with [`LocusError::SolutionModification`] if any selected id is
    /// not part of the universe.
    pub fn with_selection(
        universe: Arc<BTreeSet<usize>>,
        selected: impl IntoIterator<Item = usize>,
    ) -> Result<Self> {
        let selected: BTreeSet<usize> = selected.into_iter().collect();
        if let Some(id) = selected.iter().find(|id| !universe.contains(id)) {
            return Err(LocusError::SolutionModification(format!(
                "cannot select id {id}: not part of the universe"
            )));
        }
        let unselected = universe.difference(&selected).copied().collect();
        Ok(Self {
            selected,
            unselected,
            all: universe,
        })
    }

    /// Selects the given id. Returns whether the selection changed.
    ///
    /// Fails with [`LocusError::SolutionModification`] if the id is not part
    /// of the universe.
    pub fn select(&mut self, id: usize) -> Result<bool> {
        if !self.all.contains(&id) {
            return Err(LocusError::SolutionModification(format!(
                "cannot select id {id}: not part of the universe"
            )));
        }
        if !self.unselected.remove(&id) {
            return Ok(false);
        }
        self.selected.insert(id);
        Ok(true)
    }

    /// Deselects the given id. Returns whether the selection changed.
    ///
    /// Fails with [`LocusError::SolutionModification`] if the id is not part
    /// of the universe.
    pub fn deselect(&mut self, id: usize) -> Result<bool> {
        if !self.all.contains(&id) {
            return Err(LocusError::SolutionModification(format!(
                "cannot deselect id {id}: not part of the universe"
            )));
        }
        if !self.selected.remove(&id) {
            return Ok(false);
        }
        self.unselected.insert(id);
        Ok(true)
    }

    /// Selects every id in the universe. Returns whether anything changed.
    pub fn select_all(&mut self) -> bool {
        if self.unselected.is_empty() {
            return false;
        }
        self.selected.extend(self.unselected.iter().copied());
        self.unselected.clear();
        true
    }

    /// Deselects every id. Returns whether anything changed.
    pub fn deselect_all(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.unselected.extend(self.selected.iter().copied());
        self.selected.clear();
        true
    }

    /// Returns the selected ids, sorted.
    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    /// Returns the unselected ids, sorted.
    pub fn unselected(&self) -> &BTreeSet<usize> {
        &self.unselected
    }

    /// Returns the whole universe, sorted.
    pub fn all(&self) -> &BTreeSet<usize> {
        &self.all
    }

    /// Returns the shared universe handle.
    pub fn universe(&self) -> Arc<BTreeSet<usize>> {
        Arc::clone(&self.all)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn unselected_count(&self) -> usize {
        self.unselected.len()
    }

    pub fn total_count(&self) -> usize {
        self.all.len()
    }
}

impl Solution for SubsetSolution {}

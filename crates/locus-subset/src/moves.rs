//! Subset move implementation.

use std::any::Any;
use std::collections::BTreeSet;

use locus_core::{LocusError, Move, Result};
use smallvec::SmallVec;

use crate::solution::SubsetSolution;

/// Buffer type for the ids touched by a move.
pub type MoveIds = SmallVec<[usize; 4]>;

/// A reversible mutation of a [`SubsetSolution`]: a set of ids to add to the
/// selection and a disjoint set of ids to remove from it.
///
/// Applying fails with [`LocusError::SolutionModification`] when an added id
/// is already selected or a removed id is not currently selected; in that
/// case the solution is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SubsetMove {
    /// Select one id.
    Addition { id: usize },
    /// Deselect one id.
    Deletion { id: usize },
    /// Select one id and deselect another.
    Swap { add: usize, remove: usize },
    /// Select and deselect arbitrary disjoint id sets; either may be empty.
    General {
        add: BTreeSet<usize>,
        remove: BTreeSet<usize>,
    },
}

impl SubsetMove {
    pub fn addition(id: usize) -> Self {
        SubsetMove::Addition { id }
    }

    pub fn deletion(id: usize) -> Self {
        SubsetMove::Deletion { id }
    }

    pub fn swap(add: usize, remove: usize) -> Self {
        SubsetMove::Swap { add, remove }
    }

    /// Creates a general move; the two sets must be disjoint.
    pub fn general(
        add: impl IntoIterator<Item = usize>,
        remove: impl IntoIterator<Item = usize>,
    ) -> Result<Self> {
        let add: BTreeSet<usize> = add.into_iter().collect();
        let remove: BTreeSet<usize> = remove.into_iter().collect();
        if let Some(id) = add.intersection(&remove).next() {
            return Err(LocusError::SolutionModification(format!(
                "id {id} cannot be both added and removed"
            )));
        }
        Ok(SubsetMove::General { add, remove })
    }

    /// Returns the ids this move adds to the selection.
    pub fn added_ids(&self) -> MoveIds {
        match self {
            SubsetMove::Addition { id } => SmallVec::from_slice(&[*id]),
            SubsetMove::Deletion { .. } => SmallVec::new(),
            SubsetMove::Swap { add, .. } => SmallVec::from_slice(&[*add]),
            SubsetMove::General { add, .. } => add.iter().copied().collect(),
        }
    }

    /// Returns the ids this move removes from the selection.
    pub fn removed_ids(&self) -> MoveIds {
        match self {
            SubsetMove::Addition { .. } => SmallVec::new(),
            SubsetMove::Deletion { id } => SmallVec::from_slice(&[*id]),
            SubsetMove::Swap { remove, .. } => SmallVec::from_slice(&[*remove]),
            SubsetMove::General { remove, .. } => remove.iter().copied().collect(),
        }
    }

    pub fn added_count(&self) -> usize {
        match self {
            SubsetMove::Addition { .. } | SubsetMove::Swap { .. } => 1,
            SubsetMove::Deletion { .. } => 0,
            SubsetMove::General { add, .. } => add.len(),
        }
    }

    pub fn removed_count(&self) -> usize {
        match self {
            SubsetMove::Deletion { .. } | SubsetMove::Swap { .. } => 1,
            SubsetMove::Addition { .. } => 0,
            SubsetMove::General { remove, .. } => remove.len(),
        }
    }

    fn check_applicable(&self, solution: &SubsetSolution) -> Result<()> {
        for id in self.added_ids() {
            if solution.selected().contains(&id) {
                return Err(LocusError::SolutionModification(format!(
                    "cannot add id {id}: already selected"
                )));
            }
            if !solution.all().contains(&id) {
                return Err(LocusError::SolutionModification(format!(
                    "cannot add id {id}: not part of the universe"
                )));
            }
        }
        for id in self.removed_ids() {
            if !solution.selected().contains(&id) {
                return Err(LocusError::SolutionModification(format!(
                    "cannot remove id {id}: not currently selected"
                )));
            }
        }
        Ok(())
    }

    fn check_undoable(&self, solution: &SubsetSolution) -> Result<()> {
        for id in self.added_ids() {
            if !solution.selected().contains(&id) {
                return Err(LocusError::SolutionModification(format!(
                    "cannot undo addition of id {id}: not currently selected"
                )));
            }
        }
        for id in self.removed_ids() {
            if solution.selected().contains(&id) {
                return Err(LocusError::SolutionModification(format!(
                    "cannot undo removal of id {id}: already selected"
                )));
            }
            if !solution.all().contains(&id) {
                return Err(LocusError::SolutionModification(format!(
                    "cannot undo removal of id {id}: not part of the universe"
                )));
            }
        }
        Ok(())
    }
}

impl Move<SubsetSolution> for SubsetMove {
    fn apply(&self, solution: &mut SubsetSolution) -> Result<()> {
        // Preconditions are checked up front so a failing move never leaves
        // the solution half-applied.
        self.check_applicable(solution)?;
        for id in self.added_ids() {
            solution.select(id)?;
        }
        for id in self.removed_ids() {
            solution.deselect(id)?;
        }
        Ok(())
    }

    fn undo(&self, solution: &mut SubsetSolution) -> Result<()> {
        self.check_undoable(solution)?;
        for id in self.added_ids() {
            solution.deselect(id)?;
        }
        for id in self.removed_ids() {
            solution.select(id)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Downcasts an abstract move to a [`SubsetMove`], if that is what it is.
///
/// Delta implementations that exploit the subset move structure use this and
/// report an incompatibility error for moves of any other type.
pub fn as_subset_move<S: 'static>(mv: &dyn Move<S>) -> Option<&SubsetMove> {
    mv.as_any().downcast_ref::<SubsetMove>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution_with(selected: &[usize]) -> SubsetSolution {
        let mut solution = SubsetSolution::new(0..10);
        for &id in selected {
            solution.select(id).unwrap();
        }
        solution
    }

    #[test]
    fn addition_selects() {
        let mut solution = solution_with(&[0]);
        SubsetMove::addition(3).apply(&mut solution).unwrap();
        assert!(solution.selected().contains(&3));
    }

    #[test]
    fn apply_rejects_adding_selected_ids() {
        let mut solution = solution_with(&[0]);
        let result = SubsetMove::addition(0).apply(&mut solution);
        assert!(matches!(result, Err(LocusError::SolutionModification(_))));
    }

    #[test]
    fn apply_rejects_removing_unselected_ids() {
        let mut solution = solution_with(&[0]);
        let result = SubsetMove::deletion(4).apply(&mut solution);
        assert!(matches!(result, Err(LocusError::SolutionModification(_))));
    }

    #[test]
    fn failed_apply_leaves_the_solution_untouched() {
        let mut solution = solution_with(&[0, 1]);
        let mv = SubsetMove::general([2, 0], [5]).unwrap();
        let before = solution.clone();
        assert!(mv.apply(&mut solution).is_err());
        assert_eq!(solution, before);
    }

    #[test]
    fn general_move_rejects_overlapping_sets() {
        assert!(SubsetMove::general([1, 2], [2, 3]).is_err());
        assert!(SubsetMove::general([1, 2], [3, 4]).is_ok());
    }

    #[test]
    fn apply_undo_round_trips() {
        let moves = [
            SubsetMove::addition(4),
            SubsetMove::deletion(1),
            SubsetMove::swap(5, 0),
            SubsetMove::general([6, 7], [0, 1]).unwrap(),
            SubsetMove::general([8], []).unwrap(),
            SubsetMove::general([], [0]).unwrap(),
        ];
        for mv in moves {
            let original = solution_with(&[0, 1, 2]);
            let mut solution = original.clone();
            mv.apply(&mut solution).unwrap();
            mv.undo(&mut solution).unwrap();
            assert_eq!(solution, original, "round trip failed for {mv:?}");
        }
    }

    #[test]
    fn move_equality_keys_on_the_id_sets() {
        let a = SubsetMove::general([1, 2], [3]).unwrap();
        let b = SubsetMove::general([2, 1], [3]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, SubsetMove::general([1], [3]).unwrap());
    }
}

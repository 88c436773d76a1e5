//! Subset problem implementation.

use std::collections::BTreeSet;
use std::sync::Arc;

use locus_core::{
    Constraint, Evaluation, GenericProblem, Move, Objective, PenalizingConstraint,
    PenalizingConstraintId, Problem, Result, Validation,
};
use rand::{Rng, RngCore};

use crate::data::SubsetData;
use crate::moves::as_subset_move;
use crate::solution::SubsetSolution;
use crate::util;
use crate::validation::SubsetValidation;

/// A subset-selection problem: data with an id universe, an objective and a
/// mandatory selection-size window `[min_size, max_size]`.
///
/// Random solutions draw a size uniformly from the window and then sample
/// that many ids uniformly from the universe. Validation wraps the inner
/// constraint validation in a [`SubsetValidation`] carrying the size check.
pub struct SubsetProblem<D, O>
where
    D: SubsetData,
    O: Objective<SubsetSolution, D>,
{
    base: GenericProblem<D, SubsetSolution, O>,
    min_size: usize,
    max_size: usize,
}

impl<D, O> SubsetProblem<D, O>
where
    D: SubsetData + 'static,
    O: Objective<SubsetSolution, D>,
{
    /// Creates a subset problem with the given selection-size window.
    ///
    /// # Panics
    ///
    /// Panics unless `1 <= min_size <= max_size <= |ids|`.
    pub fn new(data: D, objective: O, min_size: usize, max_size: usize) -> Self {
        let universe = Arc::new(data.ids().clone());
        assert!(min_size >= 1, "minimum subset size must be at least one");
        assert!(
            min_size <= max_size,
            "minimum subset size exceeds maximum subset size"
        );
        assert!(
            max_size <= universe.len(),
            "maximum subset size exceeds the universe"
        );
        let factory_universe = Arc::clone(&universe);
        let factory = Box::new(
            move |_data: &D, rng: &mut dyn RngCore| -> SubsetSolution {
                let size = rng.random_range(min_size..=max_size);
                let selected = util::random_subset(&factory_universe, size, rng);
                // Sampled ids come from the universe itself.
                SubsetSolution::with_selection(Arc::clone(&factory_universe), selected)
                    .unwrap_or_else(|_| SubsetSolution::new(factory_universe.iter().copied()))
            },
        );
        Self {
            base: GenericProblem::new(data, objective, factory),
            min_size,
            max_size,
        }
    }

    /// Creates a subset problem whose selections have exactly `size` ids.
    pub fn with_fixed_size(data: D, objective: O, size: usize) -> Self {
        Self::new(data, objective, size, size)
    }

    /// Registers a mandatory constraint.
    pub fn add_mandatory_constraint(
        &mut self,
        constraint: Box<dyn Constraint<SubsetSolution, D>>,
    ) {
        self.base.add_mandatory_constraint(constraint);
    }

    /// Builder-style variant of
    /// [`add_mandatory_constraint`](Self::add_mandatory_constraint).
    pub fn with_mandatory_constraint(
        mut self,
        constraint: Box<dyn Constraint<SubsetSolution, D>>,
    ) -> Self {
        self.add_mandatory_constraint(constraint);
        self
    }

    /// Registers a penalizing constraint and returns its identity.
    pub fn add_penalizing_constraint(
        &mut self,
        constraint: Box<dyn PenalizingConstraint<SubsetSolution, D>>,
    ) -> PenalizingConstraintId {
        self.base.add_penalizing_constraint(constraint)
    }

    /// Builder-style variant of
    /// [`add_penalizing_constraint`](Self::add_penalizing_constraint).
    pub fn with_penalizing_constraint(
        mut self,
        constraint: Box<dyn PenalizingConstraint<SubsetSolution, D>>,
    ) -> Self {
        self.add_penalizing_constraint(constraint);
        self
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the problem data.
    pub fn data(&self) -> &D {
        self.base.data()
    }

    fn size_within_window(&self, size: usize) -> bool {
        size >= self.min_size && size <= self.max_size
    }
}

impl<D, O> Problem<SubsetSolution> for SubsetProblem<D, O>
where
    D: SubsetData + 'static,
    O: Objective<SubsetSolution, D>,
{
    fn create_random_solution(&self, rng: &mut dyn RngCore) -> SubsetSolution {
        self.base.create_random_solution(rng)
    }

    fn evaluate(&self, solution: &SubsetSolution) -> Box<dyn Evaluation> {
        self.base.evaluate(solution)
    }

    fn evaluate_delta(
        &self,
        mv: &dyn Move<SubsetSolution>,
        solution: &SubsetSolution,
        current: &dyn Evaluation,
    ) -> Result<Box<dyn Evaluation>> {
        self.base.evaluate_delta(mv, solution, current)
    }

    fn validate(&self, solution: &SubsetSolution) -> Box<dyn Validation> {
        let inner = self.base.validate(solution);
        Box::new(SubsetValidation::new(
            self.size_within_window(solution.selected_count()),
            Some(inner),
        ))
    }

    fn validate_delta(
        &self,
        mv: &dyn Move<SubsetSolution>,
        solution: &SubsetSolution,
        current: &dyn Validation,
    ) -> Result<Box<dyn Validation>> {
        let (subset_move, subset_validation) = match (
            as_subset_move(mv),
            current.as_any().downcast_ref::<SubsetValidation>(),
        ) {
            (Some(mv), Some(validation)) => (mv, validation),
            // Unknown move or carrier: validate the modified copy in full.
            _ => {
                let mut modified = solution.clone();
                mv.apply(&mut modified)?;
                return Ok(self.validate(&modified));
            }
        };
        let new_size = solution.selected_count() + subset_move.added_count()
            - subset_move.removed_count().min(solution.selected_count());
        let inner = match subset_validation.inner() {
            Some(inner) => Some(self.base.validate_delta(mv, solution, inner)?),
            None => None,
        };
        Ok(Box::new(SubsetValidation::new(
            self.size_within_window(new_size),
            inner,
        )))
    }

    fn is_minimizing(&self) -> bool {
        self.base.is_minimizing()
    }
}

impl<D, O> SubsetProblem<D, O>
where
    D: SubsetData + 'static,
    O: Objective<SubsetSolution, D>,
{
    /// Convenience check used by callers that already hold a validation.
    pub fn rejects_solution(&self, solution: &SubsetSolution) -> bool {
        let validation = self.validate(solution);
        self.rejects(validation.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_core::SimpleEvaluation;
    use crate::moves::SubsetMove;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct SelectionSize;

    impl Objective<SubsetSolution, BTreeSet<usize>> for SelectionSize {
        fn evaluate(
            &self,
            solution: &SubsetSolution,
            _data: &BTreeSet<usize>,
        ) -> Box<dyn Evaluation> {
            Box::new(SimpleEvaluation::new(solution.selected_count() as f64))
        }
    }

    fn problem() -> SubsetProblem<BTreeSet<usize>, SelectionSize> {
        SubsetProblem::new((0..10).collect(), SelectionSize, 2, 5)
    }

    #[test]
    fn random_solutions_respect_the_size_window() {
        let problem = problem();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            let solution = problem.create_random_solution(&mut rng);
            assert!((2..=5).contains(&solution.selected_count()));
            assert_eq!(solution.total_count(), 10);
        }
    }

    #[test]
    fn validation_checks_the_size_window() {
        let problem = problem();
        let mut solution = SubsetSolution::new(0..10);
        assert!(!problem.validate(&solution).passed());
        solution.select(0).unwrap();
        solution.select(1).unwrap();
        assert!(problem.validate(&solution).passed());
        for id in 2..6 {
            solution.select(id).unwrap();
        }
        assert!(!problem.validate(&solution).passed());
    }

    #[test]
    fn delta_validation_tracks_the_new_size() {
        let problem = problem();
        let mut solution = SubsetSolution::new(0..10);
        solution.select(0).unwrap();
        let current = problem.validate(&solution);
        // One id selected: adding one lands inside the window.
        let delta = problem
            .validate_delta(&SubsetMove::addition(1), &solution, current.as_ref())
            .unwrap();
        assert!(delta.passed());
        // Removing the only selected id lands outside it.
        let delta = problem
            .validate_delta(&SubsetMove::deletion(0), &solution, current.as_ref())
            .unwrap();
        assert!(!delta.passed());
    }

    #[test]
    fn delta_validation_matches_full_validation() {
        let problem = problem();
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        for _ in 0..200 {
            let solution = problem.create_random_solution(&mut rng);
            let mv = match rng.random_range(0..3) {
                0 => solution
                    .unselected()
                    .iter()
                    .next()
                    .copied()
                    .map(SubsetMove::addition),
                1 => solution
                    .selected()
                    .iter()
                    .next()
                    .copied()
                    .map(SubsetMove::deletion),
                _ => match (
                    solution.unselected().iter().next(),
                    solution.selected().iter().next(),
                ) {
                    (Some(&add), Some(&remove)) => Some(SubsetMove::swap(add, remove)),
                    _ => None,
                },
            };
            let Some(mv) = mv else { continue };
            let current = problem.validate(&solution);
            let delta = problem
                .validate_delta(&mv, &solution, current.as_ref())
                .unwrap();
            let mut modified = solution.clone();
            mv.apply(&mut modified).unwrap();
            let full = problem.validate(&modified);
            assert_eq!(delta.passed(), full.passed());
        }
    }

    #[test]
    #[should_panic(expected = "maximum subset size exceeds the universe")]
    fn oversized_window_panics() {
        let _ = SubsetProblem::new((0..3).collect::<BTreeSet<usize>>(), SelectionSize, 1, 4);
    }
}

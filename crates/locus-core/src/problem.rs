//! Problem trait and the generic data + objective + constraints composition.

use rand::RngCore;

use crate::constraint::{Constraint, PenalizingConstraint, PenalizingConstraintId};
use crate::error::{LocusError, Result};
use crate::evaluation::{Evaluation, PenalizedEvaluation};
use crate::moves::Move;
use crate::objective::Objective;
use crate::solution::Solution;
use crate::validation::{SimpleValidation, Validation};

/// A problem a search can be run against.
///
/// A problem binds data, an objective and any number of mandatory and
/// penalizing constraints, and knows how to produce random solutions.
/// Searches borrow the problem read-only for the duration of a run and use
/// the delta paths wherever possible.
pub trait Problem<S: Solution>: Send + Sync {
    /// Creates a random solution, used to seed searches.
    fn create_random_solution(&self, rng: &mut dyn RngCore) -> S;

    /// Evaluates the given solution against the objective, folding in the
    /// penalties of any penalizing constraints.
    fn evaluate(&self, solution: &S) -> Box<dyn Evaluation>;

    /// Evaluates the solution obtained by applying `mv` to `solution`.
    fn evaluate_delta(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        current: &dyn Evaluation,
    ) -> Result<Box<dyn Evaluation>>;

    /// Validates the given solution against the mandatory constraints.
    fn validate(&self, solution: &S) -> Box<dyn Validation>;

    /// Validates the solution obtained by applying `mv` to `solution`.
    fn validate_delta(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        current: &dyn Validation,
    ) -> Result<Box<dyn Validation>>;

    /// Returns true if the objective is minimizing.
    fn is_minimizing(&self) -> bool;

    /// Returns true if a solution with the given validation is rejected.
    ///
    /// Mandatory constraints reject; penalizing constraints never do.
    fn rejects(&self, validation: &dyn Validation) -> bool {
        !validation.passed()
    }

    /// Returns true if `candidate` is strictly better than `incumbent`,
    /// honouring the improvement direction of the objective.
    fn is_improvement(&self, candidate: &dyn Evaluation, incumbent: &dyn Evaluation) -> bool {
        if self.is_minimizing() {
            candidate.value() < incumbent.value()
        } else {
            candidate.value() > incumbent.value()
        }
    }
}

/// Factory closure producing random solutions from problem data.
pub type SolutionFactory<D, S> = Box<dyn Fn(&D, &mut dyn RngCore) -> S + Send + Sync>;

/// The standard [`Problem`] composition: owned data, an objective, mandatory
/// constraints and penalizing constraints.
///
/// Mandatory validation short-circuits on the first failing constraint.
/// Whenever at least one penalizing constraint is registered, evaluations are
/// wrapped in a [`PenalizedEvaluation`] keyed by constraint identity, and the
/// delta path rebuilds that wrapper from per-constraint delta validations.
pub struct GenericProblem<D, S, O>
where
    S: Solution,
    O: Objective<S, D>,
{
    data: D,
    objective: O,
    mandatory: Vec<Box<dyn Constraint<S, D>>>,
    penalizing: Vec<(PenalizingConstraintId, Box<dyn PenalizingConstraint<S, D>>)>,
    next_penalizing_id: u64,
    factory: SolutionFactory<D, S>,
}

impl<D, S, O> GenericProblem<D, S, O>
where
    S: Solution,
    O: Objective<S, D>,
{
    /// Creates a problem from data, an objective and a random-solution
    /// factory.
    pub fn new(data: D, objective: O, factory: SolutionFactory<D, S>) -> Self {
        Self {
            data,
            objective,
            mandatory: Vec::new(),
            penalizing: Vec::new(),
            next_penalizing_id: 0,
            factory,
        }
    }

    /// Registers a mandatory constraint.
    pub fn add_mandatory_constraint(&mut self, constraint: Box<dyn Constraint<S, D>>) {
        self.mandatory.push(constraint);
    }

    /// Builder-style variant of
    /// [`add_mandatory_constraint`](Self::add_mandatory_constraint).
    pub fn with_mandatory_constraint(mut self, constraint: Box<dyn Constraint<S, D>>) -> Self {
        self.add_mandatory_constraint(constraint);
        self
    }

    /// Registers a penalizing constraint and returns its identity.
    pub fn add_penalizing_constraint(
        &mut self,
        constraint: Box<dyn PenalizingConstraint<S, D>>,
    ) -> PenalizingConstraintId {
        let id = PenalizingConstraintId::new(self.next_penalizing_id);
        self.next_penalizing_id += 1;
        self.penalizing.push((id, constraint));
        id
    }

    /// Builder-style variant of
    /// [`add_penalizing_constraint`](Self::add_penalizing_constraint).
    pub fn with_penalizing_constraint(
        mut self,
        constraint: Box<dyn PenalizingConstraint<S, D>>,
    ) -> Self {
        self.add_penalizing_constraint(constraint);
        self
    }

    /// Returns the problem data.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Returns the objective.
    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// Returns the number of registered mandatory constraints.
    pub fn mandatory_constraint_count(&self) -> usize {
        self.mandatory.len()
    }

    /// Returns the number of registered penalizing constraints.
    pub fn penalizing_constraint_count(&self) -> usize {
        self.penalizing.len()
    }
}

impl<D, S, O> Problem<S> for GenericProblem<D, S, O>
where
    D: Send + Sync,
    S: Solution,
    O: Objective<S, D>,
{
    fn create_random_solution(&self, rng: &mut dyn RngCore) -> S {
        (self.factory)(&self.data, rng)
    }

    fn evaluate(&self, solution: &S) -> Box<dyn Evaluation> {
        let base = self.objective.evaluate(solution, &self.data);
        if self.penalizing.is_empty() {
            return base;
        }
        let mut eval = PenalizedEvaluation::new(base, self.objective.is_minimizing());
        for (id, constraint) in &self.penalizing {
            eval.add_penalty(*id, constraint.validate(solution, &self.data));
        }
        Box::new(eval)
    }

    fn evaluate_delta(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        current: &dyn Evaluation,
    ) -> Result<Box<dyn Evaluation>> {
        if self.penalizing.is_empty() {
            return self
                .objective
                .evaluate_delta(mv, solution, current, &self.data);
        }
        let penalized = current
            .as_any()
            .downcast_ref::<PenalizedEvaluation>()
            .ok_or_else(|| {
                LocusError::IncompatibleDeltaEvaluation(
                    "penalizing constraints are registered but the current evaluation \
                     is not penalized"
                        .into(),
                )
            })?;
        let base =
            self.objective
                .evaluate_delta(mv, solution, penalized.base(), &self.data)?;
        let mut eval = PenalizedEvaluation::new(base, self.objective.is_minimizing());
        for (id, constraint) in &self.penalizing {
            let previous = penalized.penalty_validation(*id).ok_or_else(|| {
                LocusError::IncompatibleDeltaEvaluation(format!(
                    "current evaluation carries no penalty for constraint {id:?}"
                ))
            })?;
            eval.add_penalty(
                *id,
                constraint.validate_delta(mv, solution, previous, &self.data)?,
            );
        }
        Ok(Box::new(eval))
    }

    fn validate(&self, solution: &S) -> Box<dyn Validation> {
        // With a single constraint its own carrier is returned even when it
        // passes, so that delta validation keeps working on rich carriers.
        if self.mandatory.len() == 1 {
            return self.mandatory[0].validate(solution, &self.data);
        }
        for constraint in &self.mandatory {
            let validation = constraint.validate(solution, &self.data);
            if !validation.passed() {
                return validation;
            }
        }
        Box::new(SimpleValidation::PASSED)
    }

    fn validate_delta(
        &self,
        mv: &dyn Move<S>,
        solution: &S,
        current: &dyn Validation,
    ) -> Result<Box<dyn Validation>> {
        match self.mandatory.len() {
            0 => Ok(Box::new(SimpleValidation::PASSED)),
            1 => self.mandatory[0].validate_delta(mv, solution, current, &self.data),
            // A short-circuited composite does not retain per-constraint
            // carriers, so fall back to full validation of the modified copy.
            _ => {
                let mut modified = solution.clone();
                mv.apply(&mut modified)?;
                Ok(self.validate(&modified))
            }
        }
    }

    fn is_minimizing(&self) -> bool {
        self.objective.is_minimizing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::SimpleEvaluation;
    use crate::validation::PenalizingValidation;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::any::Any;

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct Pick {
        index: usize,
    }

    impl Solution for Pick {}

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct SetIndex {
        from: usize,
        to: usize,
    }

    impl Move<Pick> for SetIndex {
        fn apply(&self, solution: &mut Pick) -> Result<()> {
            if solution.index != self.from {
                return Err(LocusError::SolutionModification(
                    "move does not match the current index".into(),
                ));
            }
            solution.index = self.to;
            Ok(())
        }

        fn undo(&self, solution: &mut Pick) -> Result<()> {
            if solution.index != self.to {
                return Err(LocusError::SolutionModification(
                    "solution was modified since apply".into(),
                ));
            }
            solution.index = self.from;
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct ValueAt;

    impl Objective<Pick, Vec<f64>> for ValueAt {
        fn evaluate(&self, solution: &Pick, data: &Vec<f64>) -> Box<dyn Evaluation> {
            Box::new(SimpleEvaluation::new(data[solution.index]))
        }
    }

    struct EvenIndex;

    impl Constraint<Pick, Vec<f64>> for EvenIndex {
        fn validate(&self, solution: &Pick, _data: &Vec<f64>) -> Box<dyn Validation> {
            Box::new(SimpleValidation::new(solution.index % 2 == 0))
        }
    }

    struct CostlyIndex;

    impl PenalizingConstraint<Pick, Vec<f64>> for CostlyIndex {
        fn validate(&self, solution: &Pick, _data: &Vec<f64>) -> PenalizingValidation {
            if solution.index > 1 {
                PenalizingValidation::new(solution.index as f64)
            } else {
                PenalizingValidation::PASSED
            }
        }
    }

    fn problem() -> GenericProblem<Vec<f64>, Pick, ValueAt> {
        GenericProblem::new(
            vec![1.0, 5.0, 3.0, 8.0],
            ValueAt,
            Box::new(|data: &Vec<f64>, rng: &mut dyn rand::RngCore| Pick {
                index: rng.random_range(0..data.len()),
            }),
        )
    }

    #[test]
    fn random_solutions_come_from_the_factory() {
        let problem = problem();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..20 {
            let solution = problem.create_random_solution(&mut rng);
            assert!(solution.index < 4);
        }
    }

    #[test]
    fn plain_evaluation_is_the_objective_value() {
        let problem = problem();
        let eval = problem.evaluate(&Pick { index: 1 });
        assert_eq!(eval.value(), 5.0);
    }

    #[test]
    fn penalizing_constraints_wrap_the_evaluation() {
        let problem = problem().with_penalizing_constraint(Box::new(CostlyIndex));
        let eval = problem.evaluate(&Pick { index: 3 });
        // Maximizing: 8.0 - penalty 3.0.
        assert!((eval.value() - 5.0).abs() < 1e-12);
        assert!(eval.as_any().downcast_ref::<PenalizedEvaluation>().is_some());
    }

    #[test]
    fn delta_evaluation_matches_full_evaluation() {
        let problem = problem().with_penalizing_constraint(Box::new(CostlyIndex));
        let solution = Pick { index: 0 };
        let current = problem.evaluate(&solution);
        let mv = SetIndex { from: 0, to: 3 };
        let delta = problem
            .evaluate_delta(&mv, &solution, current.as_ref())
            .unwrap();
        let full = problem.evaluate(&Pick { index: 3 });
        assert!((delta.value() - full.value()).abs() < 1e-9);
    }

    #[test]
    fn mandatory_constraints_reject() {
        let problem = problem().with_mandatory_constraint(Box::new(EvenIndex));
        let odd = problem.validate(&Pick { index: 1 });
        assert!(problem.rejects(odd.as_ref()));
        let even = problem.validate(&Pick { index: 2 });
        assert!(!problem.rejects(even.as_ref()));
    }

    #[test]
    fn penalizing_constraints_do_not_reject() {
        let problem = problem().with_penalizing_constraint(Box::new(CostlyIndex));
        let validation = problem.validate(&Pick { index: 3 });
        assert!(!problem.rejects(validation.as_ref()));
    }

    #[test]
    fn improvement_respects_direction() {
        let problem = problem();
        let better = SimpleEvaluation::new(2.0);
        let worse = SimpleEvaluation::new(1.0);
        assert!(problem.is_improvement(&better, &worse));
        assert!(!problem.is_improvement(&worse, &better));
        assert!(!problem.is_improvement(&better, &better));
    }

    #[test]
    fn delta_validation_single_constraint_uses_the_constraint_path() {
        let problem = problem().with_mandatory_constraint(Box::new(EvenIndex));
        let solution = Pick { index: 0 };
        let current = problem.validate(&solution);
        let mv = SetIndex { from: 0, to: 1 };
        let delta = problem
            .validate_delta(&mv, &solution, current.as_ref())
            .unwrap();
        assert!(!delta.passed());
    }
}

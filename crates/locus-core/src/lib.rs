//! Core abstractions for the locus search engine.
//!
//! This crate defines the contracts everything else is built on: solutions,
//! moves, evaluation and validation carriers, objectives, constraints,
//! neighbourhoods and the problem composition that binds them together.
//!
//! The engine favours composition over inheritance: concrete searches hold a
//! [`Problem`] and a [`Neighbourhood`], objectives and constraints are plain
//! trait implementations, and incremental (delta) computation is an
//! override with a safe full-recomputation default.
//!
//! # Quick Start
//!
//! ```
//! use locus_core::{
//!     Evaluation, GenericProblem, Objective, Problem, SimpleEvaluation, Solution,
//! };
//! use rand::Rng;
//!
//! #[derive(Clone, Debug, PartialEq, Eq, Hash)]
//! struct Assignment {
//!     slot: usize,
//! }
//!
//! impl Solution for Assignment {}
//!
//! struct SlotCost;
//!
//! impl Objective<Assignment, Vec<f64>> for SlotCost {
//!     fn evaluate(&self, solution: &Assignment, data: &Vec<f64>) -> Box<dyn Evaluation> {
//!         Box::new(SimpleEvaluation::new(data[solution.slot]))
//!     }
//!
//!     fn is_minimizing(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let problem = GenericProblem::new(
//!     vec![4.0, 2.0, 7.0],
//!     SlotCost,
//!     Box::new(|data: &Vec<f64>, rng: &mut dyn rand::RngCore| Assignment {
//!         slot: rng.random_range(0..data.len()),
//!     }),
//! );
//! assert_eq!(problem.evaluate(&Assignment { slot: 1 }).value(), 2.0);
//! ```

mod constraint;
mod error;
mod evaluation;
mod moves;
mod neighbourhood;
mod objective;
mod problem;
mod solution;
mod validation;

pub use constraint::{Constraint, PenalizingConstraint, PenalizingConstraintId};
pub use error::{LocusError, Result};
pub use evaluation::{Evaluation, PenalizedEvaluation, SimpleEvaluation};
pub use moves::Move;
pub use neighbourhood::Neighbourhood;
pub use objective::Objective;
pub use problem::{GenericProblem, Problem, SolutionFactory};
pub use solution::Solution;
pub use validation::{PenalizingValidation, SimpleValidation, Validation};

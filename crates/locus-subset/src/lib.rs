//! Subset-selection data model for the locus search engine.
//!
//! This crate provides everything subset-specific: the
//! [`SubsetSolution`] partition over a fixed id universe, the
//! [`SubsetMove`] algebra, the [`SubsetProblem`] with its selection-size
//! window, a family of subset [`neighbourhood`]s with fixed-id support, and
//! the revolving-door [`SubsetIterator`] used for exhaustive enumeration.
//!
//! # Quick Start
//!
//! ```
//! use locus_core::{Evaluation, Objective, SimpleEvaluation};
//! use locus_subset::{SubsetProblem, SubsetSolution};
//! use std::collections::BTreeSet;
//!
//! struct LargestIds;
//!
//! impl Objective<SubsetSolution, BTreeSet<usize>> for LargestIds {
//!     fn evaluate(
//!         &self,
//!         solution: &SubsetSolution,
//!         _data: &BTreeSet<usize>,
//!     ) -> Box<dyn Evaluation> {
//!         Box::new(SimpleEvaluation::new(
//!             solution.selected().iter().sum::<usize>() as f64,
//!         ))
//!     }
//! }
//!
//! let data: BTreeSet<usize> = (0..10).collect();
//! let problem = SubsetProblem::with_fixed_size(data, LargestIds, 3);
//! assert_eq!(problem.min_size(), 3);
//! ```

mod data;
mod iter;
mod moves;
pub mod neighbourhood;
mod problem;
mod solution;
mod util;
mod validation;

pub use data::SubsetData;
pub use iter::{SubsetIterator, SubsetSolutionIterator};
pub use moves::{as_subset_move, MoveIds, SubsetMove};
pub use problem::SubsetProblem;
pub use solution::SubsetSolution;
pub use util::{random_element, random_subset, sample_ids};
pub use validation::SubsetValidation;

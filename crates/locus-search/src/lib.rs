//! Search kernel and local-search metaheuristics for the locus engine.
//!
//! A [`Search`] drives a [`SearchAlgorithm`] over a problem: it owns the
//! lifecycle (status machine, stop criteria, listeners, best-ever tracking)
//! while the algorithm supplies the per-step routine. The provided
//! algorithms cover the classic neighbourhood searches — random and steepest
//! descent, tabu search, variable-neighbourhood search, Metropolis and
//! parallel tempering — along with random, exhaustive and greedy subset
//! construction searches, and a parallel coordinator that races independent
//! searches over one problem.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//!
//! use locus_core::{Evaluation, Objective, SimpleEvaluation};
//! use locus_search::stop::MaxRuntime;
//! use locus_search::{RandomDescent, Search};
//! use locus_subset::neighbourhood::SingleSwapNeighbourhood;
//! use locus_subset::{SubsetProblem, SubsetSolution};
//!
//! struct SumOfIds;
//!
//! impl Objective<SubsetSolution, BTreeSet<usize>> for SumOfIds {
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
//! let data: BTreeSet<usize> = (0..50).collect();
//! let problem = Arc::new(SubsetProblem::with_fixed_size(data, SumOfIds, 10));
//! let mut search = Search::new(
//!     "descent",
//!     problem,
//!     RandomDescent::new(SingleSwapNeighbourhood::new()),
//! );
//! search
//!     .add_stop_criterion(Arc::new(MaxRuntime::seconds(1)))
//!     .unwrap();
//! search.start().unwrap();
//! println!("best: {:?}", search.best_solution());
//! ```

mod algo;
mod algorithm;
mod cache;
mod context;
mod handle;
mod listener;
mod parallel;
mod search;
mod status;
pub mod stop;

pub use algo::{
    ExhaustiveSearch, LrSubsetSearch, MetropolisSearch, ParallelTempering, PipedSearch,
    RandomDescent, RandomSearch, RecentIdsMemory, RecentSolutionsMemory,
    ReducedVariableNeighbourhoodSearch, SteepestDescent, TabuMemory, TabuSearch,
    VariableNeighbourhoodDescent, VariableNeighbourhoodSearch,
};
pub use algorithm::{SearchAlgorithm, SearchDescriptor, StepOutcome};
pub use cache::{EvaluatedMoveCache, LruEvaluatedMoveCache, SingleEvaluatedMoveCache};
pub use context::{BestSolution, CurrentSolution, SearchContext};
pub use handle::SearchHandle;
pub use listener::{CountingListener, LogListener, SearchListener};
pub use parallel::{BasicParallelSearch, RunnableSearch};
pub use search::Search;
pub use status::SearchStatus;

//! locus - local-search metaheuristics with first-class subset selection.
//!
//! A problem binds data, an objective and constraints; a search holds a
//! problem, a neighbourhood and the current/best solutions, and walks the
//! solution space one move at a time. This facade re-exports the whole
//! public API of the engine crates.
//!
//! # Crates
//!
//! - `locus-core`: solutions, moves, evaluations, validations, objectives,
//!   constraints, problems and neighbourhood contracts.
//! - `locus-subset`: the subset-selection data model, its move algebra, its
//!   neighbourhood family and the revolving-door subset iterator.
//! - `locus-search`: the search kernel (status machine, listeners, stop
//!   criteria, move caches) and the search algorithms.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//!
//! use locus::prelude::*;
//!
//! // Maximize the summed weight of a fixed-size selection.
//! struct Weights(Vec<f64>, BTreeSet<usize>);
//!
//! impl SubsetData for Weights {
//!     fn ids(&self) -> &BTreeSet<usize> {
//!         &self.1
//!     }
//! }
//!
//! struct TotalWeight;
//!
//! impl Objective<SubsetSolution, Weights> for TotalWeight {
//!     fn evaluate(&self, solution: &SubsetSolution, data: &Weights) -> Box<dyn Evaluation> {
//!         Box::new(SimpleEvaluation::new(
//!             solution.selected().iter().map(|&id| data.0[id]).sum(),
//!         ))
//!     }
//! }
//!
//! let values = vec![0.4, 1.2, 0.7, 2.2, 1.6];
//! let ids: BTreeSet<usize> = (0..values.len()).collect();
//! let problem = Arc::new(SubsetProblem::with_fixed_size(
//!     Weights(values, ids),
//!     TotalWeight,
//!     2,
//! ));
//!
//! let mut search = Search::new(
//!     "descent",
//!     problem,
//!     RandomDescent::new(SingleSwapNeighbourhood::new()),
//! );
//! search
//!     .add_stop_criterion(Arc::new(MaxRuntime::millis(100)))
//!     .unwrap();
//! search.start().unwrap();
//! println!("best: {:?}", search.best_solution());
//! ```

pub use locus_core::{
    Constraint, Evaluation, GenericProblem, LocusError, Move, Neighbourhood, Objective,
    PenalizedEvaluation, PenalizingConstraint, PenalizingConstraintId, PenalizingValidation,
    Problem, Result, SimpleEvaluation, SimpleValidation, Solution, SolutionFactory, Validation,
};

pub use locus_subset::{
    as_subset_move, random_element, random_subset, sample_ids, MoveIds, SubsetData,
    SubsetIterator, SubsetMove, SubsetProblem, SubsetSolution, SubsetSolutionIterator,
    SubsetValidation,
};

pub use locus_subset::neighbourhood::{
    DisjointMultiAdditionNeighbourhood, DisjointMultiDeletionNeighbourhood,
    DisjointMultiSwapNeighbourhood, MultiAdditionNeighbourhood, MultiDeletionNeighbourhood,
    MultiSwapNeighbourhood, SingleAdditionNeighbourhood, SingleDeletionNeighbourhood,
    SinglePerturbationNeighbourhood, SingleSwapNeighbourhood,
};

pub use locus_search::{
    stop, BasicParallelSearch, BestSolution, CountingListener, CurrentSolution,
    EvaluatedMoveCache, ExhaustiveSearch, LogListener, LrSubsetSearch, LruEvaluatedMoveCache,
    MetropolisSearch, ParallelTempering, PipedSearch, RandomDescent, RandomSearch,
    RecentIdsMemory, RecentSolutionsMemory, ReducedVariableNeighbourhoodSearch, RunnableSearch,
    Search, SearchAlgorithm, SearchContext, SearchDescriptor, SearchHandle, SearchListener,
    SearchStatus, SingleEvaluatedMoveCache, SteepestDescent, StepOutcome, TabuMemory, TabuSearch,
    VariableNeighbourhoodDescent, VariableNeighbourhoodSearch,
};

/// Everything most programs need, in one import.
pub mod prelude {
    pub use locus_core::{
        Constraint, Evaluation, GenericProblem, LocusError, Move, Neighbourhood, Objective,
        PenalizingConstraint, PenalizingValidation, Problem, Result, SimpleEvaluation,
        SimpleValidation, Solution, Validation,
    };
    pub use locus_search::stop::{
        MaxRuntime, MaxSteps, MaxStepsWithoutImprovement, MaxTimeWithoutImprovement,
        TargetEvaluation,
    };
    pub use locus_search::{
        BasicParallelSearch, ExhaustiveSearch, LrSubsetSearch, MetropolisSearch,
        ParallelTempering, PipedSearch, RandomDescent, RandomSearch, Search, SearchListener,
        SearchStatus, SteepestDescent, TabuSearch, VariableNeighbourhoodDescent,
        VariableNeighbourhoodSearch,
    };
    pub use locus_subset::neighbourhood::{
        MultiAdditionNeighbourhood, MultiDeletionNeighbourhood, MultiSwapNeighbourhood,
        SingleAdditionNeighbourhood, SingleDeletionNeighbourhood,
        SinglePerturbationNeighbourhood, SingleSwapNeighbourhood,
    };
    pub use locus_subset::{
        SubsetData, SubsetIterator, SubsetMove, SubsetProblem, SubsetSolution,
        SubsetSolutionIterator,
    };
}

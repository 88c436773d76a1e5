//! Tabu search and tabu memories.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use locus_core::{Evaluation, Move, Neighbourhood, Problem, Result, Solution, Validation};
use locus_subset::{as_subset_move, SubsetSolution};
use tracing::debug;

use super::STOP_POLL_INTERVAL;
use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;

/// Short-term memory deciding which moves are currently tabu.
///
/// The representation is up to the implementation: recently visited
/// solutions, recently touched attributes, or anything in between.
pub trait TabuMemory<S: Solution>: Send {
    /// Returns true if applying `mv` to `current` is currently forbidden.
    fn is_tabu(&self, mv: &dyn Move<S>, current: &S) -> bool;

    /// Records an accepted move and the solution it produced.
    fn register(&mut self, mv: &dyn Move<S>, visited: &S);

    /// Forgets everything; called at the start of each run.
    fn clear(&mut self);
}

/// Tabu memory tracking the hashes of recently visited solutions.
///
/// A move is tabu when it leads back to one of the last `tenure` visited
/// solutions.
pub struct RecentSolutionsMemory<S: Solution> {
    tenure: usize,
    visited: VecDeque<u64>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S: Solution> RecentSolutionsMemory<S> {
    /// Creates a memory remembering the last `tenure` visited solutions.
    ///
    /// # Panics
    ///
    /// Panics if `tenure` is zero.
    pub fn new(tenure: usize) -> Self {
        assert!(tenure >= 1, "tabu tenure must be at least one");
        Self {
            tenure,
            visited: VecDeque::with_capacity(tenure),
            _phantom: PhantomData,
        }
    }

    fn hash_of(solution: &S) -> u64 {
        let mut hasher = DefaultHasher::new();
        solution.hash(&mut hasher);
        hasher.finish()
    }
}

impl<S: Solution> TabuMemory<S> for RecentSolutionsMemory<S> {
    fn is_tabu(&self, mv: &dyn Move<S>, current: &S) -> bool {
        let mut modified = current.clone();
        if mv.apply(&mut modified).is_err() {
            return false;
        }
        self.visited.contains(&Self::hash_of(&modified))
    }

    fn register(&mut self, _mv: &dyn Move<S>, visited: &S) {
        if self.visited.len() == self.tenure {
            self.visited.pop_front();
        }
        self.visited.push_back(Self::hash_of(visited));
    }

    fn clear(&mut self) {
        self.visited.clear();
    }
}

/// Subset tabu memory tracking recently added or removed ids.
///
/// A move is tabu when it touches any of the last `tenure` moved ids.
/// Moves of other types are never tabu.
pub struct RecentIdsMemory {
    tenure: usize,
    order: VecDeque<usize>,
    members: HashSet<usize>,
}

impl RecentIdsMemory {
    /// Creates a memory remembering the last `tenure` moved ids.
    ///
    /// # Panics
    ///
    /// Panics if `tenure` is zero.
    pub fn new(tenure: usize) -> Self {
        assert!(tenure >= 1, "tabu tenure must be at least one");
        Self {
            tenure,
            order: VecDeque::with_capacity(tenure),
            members: HashSet::with_capacity(tenure),
        }
    }

    fn remember(&mut self, id: usize) {
        if self.members.contains(&id) {
            return;
        }
        if self.order.len() == self.tenure {
            if let Some(evicted) = self.order.pop_front() {
                self.members.remove(&evicted);
            }
        }
        self.order.push_back(id);
        self.members.insert(id);
    }
}

impl TabuMemory<SubsetSolution> for RecentIdsMemory {
    fn is_tabu(&self, mv: &dyn Move<SubsetSolution>, _current: &SubsetSolution) -> bool {
        match as_subset_move(mv) {
            Some(mv) => mv
                .added_ids()
                .into_iter()
                .chain(mv.removed_ids())
                .any(|id| self.members.contains(&id)),
            None => false,
        }
    }

    fn register(&mut self, mv: &dyn Move<SubsetSolution>, _visited: &SubsetSolution) {
        if let Some(mv) = as_subset_move(mv) {
            for id in mv.added_ids().into_iter().chain(mv.removed_ids()) {
                self.remember(id);
            }
        }
    }

    fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

/// Tabu search: per step, enumerate the neighbourhood, discard rejected
/// moves and tabu moves that do not beat the best-ever solution
/// (aspiration), then always take the best remaining move — even a
/// degrading one. Finishes when no admissible move remains.
pub struct TabuSearch<S, N, T>
where
    S: Solution,
    N: Neighbourhood<S>,
    T: TabuMemory<S>,
{
    neighbourhood: N,
    memory: T,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, N, T> TabuSearch<S, N, T>
where
    S: Solution,
    N: Neighbourhood<S>,
    T: TabuMemory<S>,
{
    pub fn new(neighbourhood: N, memory: T) -> Self {
        Self {
            neighbourhood,
            memory,
            _phantom: PhantomData,
        }
    }
}

impl<S, N> TabuSearch<S, N, RecentSolutionsMemory<S>>
where
    S: Solution,
    N: Neighbourhood<S>,
{
    /// Tabu search remembering the last `tenure` visited solutions.
    pub fn with_tenure(neighbourhood: N, tenure: usize) -> Self {
        Self::new(neighbourhood, RecentSolutionsMemory::new(tenure))
    }
}

impl<S, P, N, T> SearchAlgorithm<S, P> for TabuSearch<S, N, T>
where
    S: Solution,
    P: Problem<S>,
    N: Neighbourhood<S>,
    T: TabuMemory<S>,
{
    fn name(&self) -> &'static str {
        "TabuSearch"
    }

    fn init(&mut self, ctx: &mut SearchContext<S, P>) -> Result<()> {
        self.memory.clear();
        ctx.ensure_current()
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let moves = {
            let current = ctx.require_current()?;
            self.neighbourhood.all_moves(&current.solution)
        };
        let mut best: Option<(N::Move, Arc<dyn Evaluation>, Arc<dyn Validation>)> = None;
        for (index, mv) in moves.iter().enumerate() {
            if index % STOP_POLL_INTERVAL == 0 && index > 0 && ctx.should_stop() {
                break;
            }
            let (evaluation, validation) = ctx.delta(mv)?;
            if ctx.problem().rejects(validation.as_ref()) {
                continue;
            }
            let aspires = match ctx.best() {
                Some(incumbent) => ctx
                    .problem()
                    .is_improvement(evaluation.as_ref(), incumbent.evaluation.as_ref()),
                None => true,
            };
            if !aspires {
                let current = ctx.require_current()?;
                if self.memory.is_tabu(mv, &current.solution) {
                    continue;
                }
            }
            let improves_best = match &best {
                None => true,
                Some((_, best_evaluation, _)) => ctx
                    .problem()
                    .is_improvement(evaluation.as_ref(), best_evaluation.as_ref()),
            };
            if improves_best {
                best = Some((mv.clone(), evaluation, validation));
            }
        }
        match best {
            Some((mv, evaluation, validation)) => {
                ctx.commit_move(&mv, evaluation, validation)?;
                let current = ctx.require_current()?;
                self.memory.register(&mv, &current.solution);
                Ok(StepOutcome::Continue)
            }
            None => {
                debug!("no admissible move, finishing");
                Ok(StepOutcome::Finished)
            }
        }
    }

    fn run_finished(&mut self, _ctx: &mut SearchContext<S, P>) {
        self.memory.clear();
    }
}

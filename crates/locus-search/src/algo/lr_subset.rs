//! LR subset greedy search.

use std::sync::Arc;

use locus_core::{Evaluation, Objective, Problem, Result, Solution, Validation};
use locus_subset::{SubsetData, SubsetMove, SubsetProblem, SubsetSolution, SubsetValidation};
use tracing::debug;

use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;

/// LR greedy subset construction: alternate `l` greedy additions and `r`
/// greedy removals per round until the target selection size is reached.
///
/// With `l > r` the search grows from the empty selection and stops at the
/// problem's minimum size; with `r > l` it shrinks from the full set and
/// stops at the problem's maximum size. An explicit target inside the
/// problem's size window overrides either default.
///
/// Every addition (removal) greedily picks the candidate whose delta
/// evaluation is best; moves are taken regardless of whether they improve,
/// since intermediate sizes usually violate the size window.
pub struct LrSubsetSearch {
    additions: usize,
    deletions: usize,
    target_size: Option<usize>,
    adds_this_round: usize,
    deletions_this_round: usize,
}

impl LrSubsetSearch {
    /// Creates an LR search performing `l` additions and `r` deletions per
    /// round.
    ///
    /// # Panics
    ///
    /// Panics if `l == r` (the selection size would never move).
    pub fn new(l: usize, r: usize) -> Self {
        assert!(l != r, "l and r must differ");
        Self {
            additions: l,
            deletions: r,
            target_size: None,
            adds_this_round: 0,
            deletions_this_round: 0,
        }
    }

    /// Overrides the target selection size.
    pub fn with_target_size(mut self, target_size: usize) -> Self {
        self.target_size = Some(target_size);
        self
    }

    fn grows(&self) -> bool {
        self.additions > self.deletions
    }

    fn target<D, O>(&self, problem: &SubsetProblem<D, O>) -> usize
    where
        D: SubsetData + 'static,
        O: Objective<SubsetSolution, D>,
    {
        self.target_size.unwrap_or(if self.grows() {
            problem.min_size()
        } else {
            problem.max_size()
        })
    }

    /// Whether the inner constraints pass, ignoring the size window that
    /// intermediate construction sizes necessarily violate.
    fn admissible(validation: &dyn Validation) -> bool {
        match validation.as_any().downcast_ref::<SubsetValidation>() {
            Some(validation) => validation.passed_ignoring_size(),
            None => validation.passed(),
        }
    }
}

impl<D, O> SearchAlgorithm<SubsetSolution, SubsetProblem<D, O>> for LrSubsetSearch
where
    D: SubsetData + 'static,
    O: Objective<SubsetSolution, D>,
{
    fn name(&self) -> &'static str {
        "LrSubsetSearch"
    }

    fn init(
        &mut self,
        ctx: &mut SearchContext<SubsetSolution, SubsetProblem<D, O>>,
    ) -> Result<()> {
        self.adds_this_round = 0;
        self.deletions_this_round = 0;
        let mut start = SubsetSolution::new(ctx.problem().data().ids().iter().copied());
        if !self.grows() {
            start.select_all();
        }
        let evaluation: Arc<dyn Evaluation> = ctx.problem().evaluate(&start).into();
        let validation: Arc<dyn Validation> = ctx.problem().validate(&start).into();
        ctx.set_current(start, evaluation, validation);
        debug!(
            target = self.target(ctx.problem()),
            grows = self.grows(),
            "starting greedy construction"
        );
        Ok(())
    }

    fn step(
        &mut self,
        ctx: &mut SearchContext<SubsetSolution, SubsetProblem<D, O>>,
    ) -> Result<StepOutcome> {
        let target = self.target(ctx.problem());
        let (selected_count, unselected_count) = {
            let current = ctx.require_current()?;
            (
                current.solution.selected_count(),
                current.solution.unselected_count(),
            )
        };
        if selected_count == target {
            debug!(target, "target size reached, finishing");
            return Ok(StepOutcome::Finished);
        }
        if selected_count == 0 && unselected_count == 0 {
            return Ok(StepOutcome::Finished);
        }

        if self.adds_this_round + self.deletions_this_round == self.additions + self.deletions {
            self.adds_this_round = 0;
            self.deletions_this_round = 0;
        }
        let adding = self.adds_this_round < self.additions;
        if adding && unselected_count == 0 {
            // Nothing left to add; fast-forward to the removal phase.
            self.adds_this_round = self.additions;
            return Ok(StepOutcome::Continue);
        }
        if !adding && selected_count == 0 {
            self.deletions_this_round = self.deletions;
            return Ok(StepOutcome::Continue);
        }

        let candidates: Vec<SubsetMove> = {
            let current = ctx.require_current()?;
            if adding {
                current
                    .solution
                    .unselected()
                    .iter()
                    .copied()
                    .map(SubsetMove::addition)
                    .collect()
            } else {
                current
                    .solution
                    .selected()
                    .iter()
                    .copied()
                    .map(SubsetMove::deletion)
                    .collect()
            }
        };
        let mut best: Option<(SubsetMove, Arc<dyn Evaluation>, Arc<dyn Validation>)> = None;
        for mv in candidates {
            let (evaluation, validation) = ctx.delta(&mv)?;
            if !Self::admissible(validation.as_ref()) {
                continue;
            }
            let improves_best = match &best {
                None => true,
                Some((_, best_evaluation, _)) => ctx
                    .problem()
                    .is_improvement(evaluation.as_ref(), best_evaluation.as_ref()),
            };
            if improves_best {
                best = Some((mv, evaluation, validation));
            }
        }
        let Some((mv, evaluation, validation)) = best else {
            debug!("no admissible greedy move, finishing");
            return Ok(StepOutcome::Finished);
        };
        ctx.commit_move(&mv, evaluation, validation)?;
        if adding {
            self.adds_this_round += 1;
        } else {
            self.deletions_this_round += 1;
        }
        // The target check at the top of the next step notices arrival.
        Ok(StepOutcome::Continue)
    }
}

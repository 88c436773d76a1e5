//! Metropolis search (fixed-temperature simulated annealing).

use std::marker::PhantomData;

use locus_core::{Neighbourhood, Problem, Result, Solution};
use rand::Rng;
use tracing::debug;

use super::{evaluate_move_cached, improvement_delta};
use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::cache::{EvaluatedMoveCache, SingleEvaluatedMoveCache};
use crate::context::SearchContext;

/// Metropolis search: per step, draw one random move; accept improving (or
/// equal) moves unconditionally and worsening moves with probability
/// `exp(delta / T)`, where `delta` is the signed improvement (negative for a
/// worsening move) and `T` the fixed temperature.
///
/// Rejected moves leave the current solution unchanged. Higher temperatures
/// explore more; as `T` approaches zero the search degenerates to random
/// descent.
pub struct MetropolisSearch<S, N>
where
    S: Solution,
    N: Neighbourhood<S>,
{
    neighbourhood: N,
    temperature: f64,
    cache: SingleEvaluatedMoveCache<N::Move>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, N> MetropolisSearch<S, N>
where
    S: Solution,
    N: Neighbourhood<S>,
{
    /// Creates a Metropolis search at the given fixed temperature.
    ///
    /// # Panics
    ///
    /// Panics unless the temperature is finite and strictly positive.
    pub fn new(neighbourhood: N, temperature: f64) -> Self {
        assert!(
            temperature.is_finite() && temperature > 0.0,
            "temperature must be finite and positive"
        );
        Self {
            neighbourhood,
            temperature,
            cache: SingleEvaluatedMoveCache::new(),
            _phantom: PhantomData,
        }
    }

    /// Returns the fixed temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Changes the temperature; apply through [`Search::configure`] so the
    /// idle-only rule is enforced.
    ///
    /// [`Search::configure`]: crate::Search::configure
    pub fn set_temperature(&mut self, temperature: f64) {
        assert!(
            temperature.is_finite() && temperature > 0.0,
            "temperature must be finite and positive"
        );
        self.temperature = temperature;
    }
}

impl<S, P, N> SearchAlgorithm<S, P> for MetropolisSearch<S, N>
where
    S: Solution,
    P: Problem<S>,
    N: Neighbourhood<S>,
{
    fn name(&self) -> &'static str {
        "MetropolisSearch"
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let Some(mv) = ctx.draw_move(&self.neighbourhood) else {
            debug!("neighbourhood offers no move, finishing");
            return Ok(StepOutcome::Finished);
        };
        let (evaluation, validation) = evaluate_move_cached(ctx, &mut self.cache, &mv)?;
        if ctx.problem().rejects(validation.as_ref()) {
            return Ok(StepOutcome::Continue);
        }
        let current_rejected = {
            let current = ctx.require_current()?;
            ctx.problem().rejects(current.validation.as_ref())
        };
        let delta = improvement_delta(
            ctx.problem().is_minimizing(),
            evaluation.value(),
            ctx.require_current()?.evaluation.value(),
        );
        let accept = current_rejected || delta >= 0.0 || {
            let probability = (delta / self.temperature).exp();
            ctx.rng().random::<f64>() < probability
        };
        if accept {
            ctx.commit_move(&mv, evaluation, validation)?;
            self.cache.clear();
        }
        Ok(StepOutcome::Continue)
    }

    fn run_finished(&mut self, _ctx: &mut SearchContext<S, P>) {
        self.cache.clear();
    }
}

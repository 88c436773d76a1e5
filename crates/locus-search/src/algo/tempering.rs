//! Parallel tempering.

use std::marker::PhantomData;
use std::sync::Arc;

use locus_core::{Evaluation, Move, Neighbourhood, Problem, Result, Solution, Validation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, trace};

use super::improvement_delta;
use crate::algorithm::{SearchAlgorithm, StepOutcome};
use crate::context::SearchContext;

/// One Metropolis replica: a solution at a fixed temperature with its own
/// random number generator.
struct Replica<S: Solution> {
    temperature: f64,
    current: S,
    evaluation: Arc<dyn Evaluation>,
    validation: Arc<dyn Validation>,
    rng: StdRng,
}

impl<S: Solution> Replica<S> {
    fn sweep<P, N>(&mut self, problem: &P, neighbourhood: &N, steps: u64) -> Result<()>
    where
        P: Problem<S>,
        N: Neighbourhood<S> + ?Sized,
    {
        let minimizing = problem.is_minimizing();
        for _ in 0..steps {
            let Some(mv) = neighbourhood.random_move(&self.current, &mut self.rng) else {
                return Ok(());
            };
            let evaluation = problem.evaluate_delta(&mv, &self.current, self.evaluation.as_ref())?;
            let validation = problem.validate_delta(&mv, &self.current, self.validation.as_ref())?;
            if problem.rejects(validation.as_ref()) {
                continue;
            }
            let delta = improvement_delta(minimizing, evaluation.value(), self.evaluation.value());
            let accept = delta >= 0.0
                || self.rng.random::<f64>() < (delta / self.temperature).exp();
            if accept {
                mv.apply(&mut self.current)?;
                self.evaluation = evaluation.into();
                self.validation = validation.into();
            }
        }
        Ok(())
    }
}

/// Parallel tempering: a ladder of Metropolis replicas at geometrically
/// spaced temperatures, stepping concurrently.
///
/// Every step, each replica performs one (or more) Metropolis steps on its
/// own worker; the sweep ends with a barrier. Adjacent replicas then attempt
/// to swap solutions with probability `min(1, exp(Δβ·ΔE))` (sign adapted to
/// the optimization direction), so good solutions migrate towards the colder
/// end of the ladder where acceptance is strict.
///
/// A temperature scale factor multiplies the whole ladder, adapting it to
/// the magnitude of the objective's deltas.
pub struct ParallelTempering<S, N>
where
    S: Solution,
    N: Neighbourhood<S> + Send + Sync,
{
    neighbourhood: Arc<N>,
    replica_count: usize,
    min_temperature: f64,
    max_temperature: f64,
    temperature_scale: f64,
    steps_per_sweep: u64,
    replicas: Vec<Replica<S>>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S, N> ParallelTempering<S, N>
where
    S: Solution,
    N: Neighbourhood<S> + Send + Sync,
{
    /// Creates a tempering ladder of `replica_count` replicas with
    /// temperatures spaced geometrically between `min_temperature` and
    /// `max_temperature`.
    ///
    /// # Panics
    ///
    /// Panics unless `replica_count >= 1` and
    /// `0 < min_temperature <= max_temperature`.
    pub fn new(
        neighbourhood: N,
        replica_count: usize,
        min_temperature: f64,
        max_temperature: f64,
    ) -> Self {
        assert!(replica_count >= 1, "at least one replica is required");
        assert!(
            min_temperature > 0.0 && min_temperature <= max_temperature,
            "temperatures must satisfy 0 < min <= max"
        );
        Self {
            neighbourhood: Arc::new(neighbourhood),
            replica_count,
            min_temperature,
            max_temperature,
            temperature_scale: 1.0,
            steps_per_sweep: 1,
            replicas: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Multiplies every temperature in the ladder by the given factor.
    pub fn with_temperature_scale(mut self, scale: f64) -> Self {
        assert!(scale > 0.0, "temperature scale must be positive");
        self.temperature_scale = scale;
        self
    }

    /// Sets how many Metropolis steps each replica performs per sweep.
    pub fn with_steps_per_sweep(mut self, steps: u64) -> Self {
        assert!(steps >= 1, "at least one step per sweep is required");
        self.steps_per_sweep = steps;
        self
    }

    fn temperature_of(&self, rank: usize) -> f64 {
        let base = if self.replica_count == 1 {
            self.min_temperature
        } else {
            let exponent = rank as f64 / (self.replica_count - 1) as f64;
            self.min_temperature * (self.max_temperature / self.min_temperature).powf(exponent)
        };
        base * self.temperature_scale
    }

    /// Orientation-normalized energy: lower is always better.
    fn energy(minimizing: bool, value: f64) -> f64 {
        if minimizing {
            value
        } else {
            -value
        }
    }
}

impl<S, P, N> SearchAlgorithm<S, P> for ParallelTempering<S, N>
where
    S: Solution,
    P: Problem<S>,
    N: Neighbourhood<S> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "ParallelTempering"
    }

    fn init(&mut self, ctx: &mut SearchContext<S, P>) -> Result<()> {
        ctx.ensure_current()?;
        let current = ctx.require_current()?.clone();
        self.replicas = (0..self.replica_count)
            .map(|rank| Replica {
                temperature: self.temperature_of(rank),
                current: current.solution.clone(),
                evaluation: Arc::clone(&current.evaluation),
                validation: Arc::clone(&current.validation),
                rng: StdRng::from_rng(ctx.rng()),
            })
            .collect();
        debug!(
            replicas = self.replica_count,
            min = self.temperature_of(0),
            max = self.temperature_of(self.replica_count - 1),
            "tempering ladder initialized"
        );
        Ok(())
    }

    fn step(&mut self, ctx: &mut SearchContext<S, P>) -> Result<StepOutcome> {
        let problem = ctx.problem_arc();
        let neighbourhood = Arc::clone(&self.neighbourhood);
        let steps = self.steps_per_sweep;

        // Concurrent replica sweeps; the parallel iterator joins before the
        // swap phase starts, which is the per-round barrier.
        self.replicas.par_iter_mut().try_for_each(|replica| {
            replica.sweep(problem.as_ref(), neighbourhood.as_ref(), steps)
        })?;

        // Sequential swap phase between adjacent replicas.
        let minimizing = problem.is_minimizing();
        for rank in 0..self.replicas.len().saturating_sub(1) {
            let cold_energy = Self::energy(minimizing, self.replicas[rank].evaluation.value());
            let hot_energy = Self::energy(minimizing, self.replicas[rank + 1].evaluation.value());
            let beta_diff =
                1.0 / self.replicas[rank].temperature - 1.0 / self.replicas[rank + 1].temperature;
            let exponent = beta_diff * (cold_energy - hot_energy);
            let accept = exponent >= 0.0 || ctx.rng().random::<f64>() < exponent.exp();
            if accept {
                trace!(rank, "swapping adjacent replicas");
                let (cold, hot) = self.replicas.split_at_mut(rank + 1);
                std::mem::swap(&mut cold[rank].current, &mut hot[0].current);
                std::mem::swap(&mut cold[rank].evaluation, &mut hot[0].evaluation);
                std::mem::swap(&mut cold[rank].validation, &mut hot[0].validation);
            }
        }

        // Track the best across replicas and surface the coldest replica's
        // solution as the search's current one.
        for replica in &self.replicas {
            ctx.offer_best(
                &replica.current,
                Arc::clone(&replica.evaluation),
                Arc::clone(&replica.validation),
            );
        }
        if let Some(coldest) = self.replicas.first() {
            let changed = ctx
                .current()
                .map_or(true, |current| current.solution != coldest.current);
            if changed {
                ctx.set_current(
                    coldest.current.clone(),
                    Arc::clone(&coldest.evaluation),
                    Arc::clone(&coldest.validation),
                );
            }
        }
        Ok(StepOutcome::Continue)
    }

    fn run_finished(&mut self, _ctx: &mut SearchContext<S, P>) {
        self.replicas.clear();
    }
}

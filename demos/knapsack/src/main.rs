//! Knapsack demo.
//!
//! Maximize the total profit of the selected items without exceeding the
//! weight capacity. Runs parallel tempering over a randomly generated
//! instance for a fixed wall-clock budget:
//!
//! ```text
//! knapsack [items] [runtime-seconds]
//! ```

use std::collections::BTreeSet;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use locus::prelude::*;
use locus::{as_subset_move, SimpleEvaluation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct KnapsackData {
    ids: BTreeSet<usize>,
    profits: Vec<f64>,
    weights: Vec<f64>,
    capacity: f64,
}

impl KnapsackData {
    fn random(items: usize) -> Self {
        let mut rng = StdRng::from_os_rng();
        let profits: Vec<f64> = (0..items).map(|_| rng.random_range(10.0..100.0)).collect();
        let weights: Vec<f64> = (0..items).map(|_| rng.random_range(1.0..50.0)).collect();
        // Roughly half of the total weight fits.
        let capacity = weights.iter().sum::<f64>() / 2.0;
        Self {
            ids: (0..items).collect(),
            profits,
            weights,
            capacity,
        }
    }

    fn weight_of(&self, solution: &SubsetSolution) -> f64 {
        solution.selected().iter().map(|&id| self.weights[id]).sum()
    }
}

impl SubsetData for KnapsackData {
    fn ids(&self) -> &BTreeSet<usize> {
        &self.ids
    }
}

struct TotalProfit;

impl Objective<SubsetSolution, KnapsackData> for TotalProfit {
    fn evaluate(&self, solution: &SubsetSolution, data: &KnapsackData) -> Box<dyn Evaluation> {
        Box::new(SimpleEvaluation::new(
            solution.selected().iter().map(|&id| data.profits[id]).sum(),
        ))
    }

    fn evaluate_delta(
        &self,
        mv: &dyn Move<SubsetSolution>,
        _solution: &SubsetSolution,
        current: &dyn Evaluation,
        data: &KnapsackData,
    ) -> Result<Box<dyn Evaluation>> {
        let mv = as_subset_move(mv).ok_or_else(|| {
            LocusError::IncompatibleDeltaEvaluation("expected a subset move".into())
        })?;
        let added: f64 = mv.added_ids().iter().map(|&id| data.profits[id]).sum();
        let removed: f64 = mv.removed_ids().iter().map(|&id| data.profits[id]).sum();
        Ok(Box::new(SimpleEvaluation::new(
            current.value() + added - removed,
        )))
    }
}

struct WithinCapacity;

impl Constraint<SubsetSolution, KnapsackData> for WithinCapacity {
    fn validate(&self, solution: &SubsetSolution, data: &KnapsackData) -> Box<dyn Validation> {
        Box::new(SimpleValidation::new(
            data.weight_of(solution) <= data.capacity,
        ))
    }
}

fn run(items: usize, runtime_seconds: u64) -> Result<()> {
    let data = KnapsackData::random(items);
    let capacity = data.capacity;
    let problem = Arc::new(
        SubsetProblem::new(data, TotalProfit, 1, items)
            .with_mandatory_constraint(Box::new(WithinCapacity)),
    );

    let tempering = ParallelTempering::new(
        SinglePerturbationNeighbourhood::new(1, items),
        6,
        1.0,
        100.0,
    );
    let mut search = Search::new("knapsack-tempering", Arc::clone(&problem), tempering);
    search.add_stop_criterion(Arc::new(MaxRuntime::seconds(runtime_seconds)))?;
    search.start()?;

    match search.best_solution() {
        Some(best) => {
            println!(
                "best profit {:.2} at weight {:.2}/{capacity:.2} with {} of {items} items",
                search
                    .best_solution_evaluation()
                    .map(|evaluation| evaluation.value())
                    .unwrap_or_default(),
                problem.data().weight_of(&best),
                best.selected_count(),
            );
            println!("selected: {:?}", best.selected());
        }
        None => println!("no feasible selection found"),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = env::args().skip(1);
    let items = match args.next().map(|raw| raw.parse::<usize>()) {
        None => 60,
        Some(Ok(items)) if items >= 2 => items,
        Some(_) => {
            eprintln!("usage: knapsack [items >= 2] [runtime-seconds]");
            return ExitCode::from(2);
        }
    };
    let runtime_seconds = match args.next().map(|raw| raw.parse::<u64>()) {
        None => 3,
        Some(Ok(seconds)) => seconds,
        Some(Err(_)) => {
            eprintln!("usage: knapsack [items >= 2] [runtime-seconds]");
            return ExitCode::from(2);
        }
    };

    match run(items, runtime_seconds) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("search failed: {error}");
            ExitCode::FAILURE
        }
    }
}

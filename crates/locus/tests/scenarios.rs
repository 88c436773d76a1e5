//! End-to-end scenarios exercising the whole engine.

use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;

use locus::prelude::*;
use locus::{as_subset_move, SearchHandle, SimpleEvaluation};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn init_logging() {
    let _ = tracing_subscriber::fmt::try_init();
}

// === Average pairwise distance over a symmetric matrix ===

struct DistanceMatrix {
    ids: BTreeSet<usize>,
    distances: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    fn new(distances: Vec<Vec<f64>>) -> Self {
        Self {
            ids: (0..distances.len()).collect(),
            distances,
        }
    }

    fn random(points: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut distances = vec![vec![0.0; points]; points];
        for i in 0..points {
            for j in (i + 1)..points {
                let d: f64 = rng.random_range(1.0..100.0);
                distances[i][j] = d;
                distances[j][i] = d;
            }
        }
        Self::new(distances)
    }

    fn distance(&self, a: usize, b: usize) -> f64 {
        self.distances[a][b]
    }
}

impl SubsetData for DistanceMatrix {
    fn ids(&self) -> &BTreeSet<usize> {
        &self.ids
    }
}

/// Evaluation carrying the summed pairwise distance and the pair count, so
/// deltas can be computed incrementally.
#[derive(Debug)]
struct PairwiseDistance {
    sum: f64,
    pairs: usize,
}

impl Evaluation for PairwiseDistance {
    fn value(&self) -> f64 {
        if self.pairs == 0 {
            0.0
        } else {
            self.sum / self.pairs as f64
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct AverageDistance;

impl Objective<SubsetSolution, DistanceMatrix> for AverageDistance {
    fn evaluate(&self, solution: &SubsetSolution, data: &DistanceMatrix) -> Box<dyn Evaluation> {
        let ids: Vec<usize> = solution.selected().iter().copied().collect();
        let mut sum = 0.0;
        let mut pairs = 0;
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                sum += data.distance(ids[i], ids[j]);
                pairs += 1;
            }
        }
        Box::new(PairwiseDistance { sum, pairs })
    }

    fn evaluate_delta(
        &self,
        mv: &dyn Move<SubsetSolution>,
        solution: &SubsetSolution,
        current: &dyn Evaluation,
        data: &DistanceMatrix,
    ) -> locus::Result<Box<dyn Evaluation>> {
        let mv = as_subset_move(mv).ok_or_else(|| {
            LocusError::IncompatibleDeltaEvaluation("expected a subset move".into())
        })?;
        let current = current
            .as_any()
            .downcast_ref::<PairwiseDistance>()
            .ok_or_else(|| {
                LocusError::IncompatibleDeltaEvaluation(
                    "expected a pairwise-distance evaluation".into(),
                )
            })?;
        let removed: Vec<usize> = mv.removed_ids().into_iter().collect();
        let added: Vec<usize> = mv.added_ids().into_iter().collect();
        let kept: Vec<usize> = solution
            .selected()
            .iter()
            .copied()
            .filter(|id| !removed.contains(id))
            .collect();

        let mut sum = current.sum;
        for (index, &gone) in removed.iter().enumerate() {
            for &other in solution.selected() {
                if other == gone || removed[..index].contains(&other) {
                    continue;
                }
                sum -= data.distance(gone, other);
            }
        }
        for (index, &new) in added.iter().enumerate() {
            for &other in &kept {
                sum += data.distance(new, other);
            }
            for &earlier in &added[..index] {
                sum += data.distance(new, earlier);
            }
        }
        let count = kept.len() + added.len();
        Ok(Box::new(PairwiseDistance {
            sum,
            pairs: count * (count - 1) / 2,
        }))
    }
}

/// Scenario 1: exhaustive search over {A,B,C} with AB=2, AC=3, BC=1 and
/// fixed subset size 2 selects {A,C} with average distance 3.
#[test]
fn exhaustive_search_finds_the_most_distant_pair() {
    init_logging();
    let data = DistanceMatrix::new(vec![
        vec![0.0, 2.0, 3.0],
        vec![2.0, 0.0, 1.0],
        vec![3.0, 1.0, 0.0],
    ]);
    let iterator = SubsetSolutionIterator::new(data.ids(), 2, 2);
    let problem = Arc::new(SubsetProblem::with_fixed_size(data, AverageDistance, 2));
    let mut search = Search::new("exhaustive", problem, ExhaustiveSearch::new(iterator));
    search.start().unwrap();
    let best = search.best_solution().unwrap();
    assert_eq!(best.selected(), &BTreeSet::from([0, 2]));
    assert_eq!(search.best_solution_evaluation().unwrap().value(), 3.0);
    // C(3,2) candidate solutions, one per step.
    assert_eq!(search.steps(), 3);
}

/// Scenario 3: on a 50-point random matrix, delta evaluation agrees with
/// full evaluation for 10 000 random (solution, move) pairs.
#[test]
fn delta_evaluation_matches_full_evaluation_on_random_moves() {
    let data = DistanceMatrix::random(50, 99);
    let objective = AverageDistance;
    let neighbourhood = SinglePerturbationNeighbourhood::new(2, 12);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let universe: Arc<BTreeSet<usize>> = Arc::new(data.ids.clone());

    for _ in 0..10_000 {
        let size = rng.random_range(2..=10);
        let mut pool: Vec<usize> = universe.iter().copied().collect();
        let mut selected = BTreeSet::new();
        for _ in 0..size {
            let index = rng.random_range(0..pool.len());
            selected.insert(pool.swap_remove(index));
        }
        let solution = SubsetSolution::with_selection(Arc::clone(&universe), selected).unwrap();
        let Some(mv) = neighbourhood.random_move(&solution, &mut rng) else {
            continue;
        };
        let current = objective.evaluate(&solution, &data);
        let delta = objective
            .evaluate_delta(&mv, &solution, current.as_ref(), &data)
            .unwrap();
        let mut modified = solution.clone();
        mv.apply(&mut modified).unwrap();
        let full = objective.evaluate(&modified, &data);
        assert!(
            (delta.value() - full.value()).abs() < 1e-9,
            "delta {} vs full {} for {mv:?}",
            delta.value(),
            full.value()
        );
    }
}

// === Knapsack ===

struct KnapsackData {
    ids: BTreeSet<usize>,
    profits: Vec<f64>,
    weights: Vec<f64>,
    capacity: f64,
}

impl KnapsackData {
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
}

struct WithinCapacity;

impl Constraint<SubsetSolution, KnapsackData> for WithinCapacity {
    fn validate(&self, solution: &SubsetSolution, data: &KnapsackData) -> Box<dyn Validation> {
        Box::new(SimpleValidation::new(data.weight_of(solution) <= data.capacity))
    }
}

/// Scenario 2: the classic three-item knapsack with capacity 50. Random
/// descent converges to items {1,2}: profit 220 at weight 50.
#[test]
fn random_descent_solves_the_small_knapsack() {
    init_logging();
    let data = KnapsackData {
        ids: (0..3).collect(),
        profits: vec![60.0, 100.0, 120.0],
        weights: vec![10.0, 20.0, 30.0],
        capacity: 50.0,
    };
    let problem = Arc::new(
        SubsetProblem::new(data, TotalProfit, 1, 3)
            .with_mandatory_constraint(Box::new(WithinCapacity)),
    );
    let mut search = Search::new(
        "knapsack",
        Arc::clone(&problem),
        RandomDescent::new(SinglePerturbationNeighbourhood::new(1, 3)),
    )
    .with_seed(2024);
    search.add_stop_criterion(Arc::new(MaxSteps::new(2000))).unwrap();
    search.start().unwrap();

    let best = search.best_solution().unwrap();
    assert_eq!(best.selected(), &BTreeSet::from([1, 2]));
    assert_eq!(search.best_solution_evaluation().unwrap().value(), 220.0);
    assert_eq!(problem.data().weight_of(&best), 50.0);
    assert!(search.best_solution_validation().unwrap().passed());
}

/// Scenario 4: the revolving-door iterator over {0..4} with sizes [2,3]
/// yields all 20 subsets exactly once, in minimum-change order within each
/// size class, starting each class from the smallest ids.
#[test]
fn revolving_door_enumerates_subsets_in_minimum_change_order() {
    let subsets: Vec<BTreeSet<usize>> = SubsetIterator::new(0..5, 2, 3).collect();
    assert_eq!(subsets.len(), 20);
    let distinct: BTreeSet<Vec<usize>> = subsets
        .iter()
        .map(|s| s.iter().copied().collect())
        .collect();
    assert_eq!(distinct.len(), 20);

    for pair in subsets.windows(2) {
        if pair[0].len() == pair[1].len() {
            // One element leaves, one enters.
            assert_eq!(pair[0].symmetric_difference(&pair[1]).count(), 2);
        }
    }
    let first_of_three = subsets.iter().find(|s| s.len() == 3).unwrap();
    assert_eq!(first_of_three, &BTreeSet::from([0, 1, 2]));
}

// === Parallel search over a dummy objective ===

struct SelectionCount;

impl Objective<SubsetSolution, BTreeSet<usize>> for SelectionCount {
    fn evaluate(
        &self,
        solution: &SubsetSolution,
        _data: &BTreeSet<usize>,
    ) -> Box<dyn Evaluation> {
        Box::new(SimpleEvaluation::new(solution.selected_count() as f64))
    }
}

/// Scenario 5: three children maximizing `|selected|` over ten ids. The
/// parent reports 10 and no child's best exceeds the parent's.
#[test]
fn parallel_search_aggregates_its_children() {
    init_logging();
    let data: BTreeSet<usize> = (0..10).collect();
    let problem = Arc::new(SubsetProblem::new(data, SelectionCount, 1, 10));

    let mut parallel = BasicParallelSearch::new();
    let mut child_handles: Vec<SearchHandle<SubsetSolution>> = Vec::new();
    for seed in [1u64, 2, 3] {
        let mut child = Search::new(
            format!("child-{seed}"),
            Arc::clone(&problem),
            RandomDescent::new(SingleAdditionNeighbourhood::new().with_max_size(10)),
        )
        .with_seed(seed);
        child
            .add_stop_criterion(Arc::new(MaxSteps::new(200)))
            .unwrap();
        child_handles.push(child.handle());
        parallel.add_search(Box::new(child));
    }

    let mut search = Search::new("parallel", problem, parallel);
    search.start().unwrap();

    let parent_best = search.best_solution_evaluation().unwrap().value();
    assert_eq!(parent_best, 10.0);
    for handle in &child_handles {
        let child_best = handle.best().unwrap().evaluation.value();
        assert!(child_best <= parent_best);
    }
}

// === Tabu escape on a deceptive line landscape ===

struct LineLandscape {
    ids: BTreeSet<usize>,
    values: Vec<f64>,
}

impl SubsetData for LineLandscape {
    fn ids(&self) -> &BTreeSet<usize> {
        &self.ids
    }
}

struct ValueAtPosition;

impl Objective<SubsetSolution, LineLandscape> for ValueAtPosition {
    fn evaluate(&self, solution: &SubsetSolution, data: &LineLandscape) -> Box<dyn Evaluation> {
        Box::new(SimpleEvaluation::new(
            solution.selected().iter().map(|&id| data.values[id]).sum(),
        ))
    }
}

/// Moves the single selected position one step along the line.
struct AdjacentStep {
    positions: usize,
}

impl Neighbourhood<SubsetSolution> for AdjacentStep {
    type Move = SubsetMove;

    fn random_move(
        &self,
        solution: &SubsetSolution,
        rng: &mut dyn RngCore,
    ) -> Option<SubsetMove> {
        let moves = self.all_moves(solution);
        if moves.is_empty() {
            return None;
        }
        Some(moves[rng.random_range(0..moves.len())].clone())
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<SubsetMove> {
        let Some(&position) = solution.selected().iter().next() else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        if position > 0 {
            moves.push(SubsetMove::swap(position - 1, position));
        }
        if position + 1 < self.positions {
            moves.push(SubsetMove::swap(position + 1, position));
        }
        moves
    }
}

/// Deceptive landscape: ascending from position 0 stalls on the local
/// maximum at position 2, while the global maximum sits at position 5.
const LINE: &[f64] = &[1.0, 2.0, 5.0, 4.0, 4.5, 10.0];

fn line_problem() -> Arc<SubsetProblem<LineLandscape, ValueAtPosition>> {
    Arc::new(SubsetProblem::with_fixed_size(
        LineLandscape {
            ids: (0..LINE.len()).collect(),
            values: LINE.to_vec(),
        },
        ValueAtPosition,
        1,
    ))
}

fn start_at_zero() -> SubsetSolution {
    let mut solution = SubsetSolution::new(0..LINE.len());
    solution.select(0).unwrap();
    solution
}

/// Scenario 6a: random descent from position 0 stalls on the local maximum.
#[test]
fn random_descent_stalls_on_the_deceptive_landscape() {
    let mut search = Search::new(
        "descent",
        line_problem(),
        RandomDescent::new(AdjacentStep {
            positions: LINE.len(),
        }),
    )
    .with_seed(5);
    search.set_initial_solution(start_at_zero()).unwrap();
    search.add_stop_criterion(Arc::new(MaxSteps::new(50))).unwrap();
    search.start().unwrap();
    assert_eq!(search.best_solution_evaluation().unwrap().value(), 5.0);
}

/// Scenario 6b: tabu search with tenure 3 escapes and reaches the global
/// maximum within 50 steps.
#[test]
fn tabu_search_escapes_the_deceptive_landscape() {
    let mut search = Search::new(
        "tabu",
        line_problem(),
        TabuSearch::with_tenure(
            AdjacentStep {
                positions: LINE.len(),
            },
            3,
        ),
    )
    .with_seed(5);
    search.set_initial_solution(start_at_zero()).unwrap();
    search.add_stop_criterion(Arc::new(MaxSteps::new(50))).unwrap();
    search.start().unwrap();
    assert_eq!(search.best_solution_evaluation().unwrap().value(), 10.0);
    let best = search.best_solution().unwrap();
    assert_eq!(best.selected(), &BTreeSet::from([5]));
}

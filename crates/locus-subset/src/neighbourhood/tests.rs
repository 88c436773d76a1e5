use std::collections::BTreeSet;

use locus_core::{Move, Neighbourhood};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::moves::SubsetMove;
use crate::solution::SubsetSolution;

fn solution_with(universe: usize, selected: &[usize]) -> SubsetSolution {
    let mut solution = SubsetSolution::new(0..universe);
    for &id in selected {
        solution.select(id).unwrap();
    }
    solution
}

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

fn touched_ids(mv: &SubsetMove) -> BTreeSet<usize> {
    mv.added_ids()
        .into_iter()
        .chain(mv.removed_ids())
        .collect()
}

#[test]
fn single_addition_respects_max_size() {
    let neighbourhood = SingleAdditionNeighbourhood::new().with_max_size(2);
    let mut rng = rng();
    let below = solution_with(5, &[0]);
    assert!(neighbourhood.random_move(&below, &mut rng).is_some());
    let at_cap = solution_with(5, &[0, 1]);
    assert!(neighbourhood.random_move(&at_cap, &mut rng).is_none());
    assert!(neighbourhood.all_moves(&at_cap).is_empty());
}

#[test]
fn single_addition_without_candidates_is_disabled() {
    let neighbourhood = SingleAdditionNeighbourhood::new();
    let full = solution_with(3, &[0, 1, 2]);
    assert!(neighbourhood.random_move(&full, &mut rng()).is_none());
}

#[test]
fn single_deletion_respects_min_size() {
    let neighbourhood = SingleDeletionNeighbourhood::new().with_min_size(2);
    let mut rng = rng();
    let above = solution_with(5, &[0, 1, 2]);
    assert!(neighbourhood.random_move(&above, &mut rng).is_some());
    let at_floor = solution_with(5, &[0, 1]);
    assert!(neighbourhood.random_move(&at_floor, &mut rng).is_none());
    assert!(neighbourhood.all_moves(&at_floor).is_empty());
}

#[test]
fn single_swap_needs_both_candidate_sets() {
    let neighbourhood = SingleSwapNeighbourhood::new();
    let mut rng = rng();
    assert!(neighbourhood.random_move(&solution_with(4, &[]), &mut rng).is_none());
    assert!(neighbourhood
        .random_move(&solution_with(4, &[0, 1, 2, 3]), &mut rng)
        .is_none());
    let mixed = solution_with(4, &[0, 1]);
    assert!(neighbourhood.random_move(&mixed, &mut rng).is_some());
    // 2 selected x 2 unselected swaps.
    assert_eq!(neighbourhood.all_moves(&mixed).len(), 4);
}

#[test]
fn perturbation_respects_the_size_window() {
    let neighbourhood = SinglePerturbationNeighbourhood::new(2, 3);
    let mut rng = rng();
    let at_min = solution_with(6, &[0, 1]);
    for _ in 0..50 {
        let mv = neighbourhood.random_move(&at_min, &mut rng).unwrap();
        let mut modified = at_min.clone();
        mv.apply(&mut modified).unwrap();
        assert!((2..=3).contains(&modified.selected_count()));
    }
    let at_max = solution_with(6, &[0, 1, 2]);
    for mv in neighbourhood.all_moves(&at_max) {
        let mut modified = at_max.clone();
        mv.apply(&mut modified).unwrap();
        assert!((2..=3).contains(&modified.selected_count()));
    }
}

#[test]
fn perturbation_is_disabled_when_all_kinds_are() {
    // Window forbids growth and shrinkage, and no unselected id remains for
    // a swap.
    let neighbourhood = SinglePerturbationNeighbourhood::new(3, 3);
    let full = solution_with(3, &[0, 1, 2]);
    assert!(neighbourhood.random_move(&full, &mut rng()).is_none());
    assert!(neighbourhood.all_moves(&full).is_empty());
}

#[test]
fn fixed_ids_are_never_touched() {
    let fixed = [1usize, 4];
    let solution = solution_with(8, &[0, 1, 2]);
    let mut rng = rng();

    let neighbourhoods: Vec<Box<dyn Neighbourhood<SubsetSolution, Move = SubsetMove>>> = vec![
        Box::new(SingleAdditionNeighbourhood::new().with_fixed_ids(fixed)),
        Box::new(SingleDeletionNeighbourhood::new().with_fixed_ids(fixed)),
        Box::new(SingleSwapNeighbourhood::new().with_fixed_ids(fixed)),
        Box::new(SinglePerturbationNeighbourhood::new(1, 6).with_fixed_ids(fixed)),
        Box::new(MultiAdditionNeighbourhood::new(3).with_fixed_ids(fixed)),
        Box::new(MultiDeletionNeighbourhood::new(2).with_fixed_ids(fixed)),
        Box::new(MultiSwapNeighbourhood::new(2).with_fixed_ids(fixed)),
        Box::new(DisjointMultiAdditionNeighbourhood::new(2).with_fixed_ids(fixed)),
        Box::new(DisjointMultiDeletionNeighbourhood::new(2).with_fixed_ids(fixed)),
        Box::new(DisjointMultiSwapNeighbourhood::new(2).with_fixed_ids(fixed)),
    ];

    for neighbourhood in &neighbourhoods {
        for mv in neighbourhood.all_moves(&solution) {
            let touched = touched_ids(&mv);
            assert!(!touched.contains(&1), "fixed id 1 touched by {mv:?}");
            assert!(!touched.contains(&4), "fixed id 4 touched by {mv:?}");
        }
        for _ in 0..20 {
            if let Some(mv) = neighbourhood.random_move(&solution, &mut rng) {
                let touched = touched_ids(&mv);
                assert!(!touched.contains(&1) && !touched.contains(&4));
            }
        }
    }
}

#[test]
fn multi_addition_enumerates_every_cardinality() {
    let neighbourhood = MultiAdditionNeighbourhood::new(2);
    let solution = solution_with(5, &[0]);
    // C(4,1) + C(4,2) = 4 + 6.
    assert_eq!(neighbourhood.all_moves(&solution).len(), 10);
}

#[test]
fn multi_addition_caps_cardinality_at_max_size() {
    let neighbourhood = MultiAdditionNeighbourhood::new(3).with_max_size(2);
    let solution = solution_with(5, &[0]);
    let moves = neighbourhood.all_moves(&solution);
    assert!(!moves.is_empty());
    assert!(moves.iter().all(|mv| mv.added_count() <= 1));
    let mut rng = rng();
    for _ in 0..20 {
        let mv = neighbourhood.random_move(&solution, &mut rng).unwrap();
        assert_eq!(mv.added_count(), 1);
    }
}

#[test]
fn multi_deletion_is_disabled_at_the_floor() {
    let neighbourhood = MultiDeletionNeighbourhood::new(2).with_min_size(2);
    let at_floor = solution_with(5, &[0, 1]);
    assert!(neighbourhood.random_move(&at_floor, &mut rng()).is_none());
    assert!(neighbourhood.all_moves(&at_floor).is_empty());
}

#[test]
fn multi_swap_balances_both_sides() {
    let neighbourhood = MultiSwapNeighbourhood::new(2);
    let solution = solution_with(6, &[0, 1, 2]);
    let mut rng = rng();
    for _ in 0..20 {
        let mv = neighbourhood.random_move(&solution, &mut rng).unwrap();
        assert_eq!(mv.added_count(), mv.removed_count());
        assert!((1..=2).contains(&mv.added_count()));
    }
    for mv in neighbourhood.all_moves(&solution) {
        assert_eq!(mv.added_count(), mv.removed_count());
    }
}

#[test]
fn disjoint_addition_moves_are_disjoint_chunks() {
    let neighbourhood = DisjointMultiAdditionNeighbourhood::new(3);
    let solution = solution_with(8, &[0]);
    let moves = neighbourhood.all_moves(&solution);
    // 7 candidates in chunks of 3: 3 + 3 + 1.
    assert_eq!(moves.len(), 3);
    let full_chunks = moves.iter().filter(|mv| mv.added_count() == 3).count();
    let remainder = moves.iter().filter(|mv| mv.added_count() < 3).count();
    assert_eq!(full_chunks, 2);
    assert_eq!(remainder, 1);
    let mut seen = BTreeSet::new();
    for mv in &moves {
        for id in mv.added_ids() {
            assert!(seen.insert(id), "id {id} appears in two moves");
        }
    }
    assert_eq!(seen.len(), 7);
}

#[test]
fn disjoint_deletion_honours_the_floor() {
    let neighbourhood = DisjointMultiDeletionNeighbourhood::new(3).with_min_size(2);
    let solution = solution_with(8, &[0, 1, 2, 3]);
    // Only 2 ids may go; every move removes at most 2.
    for mv in neighbourhood.all_moves(&solution) {
        assert!(mv.removed_count() <= 2);
    }
    let mv = neighbourhood.random_move(&solution, &mut rng()).unwrap();
    assert_eq!(mv.removed_count(), 2);
}

#[test]
fn disjoint_swap_pairs_chunks() {
    let neighbourhood = DisjointMultiSwapNeighbourhood::new(2);
    let solution = solution_with(9, &[0, 1, 2, 3]);
    let moves = neighbourhood.all_moves(&solution);
    assert!(!moves.is_empty());
    for mv in &moves {
        assert_eq!(mv.added_count(), mv.removed_count());
        assert!(mv.added_count() <= 2);
    }
    // At most one remainder move swaps fewer than two pairs.
    let partial = moves.iter().filter(|mv| mv.added_count() < 2).count();
    assert!(partial <= 1);
}

#[test]
fn enumeration_is_deterministic() {
    let solution = solution_with(7, &[0, 2, 4]);
    let neighbourhood = MultiSwapNeighbourhood::new(2);
    assert_eq!(
        neighbourhood.all_moves(&solution),
        neighbourhood.all_moves(&solution)
    );
}

#[test]
fn generated_moves_apply_cleanly() {
    let solution = solution_with(6, &[0, 3]);
    let mut rng = rng();
    let neighbourhoods: Vec<Box<dyn Neighbourhood<SubsetSolution, Move = SubsetMove>>> = vec![
        Box::new(SingleAdditionNeighbourhood::new()),
        Box::new(SingleDeletionNeighbourhood::new()),
        Box::new(SingleSwapNeighbourhood::new()),
        Box::new(MultiAdditionNeighbourhood::new(2)),
        Box::new(MultiDeletionNeighbourhood::new(2)),
        Box::new(MultiSwapNeighbourhood::new(2)),
        Box::new(DisjointMultiAdditionNeighbourhood::new(2)),
        Box::new(DisjointMultiDeletionNeighbourhood::new(2)),
        Box::new(DisjointMultiSwapNeighbourhood::new(2)),
    ];
    for neighbourhood in &neighbourhoods {
        for mv in neighbourhood.all_moves(&solution) {
            let mut copy = solution.clone();
            mv.apply(&mut copy).unwrap();
            mv.undo(&mut copy).unwrap();
            assert_eq!(copy, solution);
        }
        for _ in 0..10 {
            if let Some(mv) = neighbourhood.random_move(&solution, &mut rng) {
                let mut copy = solution.clone();
                mv.apply(&mut copy).unwrap();
            }
        }
    }
}

//! Set sampling utilities.

use std::collections::BTreeSet;

use rand::seq::index;
use rand::{Rng, RngCore};

/// Picks a uniformly random element from the set, or `None` if it is empty.
pub fn random_element<T: Copy + Ord>(set: &BTreeSet<T>, rng: &mut dyn RngCore) -> Option<T> {
    if set.is_empty() {
        return None;
    }
    let index = rng.random_range(0..set.len());
    set.iter().nth(index).copied()
}

/// Picks a uniformly random subset of the given size from the set.
///
/// # Panics
///
/// Panics if `size` exceeds the number of elements in the set.
pub fn random_subset<T: Copy + Ord>(
    set: &BTreeSet<T>,
    size: usize,
    rng: &mut dyn RngCore,
) -> BTreeSet<T> {
    assert!(size <= set.len(), "cannot sample {size} of {}", set.len());
    let items: Vec<T> = set.iter().copied().collect();
    index::sample(rng, items.len(), size)
        .iter()
        .map(|i| items[i])
        .collect()
}

/// Picks `count` distinct ids uniformly at random from a candidate slice.
pub fn sample_ids(candidates: &[usize], count: usize, rng: &mut dyn RngCore) -> BTreeSet<usize> {
    assert!(
        count <= candidates.len(),
        "cannot sample {count} of {}",
        candidates.len()
    );
    index::sample(rng, candidates.len(), count)
        .iter()
        .map(|i| candidates[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn random_element_of_empty_set_is_none() {
        let set: BTreeSet<usize> = BTreeSet::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(random_element(&set, &mut rng).is_none());
    }

    #[test]
    fn random_element_comes_from_the_set() {
        let set: BTreeSet<usize> = (10..20).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..50 {
            let element = random_element(&set, &mut rng).unwrap();
            assert!(set.contains(&element));
        }
    }

    #[test]
    fn random_subset_has_the_requested_size() {
        let set: BTreeSet<usize> = (0..30).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for size in [0, 1, 15, 30] {
            let subset = random_subset(&set, size, &mut rng);
            assert_eq!(subset.len(), size);
            assert!(subset.is_subset(&set));
        }
    }

    #[test]
    fn sampled_ids_are_distinct_candidates() {
        let candidates: Vec<usize> = vec![2, 4, 8, 16, 32];
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let ids = sample_ids(&candidates, 3, &mut rng);
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| candidates.contains(id)));
    }
}

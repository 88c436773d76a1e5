//! Per-step evaluated-move caches.

use std::collections::VecDeque;
use std::sync::Arc;

use locus_core::{Evaluation, Validation};

/// Cache of move evaluations and validations, keyed by move identity.
///
/// A cache is only valid for the solution it was filled against; searches
/// clear it whenever the current solution changes. Cached values must be
/// exactly what the corresponding computation would have returned.
pub trait EvaluatedMoveCache<M: Clone + Eq>: Send {
    /// Stores the evaluation of a move.
    fn cache_evaluation(&mut self, mv: &M, evaluation: Arc<dyn Evaluation>);

    /// Returns the cached evaluation of a move, if present.
    fn cached_evaluation(&self, mv: &M) -> Option<Arc<dyn Evaluation>>;

    /// Stores the validation of a move.
    fn cache_validation(&mut self, mv: &M, validation: Arc<dyn Validation>);

    /// Returns the cached validation of a move, if present.
    fn cached_validation(&self, mv: &M) -> Option<Arc<dyn Validation>>;

    /// Drops all cached values.
    fn clear(&mut self);
}

/// Cache retaining the single most recently stored move per slot.
#[derive(Debug, Default)]
pub struct SingleEvaluatedMoveCache<M> {
    evaluation: Option<(M, Arc<dyn Evaluation>)>,
    validation: Option<(M, Arc<dyn Validation>)>,
}

impl<M> SingleEvaluatedMoveCache<M> {
    pub fn new() -> Self {
        Self {
            evaluation: None,
            validation: None,
        }
    }
}

impl<M: Clone + Eq + Send> EvaluatedMoveCache<M> for SingleEvaluatedMoveCache<M> {
    fn cache_evaluation(&mut self, mv: &M, evaluation: Arc<dyn Evaluation>) {
        self.evaluation = Some((mv.clone(), evaluation));
    }

    fn cached_evaluation(&self, mv: &M) -> Option<Arc<dyn Evaluation>> {
        self.evaluation
            .as_ref()
            .filter(|(cached, _)| cached == mv)
            .map(|(_, evaluation)| Arc::clone(evaluation))
    }

    fn cache_validation(&mut self, mv: &M, validation: Arc<dyn Validation>) {
        self.validation = Some((mv.clone(), validation));
    }

    fn cached_validation(&self, mv: &M) -> Option<Arc<dyn Validation>> {
        self.validation
            .as_ref()
            .filter(|(cached, _)| cached == mv)
            .map(|(_, validation)| Arc::clone(validation))
    }

    fn clear(&mut self) {
        self.evaluation = None;
        self.validation = None;
    }
}

/// Bounded cache evicting the least recently stored entries first.
#[derive(Debug)]
pub struct LruEvaluatedMoveCache<M> {
    capacity: usize,
    entries: VecDeque<(M, Option<Arc<dyn Evaluation>>, Option<Arc<dyn Validation>>)>,
}

impl<M: Clone + Eq> LruEvaluatedMoveCache<M> {
    /// Creates a cache holding at most `capacity` moves.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "cache capacity must be at least one");
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    fn entry_mut(
        &mut self,
        mv: &M,
    ) -> &mut (M, Option<Arc<dyn Evaluation>>, Option<Arc<dyn Validation>>) {
        if let Some(index) = self.entries.iter().position(|(m, _, _)| m == mv) {
            // Move to the back: most recently used.
            let entry = self.entries.remove(index).expect("index just found");
            self.entries.push_back(entry);
        } else {
            if self.entries.len() == self.capacity {
                self.entries.pop_front();
            }
            self.entries.push_back((mv.clone(), None, None));
        }
        self.entries.back_mut().expect("entry just pushed")
    }

    fn entry(&self, mv: &M) -> Option<&(M, Option<Arc<dyn Evaluation>>, Option<Arc<dyn Validation>>)> {
        self.entries.iter().find(|(m, _, _)| m == mv)
    }
}

impl<M: Clone + Eq + Send> EvaluatedMoveCache<M> for LruEvaluatedMoveCache<M> {
    fn cache_evaluation(&mut self, mv: &M, evaluation: Arc<dyn Evaluation>) {
        self.entry_mut(mv).1 = Some(evaluation);
    }

    fn cached_evaluation(&self, mv: &M) -> Option<Arc<dyn Evaluation>> {
        self.entry(mv).and_then(|(_, e, _)| e.clone())
    }

    fn cache_validation(&mut self, mv: &M, validation: Arc<dyn Validation>) {
        self.entry_mut(mv).2 = Some(validation);
    }

    fn cached_validation(&self, mv: &M) -> Option<Arc<dyn Validation>> {
        self.entry(mv).and_then(|(_, _, v)| v.clone())
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locus_core::SimpleEvaluation;

    fn eval(value: f64) -> Arc<dyn Evaluation> {
        Arc::new(SimpleEvaluation::new(value))
    }

    #[test]
    fn single_cache_hits_on_the_same_move() {
        let mut cache: SingleEvaluatedMoveCache<u32> = SingleEvaluatedMoveCache::new();
        cache.cache_evaluation(&7, eval(1.5));
        assert_eq!(cache.cached_evaluation(&7).unwrap().value(), 1.5);
        assert!(cache.cached_evaluation(&8).is_none());
    }

    #[test]
    fn single_cache_keeps_only_the_last_move() {
        let mut cache: SingleEvaluatedMoveCache<u32> = SingleEvaluatedMoveCache::new();
        cache.cache_evaluation(&1, eval(1.0));
        cache.cache_evaluation(&2, eval(2.0));
        assert!(cache.cached_evaluation(&1).is_none());
        assert_eq!(cache.cached_evaluation(&2).unwrap().value(), 2.0);
    }

    #[test]
    fn clear_empties_both_slots() {
        let mut cache: SingleEvaluatedMoveCache<u32> = SingleEvaluatedMoveCache::new();
        cache.cache_evaluation(&1, eval(1.0));
        cache.cache_validation(&1, Arc::new(locus_core::SimpleValidation::PASSED));
        cache.clear();
        assert!(cache.cached_evaluation(&1).is_none());
        assert!(cache.cached_validation(&1).is_none());
    }

    #[test]
    fn lru_cache_evicts_the_oldest_entry() {
        let mut cache: LruEvaluatedMoveCache<u32> = LruEvaluatedMoveCache::new(2);
        cache.cache_evaluation(&1, eval(1.0));
        cache.cache_evaluation(&2, eval(2.0));
        cache.cache_evaluation(&3, eval(3.0));
        assert!(cache.cached_evaluation(&1).is_none());
        assert_eq!(cache.cached_evaluation(&2).unwrap().value(), 2.0);
        assert_eq!(cache.cached_evaluation(&3).unwrap().value(), 3.0);
    }

    #[test]
    fn lru_cache_refreshes_on_reuse() {
        let mut cache: LruEvaluatedMoveCache<u32> = LruEvaluatedMoveCache::new(2);
        cache.cache_evaluation(&1, eval(1.0));
        cache.cache_evaluation(&2, eval(2.0));
        // Touch 1, making 2 the oldest.
        cache.cache_validation(&1, Arc::new(locus_core::SimpleValidation::PASSED));
        cache.cache_evaluation(&3, eval(3.0));
        assert!(cache.cached_evaluation(&2).is_none());
        assert!(cache.cached_evaluation(&1).is_some());
    }
}

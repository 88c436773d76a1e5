//! Solution trait definition.

use std::fmt::Debug;
use std::hash::Hash;

/// A candidate solution that a search can hold, copy and compare.
///
/// Deep copies are taken with [`Clone`]; the `Clone` bound guarantees at the
/// type level that copying a solution yields exactly the same concrete type.
/// Semantic equality and the matching hash come from `Eq + Hash`: two
/// solutions are equal when they describe the same assignment, regardless of
/// how they were constructed.
///
/// # Example
///
/// ```
/// use locus_core::Solution;
///
/// #[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// struct TourSolution {
///     order: Vec<usize>,
/// }
///
/// impl Solution for TourSolution {}
/// ```
pub trait Solution: Clone + Eq + Hash + Debug + Send + 'static {}

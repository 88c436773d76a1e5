//! Move trait definition.

use std::any::Any;
use std::fmt::Debug;

use crate::error::Result;

/// A reversible mutation of a solution.
///
/// Applying a move mutates the solution in place; undoing it restores the
/// state from directly before the matching [`apply`](Move::apply). `undo` is
/// only defined when the solution has not been touched since that apply.
///
/// Both operations return [`LocusError::SolutionModification`] when the
/// move's preconditions do not hold (e.g. adding an id that is already
/// selected).
///
/// Implementations should derive or implement `PartialEq`, `Eq` and `Hash`
/// so that evaluated-move caches can key on move identity.
///
/// # Type Parameters
/// * `S` - The solution type this move mutates
///
/// [`LocusError::SolutionModification`]: crate::LocusError::SolutionModification
pub trait Move<S>: Any + Debug + Send + Sync {
    /// Applies this move to the given solution.
    fn apply(&self, solution: &mut S) -> Result<()>;

    /// Undoes this move, assuming it was the last mutation applied.
    fn undo(&self, solution: &mut S) -> Result<()>;

    /// Returns self as [`Any`] so delta implementations can inspect the
    /// concrete move variant.
    fn as_any(&self) -> &dyn Any;
}

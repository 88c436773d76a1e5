//! Neighbourhood trait definition.

use std::hash::Hash;

use rand::RngCore;

use crate::moves::Move;

/// A move-generating neighbourhood over solutions of type `S`.
///
/// A neighbourhood defines which solutions are adjacent to a given one by
/// producing the moves that lead to them. Searches either sample a single
/// random move per step or enumerate the whole neighbourhood.
///
/// # Contract
///
/// * [`random_move`](Neighbourhood::random_move) returns `None` iff no valid
///   move exists from the given solution in this neighbourhood. All disabled
///   cases are reported uniformly as `None`; there are no sentinel moves.
/// * [`all_moves`](Neighbourhood::all_moves) returns a finite enumeration in
///   unspecified but deterministic order; it may be empty.
pub trait Neighbourhood<S>: Send + Sync {
    /// The concrete move type this neighbourhood produces.
    type Move: Move<S> + Clone + PartialEq + Eq + Hash;

    /// Generates a single random move, or `None` if the neighbourhood has no
    /// valid move from `solution`.
    fn random_move(&self, solution: &S, rng: &mut dyn RngCore) -> Option<Self::Move>;

    /// Enumerates every move available from `solution`.
    fn all_moves(&self, solution: &S) -> Vec<Self::Move>;
}

impl<S, N> Neighbourhood<S> for Box<N>
where
    N: Neighbourhood<S> + ?Sized,
{
    type Move = N::Move;

    fn random_move(&self, solution: &S, rng: &mut dyn RngCore) -> Option<Self::Move> {
        (**self).random_move(solution, rng)
    }

    fn all_moves(&self, solution: &S) -> Vec<Self::Move> {
        (**self).all_moves(solution)
    }
}

use crate::*;
use std::collections::BTreeSet;

/// A game on a graph, as supplied by an external collaborator.
///
/// Implementors describe states, enabled actions, the transition function,
/// turns, and atomic-proposition labels. The description is compiled once
/// into an immutable [`Game`] by [`Game::build`]; the solvers never call
/// back into the implementor.
///
/// # Required Methods
///
/// - `kind()`: declared shape of `delta`
/// - `init_states()`: where exploration starts
/// - `actions(state)`: actions enabled at a state
/// - `delta(state, action)`: successors of a `(state, action)` pair
/// - `turn(state)`: controller of a state
///
/// # Enumeration
///
/// When `states()` returns the full state set, exploration starts from all
/// of them and any successor outside the set is rejected. Otherwise
/// exploration starts from `init_states()` and each reached state is checked
/// with `is_valid`.
pub trait GameGraph {
    type S: Ident;
    type A: Ident;

    fn kind(&self) -> Transitions;
    fn init_states(&self) -> Vec<Self::S>;
    fn actions(&self, state: &Self::S) -> Vec<Self::A>;
    fn delta(&self, state: &Self::S, action: &Self::A) -> Delta<Self::S>;
    fn turn(&self, state: &Self::S) -> Player;

    /// Full state set, when it is known up front.
    fn states(&self) -> Option<Vec<Self::S>> {
        None
    }
    /// Whether a reached state belongs to the game.
    fn is_valid(&self, _: &Self::S) -> bool {
        true
    }
    /// Atomic propositions holding at a state.
    fn label(&self, _: &Self::S) -> BTreeSet<String> {
        BTreeSet::new()
    }
}

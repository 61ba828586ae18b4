use crate::*;
use std::collections::BTreeSet;

/// A qualitative reachability solver over a compiled [`Game`].
///
/// Implementors own their outputs: the partition into winning regions and
/// the edges consistent with a winning strategy. Outputs are created fresh
/// by each effective [`solve`](Self::solve) and read through the accessors.
///
/// # Lifecycle
///
/// `Unsolved -> Solved`. Calling `solve(false)` on a solved instance keeps
/// the previous results and records [`Event::AlreadySolved`];
/// `solve(true)` recomputes from scratch.
pub trait Reachability {
    type S: Ident;
    type A: Ident;

    /// Component name used as the diagnostic and log target.
    const COMPONENT: &'static str;

    fn game(&self) -> &Game<Self::S, Self::A>;
    fn status(&self) -> Status;
    fn diagnostics(&self) -> &Diagnostics;
    fn diagnostics_mut(&mut self) -> &mut Diagnostics;
    /// Recompute the solution unconditionally.
    fn compute(&mut self);
    /// States the objective asks to reach.
    fn target(&self) -> BTreeSet<Self::S>;
    /// Winning region of `player`.
    fn winning(&self, player: Player) -> BTreeSet<Self::S>;
    /// Edges consistent with a winning strategy of `player`.
    fn winning_edges(&self, player: Player) -> BTreeSet<Transition<Self::S, Self::A>>;

    /// Solve, guarding against silently discarding an earlier solution.
    fn solve(&mut self, force: bool) {
        match (self.status(), force) {
            (Status::Solved, false) => self.diagnostics_mut().emit(
                Self::COMPONENT,
                Event::AlreadySolved,
                "call solve(force = true) to recompute",
            ),
            _ => self.compute(),
        }
    }
    fn is_solved(&self) -> bool {
        self.status() == Status::Solved
    }
}

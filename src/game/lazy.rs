use crate::*;
use std::collections::BTreeSet;

type Rule<S, T> = Box<dyn Fn(&S) -> T + Send + Sync>;

/// Closure-backed [`GameGraph`] whose states are generated on demand.
///
/// Only the initial states are listed; everything else is discovered by
/// applying `actions` and `delta` during [`Game::build`]. Useful for
/// parameterized games (grids, counters) whose state space would be tedious
/// to tabulate.
pub struct Lazy<S, A>
where
    S: Ident,
    A: Ident,
{
    kind: Transitions,
    init: Vec<S>,
    actions: Rule<S, Vec<A>>,
    delta: Box<dyn Fn(&S, &A) -> Delta<S> + Send + Sync>,
    turn: Rule<S, Player>,
    valid: Rule<S, bool>,
    label: Rule<S, BTreeSet<String>>,
}

impl<S, A> Lazy<S, A>
where
    S: Ident,
    A: Ident,
{
    pub fn new(
        kind: Transitions,
        init: impl IntoIterator<Item = S>,
        actions: impl Fn(&S) -> Vec<A> + Send + Sync + 'static,
        delta: impl Fn(&S, &A) -> Delta<S> + Send + Sync + 'static,
        turn: impl Fn(&S) -> Player + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            init: init.into_iter().collect(),
            actions: Box::new(actions),
            delta: Box::new(delta),
            turn: Box::new(turn),
            valid: Box::new(|_| true),
            label: Box::new(|_| BTreeSet::new()),
        }
    }
    /// Restrict the reachable state space.
    pub fn valid(mut self, valid: impl Fn(&S) -> bool + Send + Sync + 'static) -> Self {
        self.valid = Box::new(valid);
        self
    }
    /// Label generated states with atomic propositions.
    pub fn label(
        mut self,
        label: impl Fn(&S) -> BTreeSet<String> + Send + Sync + 'static,
    ) -> Self {
        self.label = Box::new(label);
        self
    }
}

impl<S, A> GameGraph for Lazy<S, A>
where
    S: Ident,
    A: Ident,
{
    type S = S;
    type A = A;
    fn kind(&self) -> Transitions {
        self.kind
    }
    fn init_states(&self) -> Vec<S> {
        self.init.clone()
    }
    fn is_valid(&self, state: &S) -> bool {
        (self.valid)(state)
    }
    fn actions(&self, state: &S) -> Vec<A> {
        (self.actions)(state)
    }
    fn delta(&self, state: &S, action: &A) -> Delta<S> {
        (self.delta)(state, action)
    }
    fn turn(&self, state: &S) -> Player {
        (self.turn)(state)
    }
    fn label(&self, state: &S) -> BTreeSet<String> {
        (self.label)(state)
    }
}

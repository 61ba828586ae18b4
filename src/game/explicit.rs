use crate::*;
use std::collections::BTreeSet;
use std::collections::HashMap;

/// Table-backed [`GameGraph`].
///
/// Every state, turn, action, and successor is listed up front. Built with
/// chained calls:
///
/// ```
/// use hypergame::*;
/// let graph = Explicit::new(Transitions::Deterministic)
///     .state(0, Player::P1)
///     .state(1, Player::P2)
///     .edge(0, 'a', 1)
///     .edge(1, 'b', 0);
/// let game = Game::build(&graph).unwrap();
/// assert_eq!(game.n(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Explicit<S, A>
where
    S: Ident,
    A: Ident,
{
    kind: Transitions,
    states: Vec<S>,
    known: HashMap<S, Player>,
    init: Vec<S>,
    actions: HashMap<S, Vec<A>>,
    delta: HashMap<(S, A), Delta<S>>,
    labels: HashMap<S, BTreeSet<String>>,
}

impl<S, A> Explicit<S, A>
where
    S: Ident,
    A: Ident,
{
    pub fn new(kind: Transitions) -> Self {
        Self {
            kind,
            states: Vec::new(),
            known: HashMap::new(),
            init: Vec::new(),
            actions: HashMap::new(),
            delta: HashMap::new(),
            labels: HashMap::new(),
        }
    }
    /// Declare a state and its controller. Redeclaring overwrites the turn.
    pub fn state(mut self, state: S, turn: Player) -> Self {
        if self.known.insert(state.clone(), turn).is_none() {
            self.states.push(state);
        }
        self
    }
    /// Mark a declared state as initial.
    pub fn init(mut self, state: S) -> Self {
        self.init.push(state);
        self
    }
    /// Attach an atomic proposition to a state.
    pub fn label(mut self, state: S, atom: impl Into<String>) -> Self {
        self.labels.entry(state).or_default().insert(atom.into());
        self
    }
    /// Deterministic transition `state --action--> next`.
    pub fn edge(self, state: S, action: A, next: S) -> Self {
        self.transition(state, action, Delta::One(next))
    }
    /// Non-deterministic transition `state --action--> {next}`.
    pub fn choice(self, state: S, action: A, next: impl IntoIterator<Item = S>) -> Self {
        self.transition(state, action, Delta::Many(next.into_iter().collect()))
    }
    /// Probabilistic transition `state --action--> {next: p}`.
    pub fn lottery(
        self,
        state: S,
        action: A,
        next: impl IntoIterator<Item = (S, Probability)>,
    ) -> Self {
        self.transition(state, action, Delta::Lottery(next.into_iter().collect()))
    }
    /// Any transition. Replaces an earlier `(state, action)` entry.
    pub fn transition(mut self, state: S, action: A, delta: Delta<S>) -> Self {
        let key = (state.clone(), action.clone());
        if self.delta.insert(key, delta).is_none() {
            self.actions.entry(state).or_default().push(action);
        }
        self
    }
}

impl<S, A> GameGraph for Explicit<S, A>
where
    S: Ident,
    A: Ident,
{
    type S = S;
    type A = A;
    fn kind(&self) -> Transitions {
        self.kind
    }
    fn states(&self) -> Option<Vec<S>> {
        Some(self.states.clone())
    }
    fn init_states(&self) -> Vec<S> {
        self.init.clone()
    }
    fn is_valid(&self, state: &S) -> bool {
        self.known.contains_key(state)
    }
    fn actions(&self, state: &S) -> Vec<A> {
        self.actions.get(state).cloned().unwrap_or_default()
    }
    fn delta(&self, state: &S, action: &A) -> Delta<S> {
        self.delta
            .get(&(state.clone(), action.clone()))
            .cloned()
            .unwrap_or(Delta::Many(Vec::new()))
    }
    fn turn(&self, state: &S) -> Player {
        self.known.get(state).copied().unwrap_or(Player::P1)
    }
    fn label(&self, state: &S) -> BTreeSet<String> {
        self.labels.get(state).cloned().unwrap_or_default()
    }
}

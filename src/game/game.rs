use crate::*;
use anyhow::Context;
use petgraph::Direction;
use fixedbitset::FixedBitSet;
use petgraph::graph::DiGraph;
use petgraph::graph::EdgeIndex;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;

/// A state as stored in the arena.
#[derive(Debug, Clone)]
pub struct Vertex<S> {
    pub state: S,
    pub turn: Player,
    pub labels: BTreeSet<String>,
}

/// An edge as stored in the arena. Parallel edges differ by action.
#[derive(Debug, Clone)]
pub struct Link<A> {
    pub action: A,
    pub probability: Option<Probability>,
}

/// A labelled transition `source --action--> target`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Transition<S, A> {
    pub source: S,
    pub target: S,
    pub action: A,
}

/// Immutable, compiled game graph.
///
/// States live in a petgraph arena and are addressed by `NodeIndex`
/// internally. Solvers share one `Game` behind an `Arc` and never mutate it;
/// exclusions during solving go through a [`View`].
#[derive(Debug, Clone)]
pub struct Game<S, A>
where
    S: Ident,
    A: Ident,
{
    kind: Transitions,
    graph: DiGraph<Vertex<S>, Link<A>>,
    index: HashMap<S, NodeIndex>,
    init: Vec<NodeIndex>,
}

impl<S, A> Game<S, A>
where
    S: Ident,
    A: Ident,
{
    /// Compile a [`GameGraph`] by breadth-first exploration.
    ///
    /// Fails on malformed input: an invalid initial state, a successor
    /// outside the declared state set, a delta whose shape disagrees with
    /// the declared kind, an empty successor set, or a lottery whose mass is
    /// not one.
    pub fn build<G>(source: &G) -> anyhow::Result<Self>
    where
        G: GameGraph<S = S, A = A>,
    {
        let kind = source.kind();
        let declared = source
            .states()
            .map(|states| states.into_iter().collect::<HashSet<S>>());
        let valid = |s: &S| declared.as_ref().map_or(true, |d| d.contains(s)) && source.is_valid(s);
        let init = source.init_states();
        for s in init.iter() {
            anyhow::ensure!(valid(s), "initial state {:?} is not a state of the game", s);
        }
        let seeds = match source.states() {
            Some(states) => states,
            None => init.clone(),
        };
        let mut game = Self::new(kind);
        let mut queue = VecDeque::new();
        for s in seeds {
            if game.index.contains_key(&s) {
                continue;
            }
            game.add_state(s.clone(), source.turn(&s), source.label(&s));
            queue.push_back(s);
        }
        while let Some(s) = queue.pop_front() {
            let u = game.index(&s)?;
            for a in source.actions(&s) {
                let delta = source.delta(&s, &a);
                anyhow::ensure!(
                    delta.kind() == kind,
                    "transition ({:?}, {:?}) is {} in a {} game",
                    s,
                    a,
                    delta.kind(),
                    kind
                );
                anyhow::ensure!(
                    !delta.is_empty(),
                    "transition ({:?}, {:?}) has no successors",
                    s,
                    a
                );
                anyhow::ensure!(
                    (delta.mass() - 1.).abs() <= PROBABILITY_TOLERANCE,
                    "transition ({:?}, {:?}) has probability mass {}",
                    s,
                    a,
                    delta.mass()
                );
                for (t, p) in delta.outcomes() {
                    anyhow::ensure!(
                        valid(&t),
                        "successor {:?} of ({:?}, {:?}) is not a state of the game",
                        t,
                        s,
                        a
                    );
                    let v = match game.index.get(&t) {
                        Some(v) => *v,
                        None => {
                            queue.push_back(t.clone());
                            game.add_state(t.clone(), source.turn(&t), source.label(&t))
                        }
                    };
                    game.add_edge(u, v, a.clone(), p);
                }
            }
        }
        game.init = init
            .iter()
            .map(|s| game.index(s))
            .collect::<anyhow::Result<Vec<_>>>()?;
        log::debug!("{:<32}{:<32}", "compiled    game", game);
        Ok(game)
    }

    pub(crate) fn new(kind: Transitions) -> Self {
        Self {
            kind,
            graph: DiGraph::new(),
            index: HashMap::new(),
            init: Vec::new(),
        }
    }
    /// Insert a state, or return the existing node for it.
    pub(crate) fn add_state(&mut self, state: S, turn: Player, labels: BTreeSet<String>) -> NodeIndex {
        if let Some(n) = self.index.get(&state) {
            return *n;
        }
        let n = self.graph.add_node(Vertex {
            state: state.clone(),
            turn,
            labels,
        });
        self.index.insert(state, n);
        n
    }
    /// Insert an edge. An identical `(source, target, action)` triple is kept once.
    pub(crate) fn add_edge(
        &mut self,
        u: NodeIndex,
        v: NodeIndex,
        action: A,
        probability: Option<Probability>,
    ) -> EdgeIndex {
        match self
            .graph
            .edges_connecting(u, v)
            .find(|e| e.weight().action == action)
        {
            Some(e) => e.id(),
            None => self.graph.add_edge(u, v, Link { action, probability }),
        }
    }

    pub fn kind(&self) -> Transitions {
        self.kind
    }
    /// Number of states.
    pub fn n(&self) -> usize {
        self.graph.node_count()
    }
    /// Number of edges.
    pub fn m(&self) -> usize {
        self.graph.edge_count()
    }
    pub fn graph(&self) -> &DiGraph<Vertex<S>, Link<A>> {
        &self.graph
    }
    pub fn node(&self, state: &S) -> Option<NodeIndex> {
        self.index.get(state).copied()
    }
    /// Like [`Game::node`], failing on unknown states.
    pub fn index(&self, state: &S) -> anyhow::Result<NodeIndex> {
        self.node(state)
            .with_context(|| format!("state {:?} is not in the game", state))
    }
    pub fn contains(&self, state: &S) -> bool {
        self.index.contains_key(state)
    }
    pub fn state(&self, n: NodeIndex) -> &S {
        &self.graph[n].state
    }
    pub fn turn(&self, n: NodeIndex) -> Player {
        self.graph[n].turn
    }
    pub fn labels(&self, n: NodeIndex) -> &BTreeSet<String> {
        &self.graph[n].labels
    }
    pub fn action(&self, e: EdgeIndex) -> &A {
        &self.graph[e].action
    }
    pub fn probability(&self, e: EdgeIndex) -> Option<Probability> {
        self.graph[e].probability
    }
    pub fn source(&self, e: EdgeIndex) -> NodeIndex {
        self.graph.raw_edges()[e.index()].source()
    }
    pub fn target(&self, e: EdgeIndex) -> NodeIndex {
        self.graph.raw_edges()[e.index()].target()
    }
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }
    pub fn edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }
    pub fn outgoing(&self, n: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph
            .edges_directed(n, Direction::Outgoing)
            .map(|e| e.id())
    }
    pub fn incoming(&self, n: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph
            .edges_directed(n, Direction::Incoming)
            .map(|e| e.id())
    }
    pub fn states(&self) -> impl Iterator<Item = &S> + '_ {
        self.graph.node_weights().map(|v| &v.state)
    }
    pub fn init(&self) -> impl Iterator<Item = &S> + '_ {
        self.init.iter().map(|n| self.state(*n))
    }

    /// States carrying an atomic proposition, e.g. the true final set.
    pub fn labelled(&self, atom: &str) -> BTreeSet<S> {
        self.graph
            .node_weights()
            .filter(|v| v.labels.contains(atom))
            .map(|v| v.state.clone())
            .collect()
    }
    pub fn actions(&self, state: &S) -> BTreeSet<A> {
        self.node(state)
            .into_iter()
            .flat_map(|n| self.outgoing(n))
            .map(|e| self.action(e).clone())
            .collect()
    }
    /// Successors of `state` under one action.
    pub fn delta(&self, state: &S, action: &A) -> BTreeSet<S> {
        self.node(state)
            .into_iter()
            .flat_map(|n| self.outgoing(n))
            .filter(|e| self.action(*e) == action)
            .map(|e| self.state(self.target(e)).clone())
            .collect()
    }
    pub fn successors(&self, state: &S) -> BTreeSet<S> {
        self.node(state)
            .into_iter()
            .flat_map(|n| self.outgoing(n))
            .map(|e| self.state(self.target(e)).clone())
            .collect()
    }
    pub fn predecessors(&self, state: &S) -> BTreeSet<S> {
        self.node(state)
            .into_iter()
            .flat_map(|n| self.incoming(n))
            .map(|e| self.state(self.source(e)).clone())
            .collect()
    }
    pub fn transition(&self, e: EdgeIndex) -> Transition<S, A> {
        Transition {
            source: self.state(self.source(e)).clone(),
            target: self.state(self.target(e)).clone(),
            action: self.action(e).clone(),
        }
    }
    pub fn transitions(&self) -> BTreeSet<Transition<S, A>> {
        self.edges().map(|e| self.transition(e)).collect()
    }

    /// Node mask of a state set. Unknown states are an error.
    pub fn mask<'a>(&self, states: impl IntoIterator<Item = &'a S>) -> anyhow::Result<FixedBitSet>
    where
        S: 'a,
    {
        let mut mask = FixedBitSet::with_capacity(self.n());
        for s in states {
            mask.insert(self.index(s)?.index());
        }
        Ok(mask)
    }
    /// States selected by a node mask.
    pub fn unmask(&self, mask: &FixedBitSet) -> BTreeSet<S> {
        mask.ones()
            .map(|i| self.state(NodeIndex::new(i)).clone())
            .collect()
    }
    /// Transitions selected by an edge mask.
    pub fn unmask_edges(&self, mask: &FixedBitSet) -> BTreeSet<Transition<S, A>> {
        mask.ones()
            .map(|i| self.transition(EdgeIndex::new(i)))
            .collect()
    }
    /// Whether every state is controlled by one of `players`.
    pub fn played_by(&self, players: &[Player]) -> bool {
        self.graph
            .node_weights()
            .all(|v| players.contains(&v.turn))
    }
}

impl<S, A> std::fmt::Display for Game<S, A>
where
    S: Ident,
    A: Ident,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let actions = self
            .graph
            .edge_weights()
            .map(|e| &e.action)
            .collect::<HashSet<_>>()
            .len();
        let atoms = self
            .graph
            .node_weights()
            .flat_map(|v| v.labels.iter())
            .collect::<HashSet<_>>()
            .len();
        write!(
            f,
            "|V|={} |E|={} |A|={} |AP|={}",
            self.n(),
            self.m(),
            actions,
            atoms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Explicit<u32, char> {
        Explicit::new(Transitions::Deterministic)
            .state(0, Player::P1)
            .state(1, Player::P2)
            .state(2, Player::P1)
            .edge(0, 'a', 1)
            .edge(0, 'b', 1)
            .edge(1, 'c', 2)
            .edge(2, 'd', 2)
            .label(2, GOAL)
    }

    #[test]
    fn build_explicit() {
        let game = Game::build(&line()).unwrap();
        assert!(game.n() == 3);
        assert!(game.m() == 4);
        assert!(game.labelled(GOAL) == BTreeSet::from([2]));
        assert!(game.successors(&0) == BTreeSet::from([1]));
        assert!(game.predecessors(&2) == BTreeSet::from([1, 2]));
        assert!(game.actions(&0) == BTreeSet::from(['a', 'b']));
        assert!(game.delta(&1, &'c') == BTreeSet::from([2]));
    }

    #[test]
    fn parallel_edges_are_distinguished_by_action() {
        let game = Game::build(&line()).unwrap();
        let u = game.index(&0).unwrap();
        let v = game.index(&1).unwrap();
        assert!(game.graph().edges_connecting(u, v).count() == 2);
        let mut game = game;
        game.add_edge(u, v, 'a', None);
        assert!(game.m() == 4);
    }

    #[test]
    fn build_lazy_counter() {
        let graph = Lazy::new(
            Transitions::Deterministic,
            [0u32],
            |_| vec!["inc", "stay"],
            |s, a| match *a {
                "inc" => Delta::One((s + 1) % 4),
                _ => Delta::One(*s),
            },
            |s| if s % 2 == 0 { Player::P1 } else { Player::P2 },
        );
        let game = Game::build(&graph).unwrap();
        assert!(game.n() == 4);
        assert!(game.m() == 8);
        assert!(game.init().cloned().collect::<Vec<_>>() == vec![0]);
    }

    #[test]
    fn undeclared_successor_fails() {
        let graph = line().edge(2, 'e', 7);
        assert!(Game::build(&graph).is_err());
    }

    #[test]
    fn invalid_lazy_successor_fails() {
        let graph = Lazy::new(
            Transitions::Deterministic,
            [0u32],
            |_| vec![()],
            |s, _| Delta::One(s + 1),
            |_| Player::P1,
        )
        .valid(|s| *s < 3);
        assert!(Game::build(&graph).is_err());
    }

    #[test]
    fn kind_mismatch_fails() {
        let graph = line().choice(0, 'z', [1, 2]);
        assert!(Game::build(&graph).is_err());
    }

    #[test]
    fn lottery_mass_must_be_one() {
        let good = Explicit::new(Transitions::Probabilistic)
            .state(0, Player::P1)
            .state(1, Player::Nature)
            .lottery(0, 'a', [(0, 0.5), (1, 0.5)])
            .lottery(1, 'n', [(1, 1.0)]);
        let bad = good.clone().lottery(0, 'b', [(0, 0.5), (1, 0.4)]);
        assert!(Game::build(&good).is_ok());
        assert!(Game::build(&bad).is_err());
    }

    #[test]
    fn empty_choice_fails() {
        let graph = Explicit::<u32, char>::new(Transitions::NonDeterministic)
            .state(0, Player::P1)
            .choice(0, 'a', []);
        assert!(Game::build(&graph).is_err());
    }

    #[test]
    fn invalid_init_fails() {
        let graph = line().init(9);
        assert!(Game::build(&graph).is_err());
    }

    #[test]
    fn mask_rejects_unknown_states() {
        let game = Game::build(&line()).unwrap();
        assert!(game.mask(&[0, 2]).unwrap().count_ones(..) == 2);
        assert!(game.mask(&[5]).is_err());
    }

    #[test]
    fn summary() {
        let game = Game::build(&line()).unwrap();
        assert!(game.to_string() == "|V|=3 |E|=4 |A|=4 |AP|=1");
    }
}

use crate::*;
use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Sure-winning reachability in a two-player turn-based game.
///
/// Computes the attractor of the target set for `attacker` by a backward
/// fixpoint over the compiled game. Target states are absorbing: their
/// outgoing edges take no part in the fixpoint.
///
/// # Algorithm
///
/// Rank 0 is the target set. At rank `k`, every predecessor of the states
/// added at rank `k - 1` is examined:
///
/// - attacker states join if *some* edge leads into the winning set
/// - defender states join once *all* their edges lead into it
///
/// Each state joins exactly once and the fixpoint stops at the first empty
/// rank, so at most `|S|` ranks are produced. States never added win for
/// the defender.
///
/// # Winning Edges
///
/// The attacker keeps the edges from each newly added state into the
/// winning set as it stood before that rank. The defender keeps every other
/// non-absorbed edge.
#[derive(Debug, Clone)]
pub struct SureWin<S, A>
where
    S: Ident,
    A: Ident,
{
    game: Arc<Game<S, A>>,
    target: FixedBitSet,
    attacker: Player,
    status: Status,
    ranks: Vec<Rank>,
    levels: Vec<Vec<NodeIndex>>,
    winner: FixedBitSet,
    edges: FixedBitSet,
    absorbed: FixedBitSet,
    diagnostics: Diagnostics,
}

impl<S, A> SureWin<S, A>
where
    S: Ident,
    A: Ident,
{
    /// Fails if the game has nature states, if `attacker` is not P1 or P2,
    /// or if a target state is unknown.
    pub fn new(game: Arc<Game<S, A>>, target: &BTreeSet<S>, attacker: Player) -> anyhow::Result<Self> {
        anyhow::ensure!(
            matches!(attacker, Player::P1 | Player::P2),
            "sure winning needs P1 or P2 as attacker, not {}",
            attacker
        );
        anyhow::ensure!(
            game.played_by(&[Player::P1, Player::P2]),
            "sure winning is defined on two-player games without nature states"
        );
        let target = game.mask(target)?;
        let n = game.n();
        let m = game.m();
        Ok(Self {
            game,
            target,
            attacker,
            status: Status::Unsolved,
            ranks: vec![Rank::Never; n],
            levels: Vec::new(),
            winner: FixedBitSet::with_capacity(n),
            edges: FixedBitSet::with_capacity(m),
            absorbed: FixedBitSet::with_capacity(m),
            diagnostics: Diagnostics::default(),
        })
    }

    pub fn attacker(&self) -> Player {
        self.attacker
    }
    pub fn defender(&self) -> Player {
        self.attacker.opponent().unwrap_or(Player::Nature)
    }
    pub fn shared(&self) -> Arc<Game<S, A>> {
        self.game.clone()
    }

    /// Rank of a state. Unknown states never join.
    pub fn rank(&self, state: &S) -> Rank {
        self.game
            .node(state)
            .map(|n| self.ranks[n.index()])
            .unwrap_or(Rank::Never)
    }
    pub fn rank_of(&self, n: NodeIndex) -> Rank {
        self.ranks[n.index()]
    }
    pub fn ranks(&self) -> BTreeMap<S, Rank> {
        self.game
            .nodes()
            .map(|n| (self.game.state(n).clone(), self.ranks[n.index()]))
            .collect()
    }
    /// States added at each rank, rank 0 first.
    pub fn levels(&self) -> Vec<BTreeSet<S>> {
        self.levels
            .iter()
            .map(|level| level.iter().map(|n| self.game.state(*n).clone()).collect())
            .collect()
    }
    /// Node mask of the winning region of `player`.
    pub fn region(&self, player: Player) -> FixedBitSet {
        match player {
            p if p == self.attacker => self.winner.clone(),
            p if p == self.defender() => match self.status {
                Status::Unsolved => FixedBitSet::with_capacity(self.game.n()),
                Status::Solved => {
                    let mut mask = FixedBitSet::with_capacity(self.game.n());
                    mask.insert_range(..);
                    mask.difference_with(&self.winner);
                    mask
                }
            },
            _ => FixedBitSet::with_capacity(self.game.n()),
        }
    }
    pub fn wins(&self, player: Player, state: &S) -> bool {
        self.game
            .node(state)
            .map(|n| self.region(player).contains(n.index()))
            .unwrap_or(false)
    }
}

impl<S, A> Reachability for SureWin<S, A>
where
    S: Ident,
    A: Ident,
{
    type S = S;
    type A = A;
    const COMPONENT: &'static str = "surewin";

    fn game(&self) -> &Game<S, A> {
        &self.game
    }
    fn status(&self) -> Status {
        self.status
    }
    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
    fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }
    fn target(&self) -> BTreeSet<S> {
        self.game.unmask(&self.target)
    }
    fn winning(&self, player: Player) -> BTreeSet<S> {
        self.game.unmask(&self.region(player))
    }
    fn winning_edges(&self, player: Player) -> BTreeSet<Transition<S, A>> {
        match player {
            p if p == self.attacker => self.game.unmask_edges(&self.edges),
            p if p == self.defender() && self.status == Status::Solved => {
                let mut mask = FixedBitSet::with_capacity(self.game.m());
                mask.insert_range(..);
                mask.difference_with(&self.absorbed);
                mask.difference_with(&self.edges);
                self.game.unmask_edges(&mask)
            }
            _ => BTreeSet::new(),
        }
    }

    fn compute(&mut self) {
        let game = self.game.clone();
        let n = game.n();
        self.ranks = vec![Rank::Never; n];
        self.levels = Vec::new();
        self.winner = FixedBitSet::with_capacity(n);
        self.edges = FixedBitSet::with_capacity(game.m());
        self.absorbed = FixedBitSet::with_capacity(game.m());

        if self.target.count_ones(..) == 0 {
            self.diagnostics.emit(
                Self::COMPONENT,
                Event::EmptyFinal,
                format!("every state is winning for {}", self.defender()),
            );
            self.status = Status::Solved;
            return;
        }

        let mut view = View::new(&game);
        for f in self.target.ones().map(NodeIndex::new) {
            view.hide_outgoing(f);
        }
        self.absorbed.insert_range(..);
        self.absorbed.difference_with(&view.edges());

        let mut pending = game
            .nodes()
            .map(|u| view.out_degree(u))
            .collect::<Vec<usize>>();
        let mut frontier = self.target.ones().map(NodeIndex::new).collect::<Vec<_>>();
        for f in frontier.iter() {
            self.ranks[f.index()] = Rank::Level(0);
        }
        self.winner.union_with(&self.target);
        self.levels.push(frontier.clone());

        for k in 1..=n {
            let mut added = FixedBitSet::with_capacity(n);
            for v in frontier.iter() {
                for e in view.incoming(*v) {
                    let u = game.source(e);
                    if self.winner.contains(u.index()) || added.contains(u.index()) {
                        continue;
                    }
                    if game.turn(u) == self.attacker {
                        added.insert(u.index());
                    } else {
                        pending[u.index()] -= 1;
                        if pending[u.index()] == 0 {
                            added.insert(u.index());
                        }
                    }
                }
            }
            if added.count_ones(..) == 0 {
                break;
            }
            frontier = added.ones().map(NodeIndex::new).collect();
            for u in frontier.iter() {
                for e in view.outgoing(*u) {
                    if self.winner.contains(game.target(e).index()) {
                        self.edges.insert(e.index());
                    }
                }
                self.ranks[u.index()] = Rank::Level(k);
            }
            self.winner.union_with(&added);
            self.levels.push(frontier.clone());
        }

        log::debug!(
            "{:<32}{:<32}",
            format!("solved      sure win {}", self.attacker),
            format!("{} of {} states in {} ranks", self.winner.count_ones(..), n, self.levels.len())
        );
        self.status = Status::Solved;
    }
}

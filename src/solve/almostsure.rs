use crate::*;
use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Almost-sure-winning reachability in a qualitative MDP.
///
/// One controlled player (P1) picks actions; successors of an action are
/// resolved by nature, either through nondeterministic branching or through
/// explicit [`Player::Nature`] states. A state is almost-sure winning when P1
/// can reach the target with probability one whatever nature's resolution.
///
/// # Algorithm
///
/// Action pruning on a [`View`] of the game, a greatest fixpoint:
///
/// 1. Target states become absorbing.
/// 2. `U` is the set of states with no path into the target.
/// 3. For every `u` in `U` and every visible edge `t --a--> u` with `t`
///    outside `U`, P1 states lose action `a` and nature states are removed
///    outright, since nature may always pick `u`. A predecessor left with no
///    visible edge joins `U`. Then `u` is hidden.
/// 4. `U` is recomputed on what remains; stop when it is empty.
///
/// Surviving states are the almost-sure-winning region and surviving edges
/// are P1's winning edges.
#[derive(Debug, Clone)]
pub struct AlmostSureWin<S, A>
where
    S: Ident,
    A: Ident,
{
    game: Arc<Game<S, A>>,
    target: FixedBitSet,
    status: Status,
    winner: FixedBitSet,
    edges: FixedBitSet,
    diagnostics: Diagnostics,
}

impl<S, A> AlmostSureWin<S, A>
where
    S: Ident,
    A: Ident,
{
    /// Fails if a state is controlled by P2 or a target state is unknown.
    pub fn new(game: Arc<Game<S, A>>, target: &BTreeSet<S>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            game.played_by(&[Player::P1, Player::Nature]),
            "almost-sure winning is defined on games between P1 and nature"
        );
        let target = game.mask(target)?;
        let n = game.n();
        let m = game.m();
        Ok(Self {
            game,
            target,
            status: Status::Unsolved,
            winner: FixedBitSet::with_capacity(n),
            edges: FixedBitSet::with_capacity(m),
            diagnostics: Diagnostics::default(),
        })
    }

    /// Node mask of P1's almost-sure-winning region.
    pub fn region(&self) -> &FixedBitSet {
        &self.winner
    }
    pub fn wins(&self, state: &S) -> bool {
        self.game
            .node(state)
            .map(|n| self.winner.contains(n.index()))
            .unwrap_or(false)
    }

    fn complement(&self, mask: &FixedBitSet, size: usize) -> FixedBitSet {
        let mut rest = FixedBitSet::with_capacity(size);
        if self.status == Status::Solved {
            rest.insert_range(..);
            rest.difference_with(mask);
        }
        rest
    }
}

impl<S, A> Reachability for AlmostSureWin<S, A>
where
    S: Ident,
    A: Ident,
{
    type S = S;
    type A = A;
    const COMPONENT: &'static str = "almostsure";

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
    /// P1 gets the almost-sure region; any other player gets the rest.
    fn winning(&self, player: Player) -> BTreeSet<S> {
        match player {
            Player::P1 => self.game.unmask(&self.winner),
            _ => self
                .game
                .unmask(&self.complement(&self.winner, self.game.n())),
        }
    }
    fn winning_edges(&self, player: Player) -> BTreeSet<Transition<S, A>> {
        match player {
            Player::P1 => self.game.unmask_edges(&self.edges),
            _ => self
                .game
                .unmask_edges(&self.complement(&self.edges, self.game.m())),
        }
    }

    fn compute(&mut self) {
        let game = self.game.clone();
        self.winner = FixedBitSet::with_capacity(game.n());
        self.edges = FixedBitSet::with_capacity(game.m());

        if self.target.count_ones(..) == 0 {
            self.diagnostics.emit(
                Self::COMPONENT,
                Event::EmptyFinal,
                "every state is losing for P1",
            );
            self.status = Status::Solved;
            return;
        }

        let mut view = View::new(&game);
        for b in self.target.ones().map(NodeIndex::new) {
            view.hide_outgoing(b);
        }
        let mut doomed = view.disconnected(&self.target);
        let mut passes = 0;
        while doomed.count_ones(..) > 0 {
            passes += 1;
            let mut stack = doomed.ones().map(NodeIndex::new).collect::<Vec<_>>();
            while let Some(u) = stack.pop() {
                for e in view.incoming(u) {
                    let t = game.source(e);
                    if doomed.contains(t.index()) || !view.has_edge(e) {
                        continue;
                    }
                    match game.turn(t) {
                        Player::Nature => view.hide_outgoing(t),
                        _ => view.hide_action(t, game.action(e)),
                    }
                    if view.out_degree(t) == 0 {
                        doomed.insert(t.index());
                        stack.push(t);
                    }
                }
                view.hide_node(u);
            }
            doomed = view.disconnected(&self.target);
        }

        self.winner = view.nodes();
        self.edges = view.edges();
        log::debug!(
            "{:<32}{:<32}",
            "solved      almost-sure win",
            format!(
                "{} of {} states in {} passes",
                self.winner.count_ones(..),
                game.n(),
                passes
            )
        );
        self.status = Status::Solved;
    }
}

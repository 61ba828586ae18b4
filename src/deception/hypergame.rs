use crate::*;
use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use std::collections::BTreeSet;

/// Builds the hypergame: the true game as the deceived attacker plays it.
///
/// Both variants start from P2's sure-winning region in the true game and
/// keep only what P2's rationalizable actions allow.
///
/// - [`sure`](Self::sure) keeps the turn structure and yields a subgame of
///   the base game in which decoys and true finals are sinks.
/// - [`almost_sure`](Self::almost_sure) folds each defender move and the
///   attacker's rationalizable replies into one nondeterministic step of a
///   single-player MDP over defender states, plus the synthetic states of
///   [`Proxy`].
///
/// Inconsistencies in the attacker's model are recorded as diagnostics and
/// skipped; they never abort the build.
pub struct HypergameBuilder<'a, S, A>
where
    S: Ident,
    A: Ident,
{
    setup: &'a Setup<S, A>,
    region: FixedBitSet,
    rational: &'a RationalActions<S, A>,
}

impl<'a, S, A> HypergameBuilder<'a, S, A>
where
    S: Ident,
    A: Ident,
{
    const COMPONENT: &'static str = "hypergame";

    /// `base` is P2's solution of the true game.
    pub fn new(setup: &'a Setup<S, A>, base: &SureWin<S, A>, rational: &'a RationalActions<S, A>) -> Self {
        Self {
            setup,
            region: base.region(Player::P2),
            rational,
        }
    }

    fn game(&self) -> &'a Game<S, A> {
        self.setup.game()
    }
    fn targets(&self, u: NodeIndex, action: &A) -> Vec<NodeIndex> {
        let game = self.game();
        game.outgoing(u)
            .filter(|e| game.action(*e) == action)
            .map(|e| game.target(e))
            .collect()
    }

    /// Sure-winning hypergame over P2's base winning region.
    ///
    /// Decoys and true finals get one self-loop per enabled action. Any
    /// other state keeps only its rationalizable edges, and only those that
    /// stay in the region; a rationalizable edge that escapes the region is
    /// reported as [`Event::EscapingAction`].
    pub fn sure(&self, diagnostics: &mut Diagnostics) -> Game<S, A> {
        let game = self.game();
        let mut hypergame = Game::new(game.kind());
        for u in self.region.ones().map(NodeIndex::new) {
            hypergame.add_state(game.state(u).clone(), game.turn(u), game.labels(u).clone());
        }
        for u in self.region.ones().map(NodeIndex::new) {
            let state = game.state(u);
            let hu = hypergame.add_state(state.clone(), game.turn(u), BTreeSet::new());
            let sink = self.setup.finals().contains(state) || self.setup.is_decoy(state);
            for e in game.outgoing(u) {
                let action = game.action(e);
                if sink {
                    hypergame.add_edge(hu, hu, action.clone(), None);
                    continue;
                }
                let v = game.target(e);
                let rational = self.rational.allows(state, action);
                match (rational, self.region.contains(v.index())) {
                    (false, _) => continue,
                    (true, false) => diagnostics.emit(
                        Self::COMPONENT,
                        Event::EscapingAction,
                        format!(
                            "{:?} --{:?}--> {:?} leaves the hypergame",
                            state,
                            action,
                            game.state(v)
                        ),
                    ),
                    (true, true) => {
                        let hv = hypergame.add_state(game.state(v).clone(), game.turn(v), BTreeSet::new());
                        hypergame.add_edge(hu, hv, action.clone(), None);
                    }
                }
            }
        }
        log::debug!("{:<32}{:<32}", "built       sure hypergame", hypergame);
        hypergame
    }

    /// Almost-sure hypergame: a single-player qualitative MDP.
    ///
    /// States are the defender states of P2's base region that are neither
    /// final nor decoys, plus [`Proxy::Lured`], [`Proxy::Lost`] and
    /// [`Proxy::Secured`]. A step `u --a--> v --b--> w` with `a` and `b`
    /// rationalizable becomes `u --a--> w`, where a decoy `v` or `w` becomes
    /// `Lured`, a true final becomes `Lost`, and a `w` in the defender's
    /// sure-winning region becomes `Secured`. Every P1 state outside P2's
    /// region lies in the defender's region, so no other successor exists.
    /// Steps that break turn alternation are skipped with
    /// [`Event::TurnAlternation`].
    pub fn almost_sure(&self, diagnostics: &mut Diagnostics) -> Game<Proxy<S>, Move<A>> {
        let game = self.game();
        let mut hypergame = Game::new(Transitions::NonDeterministic);
        let retained = self
            .region
            .ones()
            .map(NodeIndex::new)
            .filter(|u| game.turn(*u) == Player::P1)
            .filter(|u| !self.setup.finals().contains(game.state(*u)))
            .filter(|u| !self.setup.is_decoy(game.state(*u)))
            .collect::<Vec<_>>();
        for u in retained.iter() {
            hypergame.add_state(Proxy::State(game.state(*u).clone()), Player::P1, game.labels(*u).clone());
        }
        let lured = hypergame.add_state(Proxy::Lured, Player::P1, BTreeSet::new());
        let lost = hypergame.add_state(Proxy::Lost, Player::P1, BTreeSet::new());
        let secured = hypergame.add_state(Proxy::Secured, Player::P1, BTreeSet::new());

        for u in retained.iter().copied() {
            let state = game.state(u);
            let hu = hypergame.add_state(Proxy::State(state.clone()), Player::P1, BTreeSet::new());
            for a in self.rational.actions(state) {
                let step = Move::Act(a.clone());
                for v in self.targets(u, a) {
                    let middle = game.state(v);
                    if self.setup.is_decoy(middle) {
                        hypergame.add_edge(hu, lured, step.clone(), None);
                        continue;
                    }
                    if self.setup.finals().contains(middle) {
                        hypergame.add_edge(hu, lost, step.clone(), None);
                        continue;
                    }
                    if game.turn(v) != Player::P2 {
                        diagnostics.emit(
                            Self::COMPONENT,
                            Event::TurnAlternation,
                            format!("{:?} --{:?}--> {:?} lands on a {} state", state, a, middle, game.turn(v)),
                        );
                        continue;
                    }
                    for b in self.rational.actions(middle) {
                        for w in self.targets(v, b) {
                            let next = game.state(w);
                            if self.setup.is_decoy(next) {
                                hypergame.add_edge(hu, lured, step.clone(), None);
                            } else if self.setup.finals().contains(next) {
                                hypergame.add_edge(hu, lost, step.clone(), None);
                            } else if game.turn(w) != Player::P1 {
                                diagnostics.emit(
                                    Self::COMPONENT,
                                    Event::TurnAlternation,
                                    format!("{:?} --{:?}--> {:?} lands on a {} state", middle, b, next, game.turn(w)),
                                );
                            } else if let Some(hw) = hypergame.node(&Proxy::State(next.clone())) {
                                hypergame.add_edge(hu, hw, step.clone(), None);
                            } else {
                                diagnostics.emit(
                                    Self::COMPONENT,
                                    Event::DefenderRegion,
                                    format!("{:?} --{:?}--> {:?} enters the defender's region", middle, b, next),
                                );
                                hypergame.add_edge(hu, secured, step.clone(), None);
                            }
                        }
                    }
                }
            }
        }
        for sink in [lured, lost, secured] {
            hypergame.add_edge(sink, sink, Move::Stay, None);
        }
        log::debug!("{:<32}{:<32}", "built       almost-sure hypergame", hypergame);
        hypergame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Turn-alternating corridor. P1 states are even, P2 states odd.
    ///
    /// ```text
    /// 0 -a-> 1 -x-> 2 -b-> 3 -y-> 4 (final)
    ///        1 -z-> 6 (decoy) -d-> 7 -w-> 6
    /// 2 -c-> 5 -v-> 4
    /// ```
    fn corridor() -> Arc<Game<u32, char>> {
        let graph = Explicit::new(Transitions::Deterministic)
            .state(0, Player::P1)
            .state(1, Player::P2)
            .state(2, Player::P1)
            .state(3, Player::P2)
            .state(4, Player::P1)
            .state(5, Player::P2)
            .state(6, Player::P1)
            .state(7, Player::P2)
            .edge(0, 'a', 1)
            .edge(1, 'x', 2)
            .edge(1, 'z', 6)
            .edge(2, 'b', 3)
            .edge(2, 'c', 5)
            .edge(3, 'y', 4)
            .edge(5, 'v', 4)
            .edge(4, 'g', 4)
            .edge(6, 'd', 7)
            .edge(7, 'w', 6);
        Arc::new(Game::build(&graph).unwrap())
    }

    fn setup(fakes: &[u32], traps: &[u32]) -> Setup<u32, char> {
        Setup::new(
            corridor(),
            BTreeSet::from([4]),
            fakes.iter().copied().collect(),
            traps.iter().copied().collect(),
        )
        .unwrap()
    }

    #[test]
    fn decoys_are_sinks_in_sure_hypergame() {
        let setup = setup(&[], &[2]);
        let base = setup.solve_base().unwrap();
        let perceived = setup.solve_perceived().unwrap();
        let rational = RationalActions::sure(&perceived);
        let mut diagnostics = Diagnostics::default();
        let hypergame = HypergameBuilder::new(&setup, &base, &rational).sure(&mut diagnostics);
        assert!(hypergame.n() == base.winning(Player::P2).len());
        for decoy in setup.decoys() {
            let n = hypergame.index(&decoy).unwrap();
            assert!(hypergame.outgoing(n).all(|e| hypergame.target(e) == n));
        }
        assert!(hypergame.successors(&0) == BTreeSet::from([1]));
    }

    #[test]
    fn almost_sure_hypergame_composes_moves() {
        let setup = setup(&[], &[]);
        let base = setup.solve_base().unwrap();
        let perceived = setup.solve_perceived().unwrap();
        let region = perceived.region(Player::P2);
        let rational = RationalActions::almost_sure(setup.game(), &region, setup.finals());
        let mut diagnostics = Diagnostics::default();
        let hypergame = HypergameBuilder::new(&setup, &base, &rational).almost_sure(&mut diagnostics);
        assert!(hypergame.successors(&Proxy::State(0)) == BTreeSet::from([Proxy::State(2)]));
        assert!(hypergame.successors(&Proxy::State(2)) == BTreeSet::from([Proxy::Lost]));
        for sink in [Proxy::Lured, Proxy::Lost, Proxy::Secured] {
            assert!(hypergame.successors(&sink) == BTreeSet::from([sink.clone()]));
        }
        assert!(!hypergame.contains(&Proxy::State(4)));
    }

    #[test]
    fn fake_redirects_to_lured() {
        let setup = setup(&[6], &[]);
        let base = setup.solve_base().unwrap();
        let perceived = setup.solve_perceived().unwrap();
        let region = perceived.region(Player::P2);
        let rational = RationalActions::almost_sure(setup.game(), &region, setup.finals());
        let mut diagnostics = Diagnostics::default();
        let hypergame = HypergameBuilder::new(&setup, &base, &rational).almost_sure(&mut diagnostics);
        let successors = hypergame.successors(&Proxy::State(0));
        assert!(successors.contains(&Proxy::Lured));
        assert!(successors.contains(&Proxy::State(2)));
    }

    #[test]
    fn sure_escape_is_reported_and_dropped() {
        let setup = setup(&[6], &[]);
        let base = setup.solve_base().unwrap();
        let perceived = setup.solve_perceived().unwrap();
        let rational = RationalActions::sure(&perceived);
        assert!(rational.allows(&1, &'z'));
        let mut diagnostics = Diagnostics::default();
        let hypergame = HypergameBuilder::new(&setup, &base, &rational).sure(&mut diagnostics);
        assert!(diagnostics.count(Event::EscapingAction) == 1);
        assert!(hypergame.successors(&1).is_empty());
        assert!(!hypergame.contains(&6));
        let evaluation = Concept::Sure.evaluate(setup).unwrap();
        assert!(evaluation.diagnostics.contains(Event::EscapingAction));
        assert!(evaluation.diagnostics.contains(Event::MissingDecoy));
        assert!(evaluation.vod == 0.);
    }

    /// Defender move that hands the turn back to P2.
    ///
    /// ```text
    /// 0 -a-> 1 -b-> 2 -d-> 4 (final)
    ///        1 -c-> 3 (trap) -e-> 1
    /// ```
    #[test]
    fn broken_alternation_is_skipped() {
        let graph = Explicit::new(Transitions::Deterministic)
            .state(0, Player::P1)
            .state(1, Player::P2)
            .state(2, Player::P2)
            .state(3, Player::P1)
            .state(4, Player::P1)
            .edge(0, 'a', 1)
            .edge(1, 'b', 2)
            .edge(1, 'c', 3)
            .edge(2, 'd', 4)
            .edge(3, 'e', 1)
            .edge(4, 'g', 4);
        let game = Arc::new(Game::build(&graph).unwrap());
        let setup = Setup::new(game, BTreeSet::from([4]), BTreeSet::new(), BTreeSet::from([3])).unwrap();
        let base = setup.solve_base().unwrap();
        let perceived = setup.solve_perceived().unwrap();
        let region = perceived.region(Player::P2);
        let rational = RationalActions::almost_sure(setup.game(), &region, setup.finals());
        let mut diagnostics = Diagnostics::default();
        let hypergame = HypergameBuilder::new(&setup, &base, &rational).almost_sure(&mut diagnostics);
        assert!(diagnostics.count(Event::TurnAlternation) == 1);
        assert!(hypergame.successors(&Proxy::State(0)) == BTreeSet::from([Proxy::Lured]));
        assert!(!hypergame.contains(&Proxy::State(2)));
        let evaluation = Concept::AlmostSure.evaluate(setup).unwrap();
        assert!(evaluation.diagnostics.contains(Event::TurnAlternation));
        assert!(evaluation.winning == BTreeSet::from([0, 3]));
        assert!((evaluation.vod - 0.5).abs() < 1e-9);
    }

    /// The corridor with a detour `1 -q-> 8 -e-> 7` that only the fake at 6
    /// makes look winning.
    #[test]
    fn defender_region_routes_to_secured() {
        let graph = Explicit::new(Transitions::Deterministic)
            .state(0, Player::P1)
            .state(1, Player::P2)
            .state(2, Player::P1)
            .state(3, Player::P2)
            .state(4, Player::P1)
            .state(5, Player::P2)
            .state(6, Player::P1)
            .state(7, Player::P2)
            .state(8, Player::P1)
            .edge(0, 'a', 1)
            .edge(1, 'x', 2)
            .edge(1, 'z', 6)
            .edge(1, 'q', 8)
            .edge(2, 'b', 3)
            .edge(2, 'c', 5)
            .edge(3, 'y', 4)
            .edge(5, 'v', 4)
            .edge(4, 'g', 4)
            .edge(6, 'd', 7)
            .edge(7, 'w', 6)
            .edge(8, 'e', 7);
        let game = Arc::new(Game::build(&graph).unwrap());
        let setup = Setup::new(game, BTreeSet::from([4]), BTreeSet::from([6]), BTreeSet::new()).unwrap();
        let base = setup.solve_base().unwrap();
        let perceived = setup.solve_perceived().unwrap();
        assert!(!base.wins(Player::P2, &8));
        assert!(perceived.wins(Player::P2, &8));
        let region = perceived.region(Player::P2);
        let rational = RationalActions::almost_sure(setup.game(), &region, setup.finals());
        let mut diagnostics = Diagnostics::default();
        let hypergame = HypergameBuilder::new(&setup, &base, &rational).almost_sure(&mut diagnostics);
        assert!(diagnostics.count(Event::DefenderRegion) == 1);
        assert!(!hypergame.contains(&Proxy::State(8)));
        assert!(
            hypergame.successors(&Proxy::State(0))
                == BTreeSet::from([Proxy::State(2), Proxy::Lured, Proxy::Secured])
        );
        assert!(hypergame.successors(&Proxy::Secured) == BTreeSet::from([Proxy::Secured]));
        let evaluation = Concept::AlmostSure.evaluate(setup).unwrap();
        assert!(evaluation.diagnostics.contains(Event::DefenderRegion));
        assert!((0. ..=1.).contains(&evaluation.vod));
    }
}

use crate::*;
use petgraph::graph::NodeIndex;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Deceptive almost-sure winning (DASWinReach).
///
/// P2's rationalizable replies are treated as nature: P2 is assumed to pick
/// any of them. The hypergame is the single-player MDP built by
/// [`HypergameBuilder::almost_sure`], solved with [`AlmostSureWin`] for
/// [`Proxy::Lured`].
///
/// # Inversion
///
/// The MDP region is mapped back onto base states as
///
/// - its base states, without the synthetic ones
/// - plus the decoys inside P2's base region
/// - plus every P2 state of P2's perceived region whose rationalizable
///   successors all lie in the two sets above
///
/// and clipped to P2's base region minus the true finals, which is also the
/// denominator of the value of deception.
#[derive(Debug, Clone)]
pub struct AlmostSureDeception<S, A>
where
    S: Ident,
    A: Ident,
{
    setup: Setup<S, A>,
    status: Status,
    rational: RationalActions<S, A>,
    solution: Option<AlmostSureWin<Proxy<S>, Move<A>>>,
    winning: BTreeSet<S>,
    vod: Vod,
    diagnostics: Diagnostics,
}

impl<S, A> AlmostSureDeception<S, A>
where
    S: Ident,
    A: Ident,
{
    pub fn new(setup: Setup<S, A>) -> Self {
        Self {
            setup,
            status: Status::Unsolved,
            rational: RationalActions::default(),
            solution: None,
            winning: BTreeSet::new(),
            vod: 0.,
            diagnostics: Diagnostics::default(),
        }
    }
    pub fn rational(&self) -> &RationalActions<S, A> {
        &self.rational
    }
    /// The solved hypergame MDP, after a run.
    pub fn hypergame(&self) -> Option<&AlmostSureWin<Proxy<S>, Move<A>>> {
        self.solution.as_ref()
    }

    fn invert(
        &self,
        won: BTreeSet<Proxy<S>>,
        base: &SureWin<S, A>,
        perceived: &SureWin<S, A>,
    ) -> BTreeSet<S> {
        let game = self.setup.game();
        let mut mapped = won
            .into_iter()
            .filter_map(Proxy::into_state)
            .collect::<BTreeSet<S>>();
        mapped.extend(
            self.setup
                .decoys()
                .into_iter()
                .filter(|s| base.wins(Player::P2, s)),
        );
        let attacked = perceived
            .region(Player::P2)
            .ones()
            .map(NodeIndex::new)
            .filter(|u| game.turn(*u) == Player::P2)
            .filter(|u| !self.setup.finals().contains(game.state(*u)))
            .filter(|u| {
                let state = game.state(*u);
                game.outgoing(*u)
                    .filter(|e| self.rational.allows(state, game.action(*e)))
                    .all(|e| mapped.contains(game.state(game.target(e))))
            })
            .map(|u| game.state(u).clone())
            .collect::<Vec<_>>();
        mapped.extend(attacked);
        mapped
            .into_iter()
            .filter(|s| base.wins(Player::P2, s))
            .filter(|s| !self.setup.finals().contains(s))
            .collect()
    }
}

impl<S, A> Deception for AlmostSureDeception<S, A>
where
    S: Ident,
    A: Ident,
{
    type S = S;
    type A = A;
    const COMPONENT: &'static str = "daswin";

    fn setup(&self) -> &Setup<S, A> {
        &self.setup
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
    fn vod(&self) -> Vod {
        self.vod
    }
    fn winning(&self) -> &BTreeSet<S> {
        &self.winning
    }

    fn compute(&mut self) -> anyhow::Result<()> {
        self.status = Status::Unsolved;
        let base = self.setup.solve_base()?;
        let perceived = self.setup.solve_perceived()?;
        self.diagnostics.absorb(perceived.diagnostics());
        self.rational = RationalActions::almost_sure(
            self.setup.game(),
            &perceived.region(Player::P2),
            self.setup.finals(),
        );

        let missing = self
            .setup
            .decoys()
            .into_iter()
            .filter(|s| !base.wins(Player::P2, s))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            self.diagnostics.emit(
                Self::COMPONENT,
                Event::MissingDecoy,
                format!("{:?} are outside P2's region and no longer targets", missing),
            );
        }

        let hypergame = HypergameBuilder::new(&self.setup, &base, &self.rational).almost_sure(&mut self.diagnostics);
        let mut solution = AlmostSureWin::new(Arc::new(hypergame), &BTreeSet::from([Proxy::Lured]))?;
        solution.solve(false);

        let contested = base
            .winning(Player::P2)
            .difference(self.setup.finals())
            .count();
        self.winning = self.invert(solution.winning(Player::P1), &base, &perceived);
        self.vod = ratio(self.winning.len(), contested);
        self.solution = Some(solution);
        self.status = Status::Solved;
        log::debug!("{:<32}{:<32}", "value of    almost-sure deception", self.vod);
        Ok(())
    }
}

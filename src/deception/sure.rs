use crate::*;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Deceptive sure winning (DSWinReach).
///
/// The hypergame keeps the base turn structure, so it is solved with
/// [`SureWin`] for P1 with the decoys present in it as targets. The value of
/// deception is P1's hypergame region over the hypergame minus the true
/// final states.
#[derive(Debug, Clone)]
pub struct SureDeception<S, A>
where
    S: Ident,
    A: Ident,
{
    setup: Setup<S, A>,
    status: Status,
    rational: RationalActions<S, A>,
    solution: Option<SureWin<S, A>>,
    winning: BTreeSet<S>,
    vod: Vod,
    diagnostics: Diagnostics,
}

impl<S, A> SureDeception<S, A>
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
    /// The solved hypergame, after a run.
    pub fn hypergame(&self) -> Option<&SureWin<S, A>> {
        self.solution.as_ref()
    }
}

impl<S, A> Deception for SureDeception<S, A>
where
    S: Ident,
    A: Ident,
{
    type S = S;
    type A = A;
    const COMPONENT: &'static str = "dswin";

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
        self.rational = RationalActions::sure(&perceived);

        let hypergame = HypergameBuilder::new(&self.setup, &base, &self.rational).sure(&mut self.diagnostics);
        let decoys = self.setup.decoys();
        let missing = decoys
            .iter()
            .filter(|s| !hypergame.contains(s))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            self.diagnostics.emit(
                Self::COMPONENT,
                Event::MissingDecoy,
                format!("{:?} are outside the hypergame and no longer targets", missing),
            );
        }
        let target = decoys
            .iter()
            .filter(|s| hypergame.contains(s))
            .cloned()
            .collect::<BTreeSet<_>>();

        let contested = hypergame.n().saturating_sub(self.setup.finals().len());
        let mut solution = SureWin::new(Arc::new(hypergame), &target, Player::P1)?;
        solution.solve(false);
        self.winning = solution.winning(Player::P1);
        self.vod = ratio(self.winning.len(), contested);
        self.solution = Some(solution);
        self.status = Status::Solved;
        log::debug!("{:<32}{:<32}", "value of    sure deception", self.vod);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved(game: &Arc<Game<String, String>>, fakes: &[String], traps: &[String]) -> SureDeception<String, String> {
        let setup = Setup::new(
            game.clone(),
            game.labelled(GOAL),
            fakes.iter().cloned().collect(),
            traps.iter().cloned().collect(),
        )
        .unwrap();
        let mut solver = SureDeception::new(setup);
        solver.solve(false).unwrap();
        solver
    }

    /// Non-final states of P2's base region.
    fn contested(game: &Arc<Game<String, String>>) -> Vec<String> {
        let finals = game.labelled(GOAL);
        let mut base = SureWin::new(game.clone(), &finals, Player::P2).unwrap();
        base.solve(false);
        base.winning(Player::P2).difference(&finals).cloned().collect()
    }

    #[test]
    fn no_decoys_no_value() {
        let game = Arc::new(RandomGame::new(60, 4, 5, 9).build().unwrap());
        let solver = solved(&game, &[], &[]);
        assert!(solver.vod() == 0.);
        assert!(solver.winning().is_empty());
    }

    #[test]
    fn vod_stays_in_unit_interval() {
        for seed in 0..6 {
            let game = Arc::new(RandomGame::new(60, 4, 5, seed).build().unwrap());
            let pool = contested(&game);
            for decoy in pool.iter().take(4) {
                let fake = solved(&game, &[decoy.clone()], &[]);
                let trap = solved(&game, &[], &[decoy.clone()]);
                assert!((0. ..=1.).contains(&fake.vod()));
                assert!((0. ..=1.).contains(&trap.vod()));
                assert!(trap.winning().contains(decoy));
            }
        }
    }

    #[test]
    fn decoys_only_loop_in_hypergame() {
        let game = Arc::new(RandomGame::new(80, 4, 6, 5).build().unwrap());
        let pool = contested(&game);
        let fakes = pool.iter().take(2).cloned().collect::<Vec<_>>();
        let traps = pool.iter().skip(2).take(2).cloned().collect::<Vec<_>>();
        let solver = solved(&game, &fakes, &traps);
        let hypergame = solver.hypergame().unwrap().game();
        for decoy in fakes.iter().chain(traps.iter()) {
            if let Some(n) = hypergame.node(decoy) {
                assert!(hypergame.outgoing(n).all(|e| hypergame.target(e) == n));
            }
        }
    }

    #[test]
    fn decoy_outside_region_is_reported() {
        let game = Arc::new(RandomGame::new(60, 3, 3, 2).build().unwrap());
        let finals = game.labelled(GOAL);
        let mut base = SureWin::new(game.clone(), &finals, Player::P2).unwrap();
        base.solve(false);
        if let Some(outside) = base.winning(Player::P1).into_iter().next() {
            let solver = solved(&game, &[], &[outside]);
            assert!(solver.diagnostics().contains(Event::MissingDecoy));
            assert!(solver.vod() == 0.);
        }
    }

    #[test]
    fn shared_base_gives_same_value() {
        let game = Arc::new(RandomGame::new(60, 4, 5, 13).build().unwrap());
        let finals = game.labelled(GOAL);
        let traps = contested(&game).into_iter().take(2).collect::<BTreeSet<_>>();
        let fresh = Setup::new(game.clone(), finals.clone(), BTreeSet::new(), traps.clone()).unwrap();
        let base = fresh.solve_base().unwrap();
        let shared = fresh.clone().with_base(base).unwrap();
        let mut a = SureDeception::new(fresh);
        let mut b = SureDeception::new(shared);
        a.solve(false).unwrap();
        b.solve(false).unwrap();
        assert!(a.vod() == b.vod());
        assert!(a.winning() == b.winning());
    }

    #[test]
    fn resolve_is_guarded() {
        let game = Arc::new(RandomGame::new(30, 3, 3, 4).build().unwrap());
        let mut solver = solved(&game, &[], &[]);
        solver.solve(false).unwrap();
        assert!(solver.diagnostics().contains(Event::AlreadySolved));
    }

    /// P1 can always avoid the final, so P2's base region is the final alone.
    ///
    /// ```text
    /// 0 -a-> 1 (trap) -c-> 0
    /// 0 -b-> 2 (final) -e-> 1
    /// ```
    #[test]
    fn region_of_finals_alone_has_no_value() {
        let graph = Explicit::new(Transitions::Deterministic)
            .state(0, Player::P1)
            .state(1, Player::P2)
            .state(2, Player::P1)
            .edge(0, 'a', 1)
            .edge(0, 'b', 2)
            .edge(1, 'c', 0)
            .edge(2, 'e', 1);
        let game = Arc::new(Game::build(&graph).unwrap());
        let setup = Setup::new(game, BTreeSet::from([2]), BTreeSet::new(), BTreeSet::from([1])).unwrap();
        assert!(setup.solve_base().unwrap().winning(Player::P2) == BTreeSet::from([2]));
        let mut solver = SureDeception::new(setup);
        solver.solve(false).unwrap();
        assert!(solver.vod() == 0.);
        assert!(solver.winning().is_empty());
        assert!(solver.diagnostics().contains(Event::MissingDecoy));
    }
}

use crate::*;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Inputs of one deception run: the base game, the true final set, and a
/// decoy placement.
///
/// Construction enforces the caller contract. Every state must belong to
/// the game, fakes and traps must be disjoint, and no decoy may be a true
/// final state. A solved base game may be attached so that repeated runs
/// over one game share it.
#[derive(Debug, Clone)]
pub struct Setup<S, A>
where
    S: Ident,
    A: Ident,
{
    game: Arc<Game<S, A>>,
    finals: BTreeSet<S>,
    fakes: BTreeSet<S>,
    traps: BTreeSet<S>,
    base: Option<Arc<SureWin<S, A>>>,
}

impl<S, A> Setup<S, A>
where
    S: Ident,
    A: Ident,
{
    pub fn new(
        game: Arc<Game<S, A>>,
        finals: BTreeSet<S>,
        fakes: BTreeSet<S>,
        traps: BTreeSet<S>,
    ) -> anyhow::Result<Self> {
        for s in finals.iter().chain(fakes.iter()).chain(traps.iter()) {
            game.index(s)?;
        }
        anyhow::ensure!(
            fakes.is_disjoint(&traps),
            "states {:?} are both fake and trap",
            fakes.intersection(&traps).collect::<Vec<_>>()
        );
        anyhow::ensure!(
            fakes.is_disjoint(&finals) && traps.is_disjoint(&finals),
            "decoys {:?} are true final states",
            finals
                .iter()
                .filter(|s| fakes.contains(s) || traps.contains(s))
                .collect::<Vec<_>>()
        );
        Ok(Self {
            game,
            finals,
            fakes,
            traps,
            base: None,
        })
    }

    /// Attach a solved base game: P2 attacking the same final set on the
    /// same game.
    pub fn with_base(mut self, base: Arc<SureWin<S, A>>) -> anyhow::Result<Self> {
        anyhow::ensure!(base.is_solved(), "base game must be solved before sharing");
        anyhow::ensure!(base.attacker() == Player::P2, "base game must be solved for P2");
        anyhow::ensure!(
            Arc::ptr_eq(&base.shared(), &self.game),
            "base game was solved on a different game"
        );
        anyhow::ensure!(
            base.target() == self.finals,
            "base game was solved for a different final set"
        );
        self.base = Some(base);
        Ok(self)
    }

    pub fn game(&self) -> &Arc<Game<S, A>> {
        &self.game
    }
    pub fn finals(&self) -> &BTreeSet<S> {
        &self.finals
    }
    pub fn fakes(&self) -> &BTreeSet<S> {
        &self.fakes
    }
    pub fn traps(&self) -> &BTreeSet<S> {
        &self.traps
    }
    pub fn decoys(&self) -> BTreeSet<S> {
        self.fakes.union(&self.traps).cloned().collect()
    }
    pub fn is_decoy(&self, state: &S) -> bool {
        self.fakes.contains(state) || self.traps.contains(state)
    }
    pub fn base(&self) -> Option<&Arc<SureWin<S, A>>> {
        self.base.as_ref()
    }

    /// The true game from P2's side: P2 attacks the true final set.
    pub fn solve_base(&self) -> anyhow::Result<Arc<SureWin<S, A>>> {
        match self.base.as_ref() {
            Some(base) => Ok(base.clone()),
            None => {
                let mut base = SureWin::new(self.game.clone(), &self.finals, Player::P2)?;
                base.solve(false);
                log::debug!(
                    "{:<32}{:<32}",
                    "solved      base game",
                    format!("{} P2 states", base.region(Player::P2).count_ones(..))
                );
                Ok(Arc::new(base))
            }
        }
    }

    /// The game P2 believes it plays: fakes look like final states.
    pub fn solve_perceived(&self) -> anyhow::Result<SureWin<S, A>> {
        let target = self.finals.union(&self.fakes).cloned().collect();
        let mut perceived = SureWin::new(self.game.clone(), &target, Player::P2)?;
        perceived.solve(false);
        log::debug!(
            "{:<32}{:<32}",
            "solved      perceived game",
            format!("{} P2 states", perceived.region(Player::P2).count_ones(..))
        );
        Ok(perceived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Arc<Game<String, String>> {
        Arc::new(RandomGame::new(20, 3, 2, 3).build().unwrap())
    }
    fn set(states: &[usize]) -> BTreeSet<String> {
        states.iter().map(|i| RandomGame::name(*i)).collect()
    }

    #[test]
    fn overlapping_decoys_are_rejected() {
        let game = game();
        let finals = game.labelled(GOAL);
        let some = finals.iter().next().cloned().unwrap();
        let other = game.states().find(|s| !finals.contains(*s)).cloned().unwrap();
        let overlap = BTreeSet::from([other.clone()]);
        let final_fake = BTreeSet::from([some]);
        assert!(Setup::new(game.clone(), finals.clone(), overlap.clone(), overlap).is_err());
        assert!(Setup::new(game.clone(), finals.clone(), final_fake, BTreeSet::new()).is_err());
        assert!(Setup::new(game.clone(), finals, BTreeSet::new(), set(&[99])).is_err());
    }

    #[test]
    fn shared_base_must_match() {
        let game = game();
        let finals = game.labelled(GOAL);
        let setup = Setup::new(game.clone(), finals.clone(), BTreeSet::new(), BTreeSet::new()).unwrap();
        let base = setup.solve_base().unwrap();
        assert!(setup.clone().with_base(base.clone()).is_ok());
        let unsolved = Arc::new(SureWin::new(game.clone(), &finals, Player::P2).unwrap());
        assert!(setup.clone().with_base(unsolved).is_err());
        let other = Arc::new(RandomGame::new(20, 3, 2, 3).build().unwrap());
        let mut foreign = SureWin::new(other, &finals, Player::P2).unwrap();
        foreign.solve(false);
        assert!(setup.with_base(Arc::new(foreign)).is_err());
    }

    #[test]
    fn perceived_region_grows_with_fakes() {
        let game = game();
        let finals = game.labelled(GOAL);
        let fakes = game
            .states()
            .filter(|s| !finals.contains(*s))
            .take(3)
            .cloned()
            .collect::<BTreeSet<_>>();
        let setup = Setup::new(game.clone(), finals, fakes, BTreeSet::new()).unwrap();
        let base = setup.solve_base().unwrap().winning(Player::P2);
        let perceived = setup.solve_perceived().unwrap().winning(Player::P2);
        assert!(base.is_subset(&perceived));
    }
}

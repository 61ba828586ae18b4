use crate::*;
use std::collections::BTreeSet;

/// A deception solver: DSWinReach or DASWinReach.
///
/// Given a [`Setup`], a run proceeds in fixed order:
///
/// 1. solve the true game for P2, unless a solution is shared
/// 2. solve the game P2 perceives, with fakes as extra targets
/// 3. derive P2's rationalizable actions
/// 4. build the hypergame
/// 5. solve the hypergame for P1 with the decoys as targets
/// 6. map the hypergame solution back onto base states
/// 7. compute the value of deception
///
/// Hard failures come only from malformed input and propagate as errors.
/// Inconsistencies in P2's model are recorded in [`diagnostics`](Self::diagnostics)
/// and repaired in place.
pub trait Deception {
    type S: Ident;
    type A: Ident;

    const COMPONENT: &'static str;

    fn setup(&self) -> &Setup<Self::S, Self::A>;
    fn status(&self) -> Status;
    fn diagnostics(&self) -> &Diagnostics;
    fn diagnostics_mut(&mut self) -> &mut Diagnostics;
    /// Run every step unconditionally.
    fn compute(&mut self) -> anyhow::Result<()>;
    /// Value of deception in [0, 1]. Zero before solving.
    fn vod(&self) -> Vod;
    /// P1's deceptive winning region, in base-game states.
    fn winning(&self) -> &BTreeSet<Self::S>;

    /// Solve, keeping an earlier solution unless `force` is set.
    fn solve(&mut self, force: bool) -> anyhow::Result<()> {
        match (self.status(), force) {
            (Status::Solved, false) => {
                self.diagnostics_mut().emit(
                    Self::COMPONENT,
                    Event::AlreadySolved,
                    "call solve(force = true) to recompute",
                );
                Ok(())
            }
            _ => self.compute(),
        }
    }
    fn is_solved(&self) -> bool {
        self.status() == Status::Solved
    }
    /// Snapshot of the outputs.
    fn evaluation(&self) -> Evaluation<Self::S> {
        Evaluation {
            vod: self.vod(),
            winning: self.winning().clone(),
            diagnostics: self.diagnostics().clone(),
        }
    }
}

/// `|won| / |contested|`, zero when nothing is contested.
pub fn ratio(won: usize, contested: usize) -> Vod {
    match contested {
        0 => 0.,
        n => won as Vod / n as Vod,
    }
}

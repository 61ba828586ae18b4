use crate::*;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Greedy fake-target and trap allocation.
///
/// Places `fakes` fake targets, then `traps` traps, one per round. A round
/// evaluates every unallocated candidate with a fresh deception run of the
/// chosen [`Concept`] and commits the maximizer. Ties go to the lowest
/// candidate, so a round in which nothing scores above zero still commits
/// the first candidate. A phase ends early when the candidates run out.
///
/// The base game is solved once and shared read-only by every run. With the
/// `parallel` feature a round's runs are spread over the rayon pool; the
/// reduction walks results in candidate order, so the outcome matches a
/// sequential run exactly.
#[derive(Debug)]
pub struct DecoyAllocator<C, S, A>
where
    C: Ident,
    S: Ident,
    A: Ident,
{
    game: Arc<Game<S, A>>,
    finals: BTreeSet<S>,
    candidates: Candidates<C, S>,
    fakes: usize,
    traps: usize,
    seeded: Allocation<C>,
    concept: Concept,
    status: Status,
    allocation: Allocation<C>,
    runs: AtomicUsize,
    diagnostics: Diagnostics,
}

impl<C, S, A> DecoyAllocator<C, S, A>
where
    C: Ident,
    S: Ident,
    A: Ident,
{
    const COMPONENT: &'static str = "allocator";

    pub fn new(
        game: Arc<Game<S, A>>,
        finals: BTreeSet<S>,
        candidates: BTreeMap<C, BTreeSet<S>>,
        fakes: usize,
        traps: usize,
        concept: Concept,
    ) -> anyhow::Result<Self> {
        game.mask(&finals)?;
        let mut diagnostics = Diagnostics::default();
        let candidates = Candidates::new(&game, &finals, candidates, &mut diagnostics)?;
        Ok(Self {
            game,
            finals,
            candidates,
            fakes,
            traps,
            seeded: Allocation::default(),
            concept,
            status: Status::Unsolved,
            allocation: Allocation::default(),
            runs: AtomicUsize::new(0),
            diagnostics,
        })
    }

    /// Start from fakes already in place. They count toward the total.
    pub fn with_fakes(mut self, fakes: impl IntoIterator<Item = C>) -> anyhow::Result<Self> {
        for c in fakes {
            anyhow::ensure!(self.candidates.contains(&c), "initial fake {:?} is not a candidate", c);
            anyhow::ensure!(!self.seeded.traps.contains(&c), "{:?} is already a trap", c);
            self.seeded.fakes.insert(c);
        }
        Ok(self)
    }
    /// Start from traps already in place. They count toward the total.
    pub fn with_traps(mut self, traps: impl IntoIterator<Item = C>) -> anyhow::Result<Self> {
        for c in traps {
            anyhow::ensure!(self.candidates.contains(&c), "initial trap {:?} is not a candidate", c);
            anyhow::ensure!(!self.seeded.fakes.contains(&c), "{:?} is already a fake", c);
            self.seeded.traps.insert(c);
        }
        Ok(self)
    }

    pub fn candidates(&self) -> &Candidates<C, S> {
        &self.candidates
    }
    pub fn concept(&self) -> Concept {
        self.concept
    }
    pub fn allocation(&self) -> &Allocation<C> {
        &self.allocation
    }
    pub fn vod(&self) -> Vod {
        self.allocation.vod()
    }
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
    pub fn is_solved(&self) -> bool {
        self.status == Status::Solved
    }
    /// Deception runs performed by the last solve.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }

    /// Run both greedy phases. Without `force`, a solved allocator keeps
    /// its result.
    pub fn solve(&mut self, force: bool) -> anyhow::Result<()> {
        if self.status == Status::Solved && !force {
            self.diagnostics.emit(
                Self::COMPONENT,
                Event::AlreadySolved,
                "call solve(force = true) to recompute",
            );
            return Ok(());
        }
        self.allocation = self.seeded.clone();
        self.runs.store(0, Ordering::Relaxed);
        if self.fakes == 0 && self.traps == 0 {
            self.diagnostics.emit(
                Self::COMPONENT,
                Event::NoDecoys,
                "zero fakes and zero traps requested",
            );
            self.status = Status::Solved;
            return Ok(());
        }
        log::info!(
            "{:<32}{:<32}",
            format!("allocating  {}", self.concept),
            format!("{} candidates", self.candidates.len())
        );
        let base = Setup::new(self.game.clone(), self.finals.clone(), BTreeSet::new(), BTreeSet::new())?.solve_base()?;
        while self.allocation.fakes.len() < self.fakes {
            if !self.round(Decoy::Fake, &base)? {
                break;
            }
        }
        while self.allocation.traps.len() < self.traps {
            if !self.round(Decoy::Trap, &base)? {
                break;
            }
        }
        log::info!(
            "{:<32}{:<32}",
            "allocated   decoys",
            format!("vod {:.4} after {} runs", self.allocation.vod(), self.runs())
        );
        self.status = Status::Solved;
        Ok(())
    }

    /// One greedy round. `false` when no candidate is left.
    fn round(&mut self, decoy: Decoy, base: &Arc<SureWin<S, A>>) -> anyhow::Result<bool> {
        let index = self.allocation.rounds.len() + 1;
        let pool = self
            .candidates
            .keys()
            .filter(|c| !self.allocation.fakes.contains(*c))
            .filter(|c| !self.allocation.traps.contains(*c))
            .cloned()
            .collect::<Vec<C>>();
        if pool.is_empty() {
            self.diagnostics.emit(
                Self::COMPONENT,
                Event::Exhausted,
                format!("no candidate left for {} in round {}", decoy, index),
            );
            return Ok(false);
        }
        log::debug!("{:<32}{:<32}", format!("exploring   {} {}", decoy, index), pool.len());

        #[cfg(feature = "parallel")]
        let evaluations = {
            use rayon::iter::IntoParallelRefIterator;
            use rayon::iter::ParallelIterator;
            // @parallelizable
            pool.par_iter()
                .map(|c| self.evaluate(decoy, c, base))
                .collect::<anyhow::Result<Vec<_>>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let evaluations = pool
            .iter()
            .map(|c| self.evaluate(decoy, c, base))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut best = 0;
        for (i, evaluation) in evaluations.iter().enumerate() {
            if evaluation.vod > evaluations[best].vod {
                best = i;
            }
        }
        let trace = pool
            .iter()
            .zip(evaluations.iter())
            .map(|(c, e)| Record {
                candidate: c.clone(),
                vod: e.vod,
            })
            .collect::<Vec<_>>();
        let chosen = pool[best].clone();
        let vod = evaluations[best].vod;
        self.diagnostics.absorb(&evaluations[best].diagnostics);
        match decoy {
            Decoy::Fake => self.allocation.fakes.insert(chosen.clone()),
            Decoy::Trap => self.allocation.traps.insert(chosen.clone()),
        };
        log::info!(
            "{:<32}{:<32}",
            format!("selected    {} {}", decoy, index),
            format!("{:?} vod {:.4}", chosen, vod)
        );
        self.allocation.rounds.push(Round {
            index,
            decoy,
            chosen,
            vod,
            trace,
        });
        Ok(true)
    }

    /// Deception run with `candidate` tentatively added as a `decoy`.
    /// Trap states also covered by a fake stay fakes.
    fn evaluate(&self, decoy: Decoy, candidate: &C, base: &Arc<SureWin<S, A>>) -> anyhow::Result<Evaluation<S>> {
        let mut fakes = self.candidates.cover(&self.allocation.fakes);
        let mut traps = self.candidates.cover(&self.allocation.traps);
        match decoy {
            Decoy::Fake => fakes.extend(self.candidates.cover([candidate])),
            Decoy::Trap => traps.extend(self.candidates.cover([candidate])),
        }
        let traps = traps.difference(&fakes).cloned().collect();
        let setup = Setup::new(self.game.clone(), self.finals.clone(), fakes, traps)?.with_base(base.clone())?;
        let evaluation = self.concept.evaluate(setup)?;
        self.runs.fetch_add(1, Ordering::Relaxed);
        log::debug!(
            "{:<32}{:<32}",
            format!("explored    {} {:?}", decoy, candidate),
            format!("vod {:.4}", evaluation.vod)
        );
        Ok(evaluation)
    }
}

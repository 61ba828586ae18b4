use crate::*;
use serde::Serialize;
use std::collections::BTreeSet;

/// Which kind of decoy a round places.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoy {
    Fake,
    Trap,
}

impl std::fmt::Display for Decoy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fake => write!(f, "fake"),
            Self::Trap => write!(f, "trap"),
        }
    }
}

/// Value of deception of one tentative placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<C> {
    pub candidate: C,
    pub vod: Vod,
}

/// One greedy round: the committed candidate and every candidate tried.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round<C> {
    /// 1-based, counted across both phases.
    pub index: usize,
    pub decoy: Decoy,
    pub chosen: C,
    pub vod: Vod,
    pub trace: Vec<Record<C>>,
}

/// Result of a greedy allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation<C>
where
    C: Ident,
{
    pub rounds: Vec<Round<C>>,
    pub fakes: BTreeSet<C>,
    pub traps: BTreeSet<C>,
}

impl<C> Default for Allocation<C>
where
    C: Ident,
{
    fn default() -> Self {
        Self {
            rounds: Vec::new(),
            fakes: BTreeSet::new(),
            traps: BTreeSet::new(),
        }
    }
}

impl<C> Allocation<C>
where
    C: Ident,
{
    /// Value of deception after the last committed round.
    pub fn vod(&self) -> Vod {
        self.rounds.last().map(|r| r.vod).unwrap_or(0.)
    }
    /// `(round, chosen, vod)` in commit order.
    pub fn sequence(&self) -> impl Iterator<Item = (usize, &C, Vod)> + '_ {
        self.rounds.iter().map(|r| (r.index, &r.chosen, r.vod))
    }
    pub fn phase(&self, decoy: Decoy) -> impl Iterator<Item = &Round<C>> + '_ {
        self.rounds.iter().filter(move |r| r.decoy == decoy)
    }
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}

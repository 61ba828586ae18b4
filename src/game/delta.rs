use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Declared shape of a game's transition function.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transitions {
    /// `(state, action) -> state`
    Deterministic,
    /// `(state, action) -> {state}`
    NonDeterministic,
    /// `(state, action) -> {state: probability}`
    Probabilistic,
}

impl std::fmt::Display for Transitions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deterministic => write!(f, "deterministic"),
            Self::NonDeterministic => write!(f, "non-deterministic"),
            Self::Probabilistic => write!(f, "probabilistic"),
        }
    }
}

/// Successors of one `(state, action)` pair.
///
/// The variant must agree with the game's declared [`Transitions`]; a
/// mismatch is rejected when the game is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Delta<S> {
    One(S),
    Many(Vec<S>),
    Lottery(Vec<(S, Probability)>),
}

impl<S> Delta<S> {
    pub fn kind(&self) -> Transitions {
        match self {
            Self::One(_) => Transitions::Deterministic,
            Self::Many(_) => Transitions::NonDeterministic,
            Self::Lottery(_) => Transitions::Probabilistic,
        }
    }
    /// Successor states paired with their probability, when the game has one.
    pub fn outcomes(self) -> Vec<(S, Option<Probability>)> {
        match self {
            Self::One(s) => vec![(s, None)],
            Self::Many(many) => many.into_iter().map(|s| (s, None)).collect(),
            Self::Lottery(lottery) => lottery.into_iter().map(|(s, p)| (s, Some(p))).collect(),
        }
    }
    /// Total mass of a lottery. Always one for the other variants.
    pub fn mass(&self) -> Probability {
        match self {
            Self::Lottery(lottery) => lottery.iter().map(|(_, p)| p).sum(),
            _ => 1.,
        }
    }
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(many) => many.is_empty(),
            Self::Lottery(lottery) => lottery.is_empty(),
        }
    }
}

use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;

/// Solution concept of a deception run.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Concept {
    /// DSWinReach on the sure hypergame.
    #[default]
    Sure,
    /// DASWinReach on the almost-sure hypergame.
    AlmostSure,
}

impl Concept {
    /// Run one deception solver to completion on `setup`.
    pub fn evaluate<S, A>(&self, setup: Setup<S, A>) -> anyhow::Result<Evaluation<S>>
    where
        S: Ident,
        A: Ident,
    {
        match self {
            Self::Sure => {
                let mut solver = SureDeception::new(setup);
                solver.solve(false)?;
                Ok(solver.evaluation())
            }
            Self::AlmostSure => {
                let mut solver = AlmostSureDeception::new(setup);
                solver.solve(false)?;
                Ok(solver.evaluation())
            }
        }
    }
}

impl std::fmt::Display for Concept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sure => write!(f, "sure winning"),
            Self::AlmostSure => write!(f, "almost-sure winning"),
        }
    }
}

/// Outputs of a finished deception run.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation<S>
where
    S: Ident,
{
    pub vod: Vod,
    pub winning: BTreeSet<S>,
    pub diagnostics: Diagnostics,
}

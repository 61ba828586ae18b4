use crate::*;
use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// One `(source, action)` entry of a problem file.
///
/// Deterministic games list exactly one target. Probabilistic games pair
/// every target with a probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub action: String,
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<Probability>>,
}

/// True final states, listed or selected by atomic proposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Finals {
    States(BTreeSet<String>),
    Atom { atom: String },
}

/// A game, its objective, and the decoy inputs, as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub kind: Transitions,
    pub turns: BTreeMap<String, Player>,
    #[serde(default)]
    pub init: Vec<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, BTreeSet<String>>,
    pub transitions: Vec<Edge>,
    pub finals: Finals,
    /// States for `solve`, seed candidates for `allocate`.
    #[serde(default)]
    pub fakes: BTreeSet<String>,
    #[serde(default)]
    pub traps: BTreeSet<String>,
    #[serde(default)]
    pub candidates: BTreeMap<String, BTreeSet<String>>,
}

impl Problem {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parse {}", path.display()))
    }

    /// A random game with its goal states as finals and every other state
    /// as a singleton candidate.
    pub fn random(random: &RandomGame) -> anyhow::Result<Self> {
        let game = random.build()?;
        let mut turns = BTreeMap::new();
        let mut labels = BTreeMap::new();
        for n in game.nodes() {
            turns.insert(game.state(n).clone(), game.turn(n));
            if !game.labels(n).is_empty() {
                labels.insert(game.state(n).clone(), game.labels(n).clone());
            }
        }
        let finals = game.labelled(GOAL);
        let transitions = game
            .transitions()
            .into_iter()
            .map(|t| Edge {
                source: t.source,
                action: t.action,
                targets: vec![t.target],
                probabilities: None,
            })
            .collect();
        let candidates = Candidates::singletons(game.states().filter(|s| !finals.contains(*s)).cloned());
        Ok(Self {
            kind: game.kind(),
            turns,
            init: Vec::new(),
            labels,
            transitions,
            finals: Finals::Atom {
                atom: GOAL.to_string(),
            },
            fakes: BTreeSet::new(),
            traps: BTreeSet::new(),
            candidates,
        })
    }

    /// Compile the game described by the file.
    pub fn game(&self) -> anyhow::Result<Game<String, String>> {
        let mut graph = Explicit::new(self.kind);
        for (state, turn) in self.turns.iter() {
            graph = graph.state(state.clone(), *turn);
        }
        for state in self.init.iter() {
            graph = graph.init(state.clone());
        }
        for (state, atoms) in self.labels.iter() {
            for atom in atoms {
                graph = graph.label(state.clone(), atom.clone());
            }
        }
        for edge in self.transitions.iter() {
            anyhow::ensure!(
                self.turns.contains_key(&edge.source),
                "transition source {} has no turn",
                edge.source
            );
            let delta = match (self.kind, &edge.probabilities) {
                (Transitions::Deterministic, None) => match edge.targets.as_slice() {
                    [target] => Delta::One(target.clone()),
                    targets => anyhow::bail!(
                        "deterministic transition ({}, {}) lists {} targets",
                        edge.source,
                        edge.action,
                        targets.len()
                    ),
                },
                (Transitions::NonDeterministic, None) => Delta::Many(edge.targets.clone()),
                (Transitions::Probabilistic, Some(probabilities)) => {
                    anyhow::ensure!(
                        probabilities.len() == edge.targets.len(),
                        "transition ({}, {}) has {} targets and {} probabilities",
                        edge.source,
                        edge.action,
                        edge.targets.len(),
                        probabilities.len()
                    );
                    Delta::Lottery(edge.targets.iter().cloned().zip(probabilities.iter().copied()).collect())
                }
                (kind, _) => anyhow::bail!(
                    "transition ({}, {}) does not fit a {} game",
                    edge.source,
                    edge.action,
                    kind
                ),
            };
            graph = graph.transition(edge.source.clone(), edge.action.clone(), delta);
        }
        Game::build(&graph)
    }

    pub fn finals(&self, game: &Game<String, String>) -> anyhow::Result<BTreeSet<String>> {
        match &self.finals {
            Finals::Atom { atom } => Ok(game.labelled(atom)),
            Finals::States(states) => {
                game.mask(states)?;
                Ok(states.clone())
            }
        }
    }

    /// Compiled game, final set, and decoy placement.
    pub fn setup(&self) -> anyhow::Result<Setup<String, String>> {
        let game = Arc::new(self.game()?);
        let finals = self.finals(&game)?;
        Setup::new(game, finals, self.fakes.clone(), self.traps.clone())
    }
}

use crate::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::BTreeSet;

/// Seeded generator of turn-alternating random games.
///
/// States are `s0 .. s{nodes-1}`; odd states belong to P1 with actions
/// `a0, a1, ..`, even states to P2 with actions `b0, b1, ..`. Every state
/// enables between one and `outdegree` actions, each leading to a uniformly
/// drawn state of the other player. `finals` distinct states carry the
/// [`GOAL`] label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomGame {
    pub nodes: usize,
    pub outdegree: usize,
    pub finals: usize,
    pub seed: u64,
}

impl Default for RandomGame {
    fn default() -> Self {
        Self {
            nodes: RANDOM_NODES,
            outdegree: RANDOM_OUTDEGREE,
            finals: RANDOM_FINALS,
            seed: 0,
        }
    }
}

impl RandomGame {
    pub fn new(nodes: usize, outdegree: usize, finals: usize, seed: u64) -> Self {
        Self {
            nodes,
            outdegree,
            finals,
            seed,
        }
    }

    pub fn name(i: usize) -> String {
        format!("s{}", i)
    }
    pub fn turn(i: usize) -> Player {
        match i % 2 {
            1 => Player::P1,
            _ => Player::P2,
        }
    }

    /// Draw the game as an explicit table.
    pub fn graph(&self) -> anyhow::Result<Explicit<String, String>> {
        anyhow::ensure!(self.nodes >= 2, "random game needs at least two states");
        anyhow::ensure!(self.outdegree >= 1, "random game needs at least one action per state");
        anyhow::ensure!(
            self.finals <= self.nodes,
            "cannot label {} of {} states as final",
            self.finals,
            self.nodes
        );
        let ref mut rng = SmallRng::seed_from_u64(self.seed);
        let mut finals = BTreeSet::new();
        while finals.len() < self.finals {
            finals.insert(rng.random_range(0..self.nodes));
        }
        let odds = (0..self.nodes).filter(|i| i % 2 == 1).collect::<Vec<_>>();
        let evens = (0..self.nodes).filter(|i| i % 2 == 0).collect::<Vec<_>>();
        let mut graph = Explicit::new(Transitions::Deterministic);
        for i in 0..self.nodes {
            graph = graph.state(Self::name(i), Self::turn(i));
        }
        for i in finals {
            graph = graph.label(Self::name(i), GOAL);
        }
        for i in 0..self.nodes {
            let (prefix, others) = match Self::turn(i) {
                Player::P1 => ("a", &evens),
                _ => ("b", &odds),
            };
            for k in 0..rng.random_range(1..=self.outdegree) {
                let j = others[rng.random_range(0..others.len())];
                graph = graph.edge(Self::name(i), format!("{}{}", prefix, k), Self::name(j));
            }
        }
        Ok(graph)
    }

    /// Draw and compile the game.
    pub fn build(&self) -> anyhow::Result<Game<String, String>> {
        let game = Game::build(&self.graph()?)?;
        log::info!("{:<32}{:<32}", "generated   random game", game);
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_alternate() {
        let game = RandomGame::new(40, 4, 5, 7).build().unwrap();
        assert!(game.n() == 40);
        for e in game.edges() {
            let u = game.turn(game.source(e));
            let v = game.turn(game.target(e));
            assert!(u != v);
        }
    }

    #[test]
    fn finals_and_degrees() {
        let game = RandomGame::new(30, 3, 6, 11).build().unwrap();
        assert!(game.labelled(GOAL).len() == 6);
        for n in game.nodes() {
            let degree = game.outgoing(n).count();
            assert!(degree >= 1 && degree <= 3);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = RandomGame::new(50, 5, 5, 1745).build().unwrap();
        let b = RandomGame::new(50, 5, 5, 1745).build().unwrap();
        assert!(a.transitions() == b.transitions());
        assert!(a.labelled(GOAL) == b.labelled(GOAL));
    }

    #[test]
    fn degenerate_parameters_fail() {
        assert!(RandomGame::new(1, 2, 0, 0).graph().is_err());
        assert!(RandomGame::new(10, 0, 0, 0).graph().is_err());
        assert!(RandomGame::new(10, 2, 11, 0).graph().is_err());
    }
}

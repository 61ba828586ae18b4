use crate::*;
use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Subjectively rationalizable actions (SR-acts) of the deceived attacker.
///
/// Total over the attacker's perceived winning region: every state of the
/// region maps to a possibly empty action set. An empty set means the
/// attacker sees no justifiable move there, which is a legitimate terminal
/// condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RationalActions<S, A>(BTreeMap<S, BTreeSet<A>>)
where
    S: Ident,
    A: Ident;

impl<S, A> Default for RationalActions<S, A>
where
    S: Ident,
    A: Ident,
{
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<S, A> RationalActions<S, A>
where
    S: Ident,
    A: Ident,
{
    /// Actions that strictly lower the attacker's rank in its own solution.
    pub fn sure(solution: &SureWin<S, A>) -> Self {
        let game = solution.game();
        let region = solution.region(solution.attacker());
        Self(
            region
                .ones()
                .map(NodeIndex::new)
                .map(|n| {
                    let rank = solution.rank_of(n);
                    let acts = game
                        .outgoing(n)
                        .filter(|e| solution.rank_of(game.target(*e)) < rank)
                        .map(|e| game.action(e).clone())
                        .collect();
                    (game.state(n).clone(), acts)
                })
                .collect(),
        )
    }

    /// Actions that stay inside the attacker's winning region. True final
    /// states are absorbing and get none.
    pub fn almost_sure(game: &Game<S, A>, region: &FixedBitSet, finals: &BTreeSet<S>) -> Self {
        Self(
            region
                .ones()
                .map(NodeIndex::new)
                .map(|n| {
                    let state = game.state(n);
                    let acts = match finals.contains(state) {
                        true => BTreeSet::new(),
                        false => game
                            .outgoing(n)
                            .filter(|e| region.contains(game.target(*e).index()))
                            .map(|e| game.action(e).clone())
                            .collect(),
                    };
                    (state.clone(), acts)
                })
                .collect(),
        )
    }

    pub fn get(&self, state: &S) -> Option<&BTreeSet<A>> {
        self.0.get(state)
    }
    /// Rationalizable actions at `state`, in order. Empty outside the region.
    pub fn actions<'a>(&'a self, state: &S) -> impl Iterator<Item = &'a A> + 'a {
        self.0.get(state).into_iter().flatten()
    }
    pub fn allows(&self, state: &S, action: &A) -> bool {
        self.0
            .get(state)
            .map(|acts| acts.contains(action))
            .unwrap_or(false)
    }
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.0.keys()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&S, &BTreeSet<A>)> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// P2 wins from 3 by `x`, and from 2 since P1 has only `y`.
    fn five() -> Arc<Game<u32, char>> {
        let graph = Explicit::new(Transitions::Deterministic)
            .state(0, Player::P1)
            .state(1, Player::P1)
            .state(2, Player::P1)
            .state(3, Player::P2)
            .state(4, Player::P2)
            .edge(0, 'a', 1)
            .edge(0, 'b', 3)
            .edge(1, 'c', 0)
            .edge(2, 'y', 4)
            .edge(3, 'x', 4)
            .edge(3, 'z', 0)
            .edge(4, 'w', 4);
        Arc::new(Game::build(&graph).unwrap())
    }

    #[test]
    fn sure_actions_lower_the_rank() {
        let mut solution = SureWin::new(five(), &BTreeSet::from([4]), Player::P2).unwrap();
        solution.solve(false);
        let rational = RationalActions::sure(&solution);
        assert!(rational.len() == 3);
        assert!(rational.get(&3) == Some(&BTreeSet::from(['x'])));
        assert!(rational.get(&2) == Some(&BTreeSet::from(['y'])));
        assert!(rational.get(&4) == Some(&BTreeSet::new()));
        assert!(rational.get(&0).is_none());
        assert!(!rational.allows(&3, &'z'));
    }

    #[test]
    fn almost_sure_actions_stay_in_region() {
        let game = five();
        let region = game.mask(&[0, 1, 3, 4]).unwrap();
        let rational = RationalActions::almost_sure(&game, &region, &BTreeSet::from([4]));
        assert!(rational.get(&0) == Some(&BTreeSet::from(['a', 'b'])));
        assert!(rational.get(&3) == Some(&BTreeSet::from(['x', 'z'])));
        assert!(rational.get(&4) == Some(&BTreeSet::new()));
        assert!(rational.actions(&2).count() == 0);
    }

    #[test]
    fn default_is_empty_for_any_identifiers() {
        let rational = RationalActions::<Proxy<u32>, Move<char>>::default();
        assert!(rational.is_empty());
        assert!(!rational.allows(&Proxy::Lured, &Move::Stay));
    }
}

use crate::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Candidate decoy placements.
///
/// Each candidate stands for one or more base states, so a coarse placement
/// (a grid cell, a room) can cover an equivalence class of states. Iteration
/// follows the candidates' order, which is what makes greedy ties canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Candidates<C, S>(BTreeMap<C, BTreeSet<S>>)
where
    C: Ident,
    S: Ident;

impl<C, S> Candidates<C, S>
where
    C: Ident,
    S: Ident,
{
    /// Validate and clean a candidate mapping.
    ///
    /// Unknown base states are an error. True final states cannot be decoys:
    /// they are removed from every candidate with [`Event::FinalCandidate`],
    /// and candidates left empty are dropped.
    pub fn new<A>(
        game: &Game<S, A>,
        finals: &BTreeSet<S>,
        mapping: BTreeMap<C, BTreeSet<S>>,
        diagnostics: &mut Diagnostics,
    ) -> anyhow::Result<Self>
    where
        A: Ident,
    {
        let mut cleaned = BTreeMap::new();
        for (candidate, states) in mapping {
            for s in states.iter() {
                game.index(s)?;
            }
            let overlap = states.intersection(finals).cloned().collect::<Vec<_>>();
            if !overlap.is_empty() {
                diagnostics.emit(
                    "candidates",
                    Event::FinalCandidate,
                    format!("{:?} loses final states {:?}", candidate, overlap),
                );
            }
            let states = states.difference(finals).cloned().collect::<BTreeSet<_>>();
            if !states.is_empty() {
                cleaned.insert(candidate, states);
            }
        }
        Ok(Self(cleaned))
    }

    pub fn get(&self, candidate: &C) -> Option<&BTreeSet<S>> {
        self.0.get(candidate)
    }
    pub fn contains(&self, candidate: &C) -> bool {
        self.0.contains_key(candidate)
    }
    pub fn keys(&self) -> impl Iterator<Item = &C> {
        self.0.keys()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Base states covered by a set of candidates.
    pub fn cover<'a>(&self, chosen: impl IntoIterator<Item = &'a C>) -> BTreeSet<S>
    where
        C: 'a,
    {
        chosen
            .into_iter()
            .filter_map(|c| self.0.get(c))
            .flatten()
            .cloned()
            .collect()
    }
}

impl<S> Candidates<S, S>
where
    S: Ident,
{
    /// One candidate per state, covering only itself.
    pub fn singletons(states: impl IntoIterator<Item = S>) -> BTreeMap<S, BTreeSet<S>> {
        states
            .into_iter()
            .map(|s| (s.clone(), BTreeSet::from([s])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game<u32, char> {
        Game::build(
            &Explicit::new(Transitions::Deterministic)
                .state(0, Player::P1)
                .state(1, Player::P2)
                .state(2, Player::P1)
                .edge(0, 'a', 1)
                .edge(1, 'b', 2)
                .edge(2, 'c', 2),
        )
        .unwrap()
    }

    #[test]
    fn final_states_are_removed() {
        let mut diagnostics = Diagnostics::default();
        let mapping = BTreeMap::from([
            ('p', BTreeSet::from([2])),
            ('q', BTreeSet::from([1, 2])),
            ('r', BTreeSet::from([0])),
        ]);
        let candidates = Candidates::new(&game(), &BTreeSet::from([2]), mapping, &mut diagnostics).unwrap();
        assert!(candidates.len() == 2);
        assert!(!candidates.contains(&'p'));
        assert!(candidates.get(&'q') == Some(&BTreeSet::from([1])));
        assert!(diagnostics.count(Event::FinalCandidate) == 2);
        assert!(candidates.cover(&['q', 'r']) == BTreeSet::from([0, 1]));
    }

    #[test]
    fn unknown_states_are_rejected() {
        let mut diagnostics = Diagnostics::default();
        let mapping = BTreeMap::from([('p', BTreeSet::from([7]))]);
        assert!(Candidates::new(&game(), &BTreeSet::new(), mapping, &mut diagnostics).is_err());
    }

    #[test]
    fn singletons_cover_themselves() {
        let mapping = Candidates::singletons([3u32, 5]);
        assert!(mapping.get(&5) == Some(&BTreeSet::from([5])));
    }
}

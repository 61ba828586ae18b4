use serde::Serialize;

/// A state of the almost-sure hypergame.
///
/// Base-game states keep their identity; three synthetic absorbing states
/// summarise how a composed move ends.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Proxy<S> {
    /// A defender state of the base game.
    State(S),
    /// The attacker reached a decoy (`qF`). The hypergame's target.
    Lured,
    /// The attacker reached a true final state (`sink`).
    Lost,
    /// The play entered the defender's sure-winning region (`p1win`).
    Secured,
}

impl<S> Proxy<S> {
    pub fn state(&self) -> Option<&S> {
        match self {
            Self::State(s) => Some(s),
            _ => None,
        }
    }
    pub fn into_state(self) -> Option<S> {
        match self {
            Self::State(s) => Some(s),
            _ => None,
        }
    }
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, Self::State(_))
    }
}

impl<S> std::fmt::Display for Proxy<S>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State(s) => write!(f, "{:?}", s),
            Self::Lured => write!(f, "qF"),
            Self::Lost => write!(f, "sink"),
            Self::Secured => write!(f, "p1win"),
        }
    }
}

/// An action of the almost-sure hypergame: the defender's base-game action,
/// or the idle self-loop of a synthetic state.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Move<A> {
    Act(A),
    Stay,
}

impl<A> std::fmt::Display for Move<A>
where
    A: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Act(a) => write!(f, "{:?}", a),
            Self::Stay => write!(f, "*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_states_have_no_base_state() {
        assert!(Proxy::<u32>::Lured.state().is_none());
        assert!(Proxy::State(3u32).into_state() == Some(3));
        assert!(Proxy::<u32>::Secured.is_synthetic());
        assert!(Proxy::<u32>::Lost.to_string() == "sink");
    }
}

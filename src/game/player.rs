use serde::Deserialize;
use serde::Serialize;

/// Controller of a game state.
///
/// Turn-based games alternate between `P1` (the defender) and `P2` (the
/// attacker). Qualitative MDPs replace `P2` with `Nature`, which resolves
/// branching without being adversarial or cooperative.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
    Nature,
}

impl Player {
    /// The other side of a two-player game. Nature has no opponent.
    pub fn opponent(&self) -> Option<Self> {
        match self {
            Self::P1 => Some(Self::P2),
            Self::P2 => Some(Self::P1),
            Self::Nature => None,
        }
    }
    pub fn is_nature(&self) -> bool {
        matches!(self, Self::Nature)
    }
}

impl TryFrom<u8> for Player {
    type Error = anyhow::Error;
    fn try_from(turn: u8) -> Result<Self, Self::Error> {
        match turn {
            0 => Ok(Self::Nature),
            1 => Ok(Self::P1),
            2 => Ok(Self::P2),
            _ => Err(anyhow::anyhow!("invalid turn {}", turn)),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::P1 => write!(f, "P1"),
            Self::P2 => write!(f, "P2"),
            Self::Nature => write!(f, "N"),
        }
    }
}

use serde::Serialize;

/// Attractor level of a state.
///
/// `Level(0)` is the target set; `Level(k)` states joined the winning region
/// at the k-th expansion. `Never` states were never added and belong to the
/// opponent. The derived order puts every level below `Never`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Rank {
    Level(usize),
    Never,
}

impl Rank {
    pub fn level(&self) -> Option<usize> {
        match self {
            Self::Level(k) => Some(*k),
            Self::Never => None,
        }
    }
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Level(_))
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Level(k) => write!(f, "{}", k),
            Self::Never => write!(f, "inf"),
        }
    }
}

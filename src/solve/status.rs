use serde::Serialize;

/// Solver lifecycle. Results are read-only once `Solved`.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Serialize)]
pub enum Status {
    #[default]
    Unsolved,
    Solved,
}

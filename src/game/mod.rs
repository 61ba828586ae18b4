//! Game graph primitives.
//!
//! - `Player`: who controls a state (P1, P2, or nature)
//! - `Transitions` / `Delta`: declared transition kind and successor values
//! - `GameGraph`: the interface external collaborators implement
//! - `Explicit` / `Lazy`: table-backed and closure-backed adapters
//! - `Game`: immutable petgraph arena compiled from any `GameGraph`
//! - `View`: liveness masks over a `Game` for pruning fixpoints
//! - `RandomGame`: seeded turn-alternating random games

mod delta;
mod explicit;
mod game;
mod graph;
mod lazy;
mod player;
mod random;
mod view;

pub use delta::*;
pub use explicit::*;
pub use game::*;
pub use graph::*;
pub use lazy::*;
pub use player::*;
pub use random::*;
pub use view::*;

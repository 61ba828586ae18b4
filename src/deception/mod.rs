//! Deception on top of the reachability solvers.
//!
//! - `RationalActions`: subjectively rationalizable actions of the attacker
//! - `Proxy` / `Move`: synthetic states and moves of the almost-sure hypergame
//! - `HypergameBuilder`: sure and almost-sure hypergame transforms
//! - `Setup`: validated base game, final set, and decoy placement
//! - `Deception`: solver interface, with `SureDeception` and
//!   `AlmostSureDeception` as its two solution concepts
//! - `Concept` / `Evaluation`: concept selector and its one-shot result

mod almostsure;
mod concept;
mod deception;
mod hypergame;
mod proxy;
mod rational;
mod setup;
mod sure;

pub use almostsure::*;
pub use concept::*;
pub use deception::*;
pub use hypergame::*;
pub use proxy::*;
pub use rational::*;
pub use setup::*;
pub use sure::*;

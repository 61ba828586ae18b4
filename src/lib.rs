//! Reachability games, hypergames, and deceptive decoy allocation.
//!
//! Two-player turn-based games on directed state graphs are solved for
//! sure-winning and almost-sure-winning reachability regions. The solutions
//! drive the construction of hypergames that model what a misinformed
//! attacker believes, and the hypergames in turn measure how much of the
//! attacker's perceived winning region a defender can capture by placing
//! fake targets and traps: the *value of deception*.
//!
//! # Module Structure
//!
//! - `game`: Game graph interface, explicit and lazy adapters, compiled arena
//! - `solve`: Sure-winning and almost-sure-winning reachability solvers
//! - `deception`: Rationalizable actions, hypergames, deception solvers
//! - `allocate`: Greedy fake-target and trap allocation
//! - `diagnostics`: Structured, per-instance diagnostic events
//! - `wire`: Tagged encoding for sets, tuples, and maps
#![allow(dead_code)]

mod allocate;
mod deception;
mod diagnostics;
mod game;
mod solve;
mod wire;

#[cfg(feature = "cli")]
pub mod cli;

pub use allocate::*;
pub use deception::*;
pub use diagnostics::*;
pub use game::*;
pub use solve::*;
pub use wire::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Transition probabilities of lottery edges.
pub type Probability = f64;
/// Value of deception, a ratio in [0, 1].
pub type Vod = f64;

// ============================================================================
// IDENTITY
// ============================================================================
/// Opaque identifier for states, actions, and decoy candidates.
///
/// The core assumes nothing about identifiers beyond identity and a total
/// order. The order makes every set-valued output deterministic and gives
/// candidate ties a canonical resolution.
pub trait Ident:
    Clone + Eq + std::hash::Hash + Ord + std::fmt::Debug + Send + Sync
{
}
impl<T> Ident for T where
    T: Clone + Eq + std::hash::Hash + Ord + std::fmt::Debug + Send + Sync
{
}

// ============================================================================
// GAME CONSTRUCTION
// ============================================================================
/// Allowed deviation of a lottery's total mass from one.
pub const PROBABILITY_TOLERANCE: Probability = 1e-6;
/// Atomic proposition marking true final states in generated games.
pub const GOAL: &str = "goal";

// ============================================================================
// RANDOM GAME DEFAULTS
// Turn-alternating random games used by the CLI and the benches.
// ============================================================================
/// Number of states in a generated game.
pub const RANDOM_NODES: usize = 150;
/// Maximum number of actions enabled at a generated state.
pub const RANDOM_OUTDEGREE: usize = 5;
/// Number of goal-labelled states in a generated game.
pub const RANDOM_FINALS: usize = 10;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Directory receiving timestamped debug logs.
pub const LOG_DIRECTORY: &str = "logs";

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() -> anyhow::Result<()> {
    use anyhow::Context;
    std::fs::create_dir_all(LOG_DIRECTORY).context("create logs directory")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .context("time moves slow")?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("{}/{}.log", LOG_DIRECTORY, time))
            .context("create log file")?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).context("initialize logger")
}

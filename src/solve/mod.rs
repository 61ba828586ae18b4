//! Reachability solvers.
//!
//! - `Reachability`: common solver interface and re-solve guard
//! - `Rank` / `Status`: attractor levels and solver lifecycle
//! - `SureWin`: two-player attractor for sure-winning regions
//! - `AlmostSureWin`: action pruning for almost-sure-winning regions

mod almostsure;
mod rank;
mod reachability;
mod status;
mod surewin;

pub use almostsure::*;
pub use rank::*;
pub use reachability::*;
pub use status::*;
pub use surewin::*;

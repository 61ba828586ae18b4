//! Command-line front end.
//!
//! - `Problem`: JSON problem files (game, final set, decoys, candidates)
//! - `Command`: `solve`, `allocate`, and `random` subcommands

mod command;
mod problem;

pub use command::*;
pub use problem::*;

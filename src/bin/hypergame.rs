//! Hypergame Binary
//!
//! Solves reachability games and allocates decoys from JSON problem files.
//!
//! Subcommands: solve, allocate, random

use clap::Parser;

fn main() -> anyhow::Result<()> {
    hypergame::log()?;
    hypergame::cli::Command::parse().run()
}

//! Greedy decoy allocation.
//!
//! - `Candidates`: candidate placements and the base states each one covers
//! - `Decoy` / `Record` / `Round` / `Allocation`: auditable search results
//! - `DecoyAllocator`: fake phase, then trap phase, one decoy per round

mod allocation;
mod allocator;
mod candidates;

pub use allocation::*;
pub use allocator::*;
pub use candidates::*;

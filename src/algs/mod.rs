//! Traversal, partitioning and distribution algorithms.

pub mod communicator;
pub mod distribute;
pub mod partition;
pub mod traversal;
pub mod wire;

pub use distribute::{run_local, run_rank};
pub use traversal::{mark_visited, mark_visited_par};

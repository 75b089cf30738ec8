#![cfg_attr(docsrs, feature(doc_cfg))]
//! # tree-visit
//!
//! tree-visit generates a synthetic near-complete binary tree and marks every
//! node of it as visited, either inside one process with rayon fan-out or
//! across isolated ranks that exchange whole subtrees over point-to-point
//! messages (in-process threads, or MPI).
//!
//! ## Features
//! - Level-saturating generation with heap-ordered labels (`root = 1`, node
//!   `n` has children `2n` and `2n + 1`), built without recursion
//! - Sequential and fan-out traversal with an explicit fan-out depth
//! - Fixed partition table for world sizes 2, 3, 5 and 9
//! - Rank-ordered scatter/gather over a pluggable
//!   [`Communicator`](algs::communicator::Communicator)
//!   (`LocalComm` threads, `MpiComm` with the `mpi-support` feature)
//!
//! ## Determinism
//!
//! Generation is fully deterministic: the same target always yields the same
//! labels and shape. Traversal order differs between strategies, the final
//! `visited` state does not.
//!
//! ## Usage
//!
//! ```rust
//! use tree_visit::prelude::*;
//!
//! let mut tree = TreeBuilder::new().generate(31).unwrap();
//! mark_visited_par(&mut tree, true);
//! assert!(tree.all_visited(true));
//!
//! let report = run_local(9, &RunConfig::new(31), |_, _| {}).unwrap();
//! assert_eq!(report.results().unwrap().len(), 8);
//! ```

pub mod algs;
pub mod config;
pub mod debug_invariants;
pub mod tree;
pub mod tree_error;

pub use debug_invariants::DebugInvariants;
pub use tree_error::TreeError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::communicator::{Communicator, LocalComm};
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    pub use crate::algs::distribute::{
        GatherReport, release_workers, run_coordinator, run_local, run_rank, run_worker,
    };
    pub use crate::algs::partition::{SUPPORTED_WORLD_SIZES, partition, partition_paths};
    pub use crate::algs::traversal::{Strategy, VisitBuilder, mark_visited, mark_visited_par};
    pub use crate::config::{MIN_VERTICES, RunConfig};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::tree::{TreeBuilder, TreeNode};
    pub use crate::tree_error::TreeError;
}

//! TreeError: Unified error type for tree-visit public APIs
//!
//! Every fallible operation in the library (generation, partitioning, wire
//! decoding, transport) reports through this enum. The library never aborts
//! on its own; binaries decide whether an error is fatal for the whole group.

use thiserror::Error;

/// Unified error type for tree-visit operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The builder was handed a root that already has children.
    #[error("There should be no children in the main node (root `{label}` has {children})")]
    RootNotEmpty { label: String, children: usize },
    /// The requested vertex count is below the accepted floor.
    #[error("Vertex count {given} must be greater than {min}")]
    InvalidVertexCount { given: u64, min: u64 },
    /// The world size has no entry in the partition table.
    #[error("Unsupported world size {0} (expected one of 2, 3, 5, 9)")]
    UnsupportedWorldSize(usize),
    /// The tree does not reach the depth required by the partition table.
    #[error("Tree too shallow to partition: rank {rank} needs a node at depth {depth}")]
    PartitionTooShallow { rank: usize, depth: usize },
    /// A rank outside `1..world_size` was used for a worker operation.
    #[error("Rank {rank} is not a worker rank for world size {world_size}")]
    InvalidRank { rank: usize, world_size: usize },
    /// Encoding or decoding a subtree failed.
    #[error("Wire error: {0}")]
    Wire(String),
    /// The envelope carried an unknown wire version or kind.
    #[error("Wire version mismatch: expected {expected}, got {found}")]
    WireVersion { expected: u16, found: u16 },
    /// A point-to-point send or receive failed.
    #[error("Transport error talking to rank {peer}: {reason}")]
    Transport { peer: usize, reason: String },
    /// Rank 0 abandoned the round and released the workers.
    #[error("Round aborted by the coordinator")]
    Aborted,
    /// MPI could not be initialized (already initialized, or no runtime).
    #[error("MPI initialization failed")]
    MpiInit,
    /// A structural invariant of the tree does not hold.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl From<bincode::Error> for TreeError {
    fn from(e: bincode::Error) -> Self {
        TreeError::Wire(e.to_string())
    }
}

//! Distributed traversal: scatter subtrees, traverse on workers, gather in
//! rank order.
//!
//! Rank 0 builds the tree, partitions it with the fixed table and sends one
//! subtree per worker. Each worker traverses its subtree sequentially and
//! sends it back. Rank 0 receives from ranks `1..N` strictly in ascending
//! order (a fast high rank waits behind slower low ranks) and grafts every
//! returned subtree back into its tree.
//!
//! There is no retry or partial-failure path: a worker that never answers
//! blocks the coordinator forever. When the coordinator itself fails after
//! validation, the in-process driver releases every worker with an abort
//! message; under MPI the binary aborts the whole group instead.

use crate::algs::communicator::{Communicator, LocalComm};
use crate::algs::partition::{graft, mark_upper, partition, subtree_for_rank};
use crate::algs::traversal::mark_visited;
use crate::algs::wire::{WireKind, decode_subtree, encode_abort, encode_subtree};
use crate::config::RunConfig;
use crate::tree::builder::TreeBuilder;
use crate::tree::node::TreeNode;
use crate::tree_error::TreeError;
use std::thread;
use std::time::{Duration, Instant};

/// Tag used for every subtree message in both directions.
pub const TREE_TAG: u16 = 0;

/// What rank 0 holds after a completed round.
#[derive(Debug)]
pub struct GatherReport {
    /// The whole tree, every worker subtree grafted back in.
    pub tree: TreeNode,
    pub world_size: usize,
    /// Time spent from the first send to the last receive.
    pub elapsed: Duration,
}

impl GatherReport {
    /// Worker results in rank order.
    ///
    /// # Errors
    /// Fails if the tree no longer reaches the partition depth.
    pub fn results(&self) -> Result<Vec<(usize, &TreeNode)>, TreeError> {
        (1..self.world_size)
            .map(|rank| subtree_for_rank(&self.tree, self.world_size, rank).map(|t| (rank, t)))
            .collect()
    }

    pub fn total_nodes(&self) -> usize {
        self.tree.node_count()
    }

    pub fn all_visited(&self) -> bool {
        self.tree.all_visited(true)
    }
}

/// Send every worker its subtree (blocking sends, rank order).
pub fn scatter<C: Communicator>(comm: &C, tree: &TreeNode) -> Result<(), TreeError> {
    for (i, subtree) in partition(tree, comm.size())?.into_iter().enumerate() {
        let rank = i + 1;
        let msg = encode_subtree(WireKind::Subtree, subtree)?;
        log::debug!(
            "[rank 0] sending subtree `{}` ({} nodes, {} bytes) to rank {rank}",
            subtree.label(),
            subtree.node_count(),
            msg.len()
        );
        comm.send(rank, TREE_TAG, &msg)?;
    }
    Ok(())
}

/// Receive one visited subtree from each worker, strictly in ascending rank
/// order, calling `on_result` as each arrives.
pub fn gather<C, F>(comm: &C, mut on_result: F) -> Result<Vec<(usize, TreeNode)>, TreeError>
where
    C: Communicator,
    F: FnMut(usize, &TreeNode),
{
    let mut out = Vec::with_capacity(comm.size().saturating_sub(1));
    for rank in 1..comm.size() {
        let msg = comm.recv(rank, TREE_TAG)?;
        let subtree = decode_subtree(WireKind::Visited, &msg)?;
        on_result(rank, &subtree);
        out.push((rank, subtree));
    }
    Ok(out)
}

/// Rank 0's side of one round.
///
/// # Errors
/// Fails fast, before anything is sent, when the vertex count or world size
/// is invalid; the caller is expected to abort the group.
pub fn run_coordinator<C, F>(
    comm: &C,
    config: &RunConfig,
    on_result: F,
) -> Result<GatherReport, TreeError>
where
    C: Communicator,
    F: FnMut(usize, &TreeNode),
{
    let world_size = comm.size();
    config.validate_distributed(world_size)?;

    let mut tree = TreeBuilder::new()
        .root_label(config.root_label.clone())
        .generate(config.vertices)?;

    let start = Instant::now();
    scatter(comm, &tree)?;
    let results = gather(comm, on_result)?;
    let elapsed = start.elapsed();

    for (rank, subtree) in results {
        graft(&mut tree, world_size, rank, subtree)?;
    }
    mark_upper(&mut tree, world_size, true)?;
    log::info!(
        "[rank 0] gathered {} subtrees in {:.3} ms",
        world_size - 1,
        elapsed.as_secs_f64() * 1e3
    );

    Ok(GatherReport {
        tree,
        world_size,
        elapsed,
    })
}

/// A worker's side of one round: receive, traverse, send back.
///
/// Returns the number of nodes the worker marked.
pub fn run_worker<C: Communicator>(comm: &C) -> Result<usize, TreeError> {
    let rank = comm.rank();
    let msg = comm.recv(0, TREE_TAG)?;
    let mut subtree = decode_subtree(WireKind::Subtree, &msg)?;
    log::info!(
        "[rank {rank}] received subtree `{}` ({} nodes)",
        subtree.label(),
        subtree.node_count()
    );

    let marked = mark_visited(&mut subtree, true);

    let reply = encode_subtree(WireKind::Visited, &subtree)?;
    comm.send(0, TREE_TAG, &reply)?;
    Ok(marked)
}

/// Tell every worker the round is over. Workers still waiting for their
/// subtree return [`TreeError::Aborted`]; the message is ignored by workers
/// that already finished.
pub fn release_workers<C: Communicator>(comm: &C) -> Result<(), TreeError> {
    let msg = encode_abort();
    for rank in 1..comm.size() {
        comm.send(rank, TREE_TAG, &msg)?;
    }
    Ok(())
}

/// Dispatch on rank: the coordinator returns its report, workers `None`.
pub fn run_rank<C, F>(
    comm: &C,
    config: &RunConfig,
    on_result: F,
) -> Result<Option<GatherReport>, TreeError>
where
    C: Communicator,
    F: FnMut(usize, &TreeNode),
{
    if comm.rank() == 0 {
        run_coordinator(comm, config, on_result).map(Some)
    } else {
        run_worker(comm).map(|_| None)
    }
}

/// Run one round over in-process ranks, one OS thread per worker.
///
/// Parameters are validated before any thread starts, so a bad configuration
/// never leaves workers blocked on a receive.
pub fn run_local<F>(
    world_size: usize,
    config: &RunConfig,
    on_result: F,
) -> Result<GatherReport, TreeError>
where
    F: FnMut(usize, &TreeNode),
{
    config.validate_distributed(world_size)?;
    let mut comms = LocalComm::universe(world_size).into_iter();
    let root = comms.next().ok_or(TreeError::UnsupportedWorldSize(world_size))?;

    thread::scope(|s| {
        let workers: Vec<_> = comms
            .map(|comm| {
                let rank = comm.rank();
                let handle = thread::Builder::new()
                    .name(format!("rank-{rank}"))
                    .spawn_scoped(s, move || run_worker(&comm));
                (rank, handle)
            })
            .collect();

        let report = run_coordinator(&root, config, on_result);
        if let Err(e) = &report {
            log::warn!("[rank 0] round failed, releasing workers: {e}");
            release_workers(&root)?;
        }

        let mut worker_err = None;
        for (rank, handle) in workers {
            let joined = handle
                .map_err(|e| TreeError::Transport {
                    peer: rank,
                    reason: format!("failed to spawn worker thread: {e}"),
                })?
                .join()
                .map_err(|_| TreeError::Transport {
                    peer: rank,
                    reason: "worker thread panicked".into(),
                })?;
            if let Err(e) = joined {
                worker_err.get_or_insert(e);
            }
        }
        let report = report?;
        worker_err.map_or(Ok(report), Err)
    })
}

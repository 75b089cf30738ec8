//! Fixed-topology partitioning of a generated tree across worker ranks.
//!
//! The partition is a hardcoded lookup table, not an algorithm: each
//! supported world size (coordinator included) maps ranks `1..N` to child
//! paths at a fixed depth. The assigned subtrees are disjoint, and together
//! with the nodes strictly above the partition depth they cover the tree
//! exactly once.

use crate::tree::node::TreeNode;
use crate::tree_error::TreeError;

/// World sizes (coordinator included) with an entry in the partition table.
pub const SUPPORTED_WORLD_SIZES: [usize; 4] = [2, 3, 5, 9];

static PATHS_2: [&[usize]; 1] = [&[]];
static PATHS_3: [&[usize]; 2] = [&[0], &[1]];
static PATHS_5: [&[usize]; 4] = [&[0, 0], &[0, 1], &[1, 0], &[1, 1]];
static PATHS_9: [&[usize]; 8] = [
    &[0, 0, 0],
    &[0, 0, 1],
    &[0, 1, 0],
    &[0, 1, 1],
    &[1, 0, 0],
    &[1, 0, 1],
    &[1, 1, 0],
    &[1, 1, 1],
];

/// Child paths for ranks `1..world_size`; entry `i` belongs to rank `i + 1`.
pub fn partition_paths(world_size: usize) -> Result<&'static [&'static [usize]], TreeError> {
    match world_size {
        2 => Ok(&PATHS_2),
        3 => Ok(&PATHS_3),
        5 => Ok(&PATHS_5),
        9 => Ok(&PATHS_9),
        n => Err(TreeError::UnsupportedWorldSize(n)),
    }
}

/// Depth of the subtree roots handed to workers.
pub fn partition_depth(world_size: usize) -> Result<usize, TreeError> {
    Ok(partition_paths(world_size)?[0].len())
}

fn path_for_rank(world_size: usize, rank: usize) -> Result<&'static [usize], TreeError> {
    let paths = partition_paths(world_size)?;
    rank.checked_sub(1)
        .and_then(|i| paths.get(i).copied())
        .ok_or(TreeError::InvalidRank { rank, world_size })
}

/// One subtree per worker rank, in rank order.
pub fn partition(root: &TreeNode, world_size: usize) -> Result<Vec<&TreeNode>, TreeError> {
    partition_paths(world_size)?
        .iter()
        .enumerate()
        .map(|(i, path)| {
            root.node_at(path).ok_or(TreeError::PartitionTooShallow {
                rank: i + 1,
                depth: path.len(),
            })
        })
        .collect()
}

/// The subtree assigned to a single worker rank.
pub fn subtree_for_rank(
    root: &TreeNode,
    world_size: usize,
    rank: usize,
) -> Result<&TreeNode, TreeError> {
    let path = path_for_rank(world_size, rank)?;
    root.node_at(path).ok_or(TreeError::PartitionTooShallow {
        rank,
        depth: path.len(),
    })
}

/// Replace a rank's subtree with the one it sent back; returns the old one.
pub fn graft(
    root: &mut TreeNode,
    world_size: usize,
    rank: usize,
    subtree: TreeNode,
) -> Result<TreeNode, TreeError> {
    let path = path_for_rank(world_size, rank)?;
    let slot = root
        .node_at_mut(path)
        .ok_or(TreeError::PartitionTooShallow {
            rank,
            depth: path.len(),
        })?;
    Ok(std::mem::replace(slot, subtree))
}

/// Nodes strictly above the partition depth, in pre-order. These stay with
/// the coordinator.
pub fn upper_nodes(root: &TreeNode, world_size: usize) -> Result<Vec<&TreeNode>, TreeError> {
    let depth = partition_depth(world_size)?;
    let mut out = Vec::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((node, d)) = stack.pop() {
        if d >= depth {
            continue;
        }
        out.push(node);
        for child in node.children.iter().rev() {
            stack.push((child, d + 1));
        }
    }
    Ok(out)
}

/// Set `visited` on the coordinator's own share (the upper nodes).
pub fn mark_upper(root: &mut TreeNode, world_size: usize, flag: bool) -> Result<usize, TreeError> {
    let depth = partition_depth(world_size)?;
    let mut marked = 0;
    let mut stack = vec![(root, 0usize)];
    while let Some((node, d)) = stack.pop() {
        if d >= depth {
            continue;
        }
        node.visited = flag;
        marked += 1;
        for child in node.children.iter_mut() {
            stack.push((child, d + 1));
        }
    }
    Ok(marked)
}

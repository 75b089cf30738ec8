#![allow(dead_code)]
use tree_visit::tree::{TreeBuilder, TreeNode};

pub fn tree(target: u64) -> TreeNode {
    TreeBuilder::new().generate(target).unwrap()
}

/// Labels parsed back to integers, sorted.
pub fn sorted_labels(nodes: &[&TreeNode]) -> Vec<u64> {
    let mut out: Vec<u64> = nodes
        .iter()
        .flat_map(|n| n.labels())
        .map(|l| l.parse().unwrap())
        .collect();
    out.sort_unstable();
    out
}

/// Smallest complete-tree size `2^(k+1) - 1 >= target` with at least 3 nodes.
pub fn expected_count(target: u64) -> usize {
    let mut n = 3u64;
    while n < target {
        n = 2 * n + 1;
    }
    n as usize
}

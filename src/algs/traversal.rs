//! Visited-marking traversals: sequential DFS and rayon fan-out.
//!
//! Both strategies leave every node of the subtree holding the same flag;
//! only the order of mutation differs. The fan-out strategy parallelizes the
//! top `depth` levels only. Below that each task walks its subtree
//! sequentially, so the number of concurrent tasks is bounded by the
//! branching of the entry levels rather than the size of the tree.

use crate::tree::node::TreeNode;
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Sequential,
    /// Fan out one task per child for the top `depth` levels.
    FanOut { depth: u32 },
}

pub struct VisitBuilder {
    flag: bool,
    strat: Strategy,
}

impl VisitBuilder {
    pub fn new(flag: bool) -> Self {
        Self {
            flag,
            strat: Strategy::Sequential,
        }
    }
    pub fn flag(mut self, flag: bool) -> Self {
        self.flag = flag;
        self
    }
    pub fn sequential(mut self) -> Self {
        self.strat = Strategy::Sequential;
        self
    }
    /// `0` is the same as [`sequential`](Self::sequential).
    pub fn fan_out_depth(mut self, depth: u32) -> Self {
        self.strat = if depth == 0 {
            Strategy::Sequential
        } else {
            Strategy::FanOut { depth }
        };
        self
    }
    pub fn strategy(mut self, strat: Strategy) -> Self {
        self.strat = strat;
        self
    }

    /// Mark `node` and all its descendants; returns the number of nodes set.
    pub fn run(self, node: &mut TreeNode) -> usize {
        match self.strat {
            Strategy::Sequential => run_sequential(node, self.flag),
            Strategy::FanOut { depth } => run_fan_out(node, self.flag, depth),
        }
    }
}

fn run_sequential(node: &mut TreeNode, flag: bool) -> usize {
    let mut marked = 0;
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        node.visited = flag;
        marked += 1;
        for child in node.children.iter_mut().rev() {
            if child.is_leaf() {
                child.visited = flag;
                marked += 1;
            } else {
                stack.push(child);
            }
        }
    }
    marked
}

fn run_fan_out(node: &mut TreeNode, flag: bool, depth: u32) -> usize {
    if depth == 0 || node.is_leaf() {
        return run_sequential(node, flag);
    }
    node.visited = flag;
    let below: usize = node
        .children
        .par_iter_mut()
        .map(|child| {
            if child.is_leaf() {
                child.visited = flag;
                1
            } else {
                run_fan_out(child, flag, depth - 1)
            }
        })
        .sum();
    1 + below
}

/// Sequential depth-first marking of the whole subtree.
pub fn mark_visited(node: &mut TreeNode, flag: bool) -> usize {
    run_sequential(node, flag)
}

/// Entry-level fan-out: one rayon task per immediate child, each of which
/// marks its subtree sequentially. Returns after all tasks have joined.
pub fn mark_visited_par(node: &mut TreeNode, flag: bool) -> usize {
    run_fan_out(node, flag, 1)
}

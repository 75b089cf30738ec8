//! Console rendering of (traversed) trees.
//!
//! One line per node: `label\t(visited) --> child\tchild`. The detailed form
//! prints the entry node and then every non-leaf descendant in pre-order;
//! leaves only show up in their parent's child list.

use crate::tree::node::TreeNode;
use itertools::Itertools;
use std::fmt;

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t({}) --> {}",
            self.label,
            self.visited,
            self.children.iter().map(TreeNode::label).join("\t")
        )
    }
}

/// Multi-line view returned by [`TreeNode::detailed`].
pub struct Detailed<'a>(&'a TreeNode);

impl TreeNode {
    pub fn detailed(&self) -> Detailed<'_> {
        Detailed(self)
    }
}

impl fmt::Display for Detailed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![self.0];
        while let Some(node) = stack.pop() {
            writeln!(f, "{node}")?;
            stack.extend(node.children.iter().rev().filter(|c| !c.is_leaf()));
        }
        Ok(())
    }
}

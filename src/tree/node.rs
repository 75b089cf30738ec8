//! `TreeNode`: an owned, serializable node of a generated tree.
//!
//! Every node exclusively owns its children, so a subtree is an independent
//! unit that can be moved to another thread, or serialized and shipped to
//! another rank, without any shared references.
//!
//! All whole-tree queries here walk with an explicit stack. Generated trees
//! are shallow, but decoded trees come from the wire and are not trusted to
//! be.

use crate::debug_invariants::DebugInvariants;
use crate::tree_error::TreeError;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// A labelled tree node with a `visited` flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub(crate) label: String,
    pub(crate) children: Vec<TreeNode>,
    pub(crate) visited: bool,
}

impl TreeNode {
    /// A fresh, unvisited leaf.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            visited: false,
        }
    }

    /// Append `child` as the last child of this node.
    pub fn add_child(&mut self, child: TreeNode) -> &mut Self {
        self.children.push(child);
        self
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order iterator over this node and all its descendants.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Labels of the subtree in pre-order.
    pub fn labels(&self) -> Vec<&str> {
        self.iter().map(TreeNode::label).collect()
    }

    /// `true` when every node of the subtree carries `flag`.
    pub fn all_visited(&self, flag: bool) -> bool {
        self.iter().all(|n| n.visited == flag)
    }

    /// Depth of every leaf, left to right; `self` is depth 0.
    pub fn leaf_depths(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if node.is_leaf() {
                out.push(depth);
            }
            for child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    pub fn min_leaf_depth(&self) -> usize {
        self.leaf_depths().into_iter().min().unwrap_or(0)
    }

    pub fn max_leaf_depth(&self) -> usize {
        self.leaf_depths().into_iter().max().unwrap_or(0)
    }

    /// Follow child indices from `self`; the empty path is `self`.
    pub fn node_at(&self, path: &[usize]) -> Option<&TreeNode> {
        path.iter().try_fold(self, |node, &i| node.children.get(i))
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut TreeNode> {
        let mut node = self;
        for &i in path {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }
}

/// Pre-order iterator returned by [`TreeNode::iter`].
pub struct Iter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a TreeNode {
    type Item = &'a TreeNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl DebugInvariants for TreeNode {
    /// Every node has 0 or 2 children and labels are unique.
    fn validate_invariants(&self) -> Result<(), TreeError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for node in self {
            if !matches!(node.children.len(), 0 | 2) {
                return Err(TreeError::InvariantViolation(format!(
                    "node `{}` has {} children (expected 0 or 2)",
                    node.label,
                    node.children.len()
                )));
            }
            if !seen.insert(node.label.as_str()) {
                return Err(TreeError::InvariantViolation(format!(
                    "duplicate label `{}`",
                    node.label
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> TreeNode {
        let mut left = TreeNode::new("2");
        left.add_child(TreeNode::new("4")).add_child(TreeNode::new("5"));
        let mut root = TreeNode::new("1");
        root.add_child(left).add_child(TreeNode::new("3"));
        root
    }

    #[test]
    fn preorder_labels() {
        assert_eq!(small().labels(), vec!["1", "2", "4", "5", "3"]);
    }

    #[test]
    fn depths_and_paths() {
        let t = small();
        assert_eq!(t.leaf_depths(), vec![2, 2, 1]);
        assert_eq!(t.min_leaf_depth(), 1);
        assert_eq!(t.max_leaf_depth(), 2);
        assert_eq!(t.node_at(&[0, 1]).map(TreeNode::label), Some("5"));
        assert!(t.node_at(&[1, 0]).is_none());
        assert_eq!(t.node_at(&[]).map(TreeNode::label), Some("1"));
    }

    #[test]
    fn single_child_is_rejected() {
        let mut t = TreeNode::new("1");
        t.add_child(TreeNode::new("2"));
        assert!(matches!(
            t.validate_invariants(),
            Err(TreeError::InvariantViolation(_))
        ));
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let mut t = TreeNode::new("1");
        t.add_child(TreeNode::new("2")).add_child(TreeNode::new("2"));
        assert!(t.validate_invariants().is_err());
        assert!(small().validate_invariants().is_ok());
    }
}

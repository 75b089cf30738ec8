//! Level-saturating tree generation.
//!
//! The tree grows one full level at a time: every node of the current
//! frontier (the deepest nodes with fewer than [`MIN_CHILDREN`] children)
//! receives two new children, labelled from a single counter in frontier
//! order. Generation stops once the counter has reached the target, so the
//! result overshoots by up to the size of the last level.
//!
//! The frontier is an explicit queue of `&mut TreeNode` handles rather than a
//! recursive walk, so generating tens of millions of nodes never grows the
//! call stack.

use crate::debug_invariants::DebugInvariants;
use crate::tree::node::TreeNode;
use crate::tree_error::TreeError;

/// Minimum number of children a node needs to leave the frontier.
pub const MIN_CHILDREN: usize = 2;

/// Children appended to each frontier node per expansion.
const BRANCHING: u64 = 2;

/// Configures and runs tree generation.
#[derive(Clone, Debug)]
pub struct TreeBuilder {
    root_label: String,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            root_label: "1".to_string(),
        }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label of the root created by [`generate`](Self::generate). The root
    /// always occupies counter value 1 regardless of its label.
    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Build a fresh tree with at least `target` nodes.
    pub fn generate(&self, target: u64) -> Result<TreeNode, TreeError> {
        let mut root = TreeNode::new(self.root_label.clone());
        self.expand(&mut root, target)?;
        Ok(root)
    }

    /// Grow `root` in place until the node counter reaches `target`.
    ///
    /// Returns the final node count (root included).
    ///
    /// # Errors
    /// - [`TreeError::InvalidVertexCount`] if `target == 0`.
    /// - [`TreeError::RootNotEmpty`] if `root` already has children.
    /// - [`TreeError::InvariantViolation`] if the root label equals one of
    ///   the labels the expansion would generate.
    pub fn expand(&self, root: &mut TreeNode, target: u64) -> Result<u64, TreeError> {
        if target == 0 {
            return Err(TreeError::InvalidVertexCount { given: 0, min: 0 });
        }
        if !root.is_leaf() {
            return Err(TreeError::RootNotEmpty {
                label: root.label.clone(),
                children: root.children.len(),
            });
        }
        let collides = root.label.parse::<u64>().is_ok_and(|n| {
            (2..=saturated_count(target)).contains(&n) && n.to_string() == root.label
        });
        if collides {
            return Err(TreeError::InvariantViolation(format!(
                "root label `{}` collides with a generated label",
                root.label
            )));
        }

        let mut counter: u64 = 1;
        let mut depth = 0usize;
        let mut frontier: Vec<&mut TreeNode> = vec![&mut *root];

        // The root is always expanded once, whatever the target.
        loop {
            for node in frontier.iter_mut() {
                debug_assert!(node.children.len() < MIN_CHILDREN);
                node.children.reserve_exact(BRANCHING as usize);
                for _ in 0..BRANCHING {
                    counter += 1;
                    node.children.push(TreeNode::new(counter.to_string()));
                }
            }
            depth += 1;
            log::debug!(
                "level {depth}: expanded {} nodes, counter = {counter}",
                frontier.len()
            );
            if counter >= target {
                break;
            }
            frontier = frontier
                .into_iter()
                .flat_map(|node| node.children.iter_mut())
                .collect();
        }

        log::info!("generated tree: {counter} nodes, depth {depth} (target {target})");
        root.debug_assert_invariants();
        Ok(counter)
    }
}

/// Node count once `target` is reached: the smallest `2^(k+1) - 1 >= target`
/// with at least one level below the root.
fn saturated_count(target: u64) -> u64 {
    let (mut count, mut level) = (3u64, 2u64);
    while count < target {
        level = level.saturating_mul(2);
        count = count.saturating_add(level);
    }
    count
}

/// Shorthand for `TreeBuilder::new().generate(target)`.
pub fn generate(target: u64) -> Result<TreeNode, TreeError> {
    TreeBuilder::new().generate(target)
}

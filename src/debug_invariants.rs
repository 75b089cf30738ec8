//! Structural self-checks for trees and partitions.
//!
//! Checks are cheap enough for tests but walk the whole structure, so the
//! asserting entry point only fires in debug builds or with the
//! `check-invariants` / `strict-invariants` features.

use crate::tree_error::TreeError;

/// Types that can verify their own structural invariants.
pub trait DebugInvariants {
    /// Validate invariants and return the first violation encountered.
    fn validate_invariants(&self) -> Result<(), TreeError>;

    /// Panic on the first violation when invariant checking is enabled.
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "tree");
    }
}

/// Run a fallible check and panic with context when invariant checking is
/// enabled. Expands to nothing in release builds without the features.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::TreeNode;

    fn lopsided() -> TreeNode {
        let mut root = TreeNode::new("1");
        for _ in 0..3 {
            root.add_child(TreeNode::new("2"));
        }
        root
    }

    #[test]
    fn validate_reports_violation() {
        assert!(matches!(
            lopsided().validate_invariants(),
            Err(TreeError::InvariantViolation(_))
        ));
    }

    #[cfg(any(debug_assertions, feature = "check-invariants"))]
    #[test]
    #[should_panic(expected = "[invariants] tree")]
    fn assert_panics_when_enabled() {
        lopsided().debug_assert_invariants();
    }

    #[test]
    fn assert_is_silent_on_valid_trees() {
        crate::tree::builder::generate(15)
            .unwrap()
            .debug_assert_invariants();
    }
}

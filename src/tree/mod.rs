//! Tree entity, generator and console rendering.

pub mod builder;
pub mod node;
pub mod render;

pub use builder::{TreeBuilder, generate};
pub use node::TreeNode;

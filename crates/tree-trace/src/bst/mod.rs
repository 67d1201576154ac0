//! Unbalanced binary search tree.

pub mod tree;
pub mod types;

pub use tree::BstTree;
pub use types::BstNode;

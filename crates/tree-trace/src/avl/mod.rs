//! Height-balanced (AVL) tree.

pub mod tree;
pub mod types;
pub mod util;

pub use tree::AvlTree;
pub use types::AvlNode;

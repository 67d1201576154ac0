//! Red-black tree with parent back-links.

pub mod tree;
pub mod types;
pub mod util;

pub use tree::RbTree;
pub use types::RbNode;

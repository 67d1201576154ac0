//! Arena-based binary search tree engines with decision tracing.
//!
//! Three engines share one node shape (key, left, right) and one trace
//! vocabulary:
//!
//! - [`bst::BstTree`] — unbalanced binary search tree.
//! - [`avl::AvlTree`] — height-balanced tree with cached heights.
//! - [`red_black::RbTree`] — red-black tree with parent links.
//!
//! Every `insert` / `delete` mutates the tree **and** returns a [`Trace`]:
//! an ordered list of tagged [`Action`]s explaining each descent, splice,
//! balance check, rotation and recolor, in replay order. Structural
//! actions (rotations, delete re-shapes) carry an acyclic [`Snapshot`] of
//! the whole tree taken once the enclosing frame can observe the final
//! linkage.
//!
//! All "pointers" are `Option<u32>` indices into an [`Arena`], so the
//! red-black parent back-links never form an ownership cycle.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] trait, [`Color`], [`Variant`], [`NodeId`] |
//! [`arena`] | index arena with slot reuse |
//! [`action`] | [`OperationTag`], [`Payload`], [`TraceBuilder`], [`Trace`] |
//! [`pending`] | deferred rotation / delete-shape record |
//! [`snapshot`] | acyclic tree copy consumed by players |
//! [`tree`] | [`Tree`] facade and the [`TreeOps`] capability trait |
//! [`cli`] | script runner behind the `tree-trace` binary |

pub mod action;
pub mod arena;
pub mod avl;
pub mod bst;
pub mod cli;
pub mod config;
pub mod error;
pub mod pending;
pub mod print;
pub mod red_black;
pub mod snapshot;
pub mod tree;
pub mod types;
pub mod util;

pub use action::{Action, ColorChange, OperationTag, Payload, Trace, TraceBuilder};
pub use arena::Arena;
pub use avl::AvlTree;
pub use bst::BstTree;
pub use config::TraceConfig;
pub use error::TreeError;
pub use pending::{Direction, PendingRecord, RotationRecord};
pub use red_black::RbTree;
pub use snapshot::{Snapshot, SnapshotNode};
pub use tree::{TraceEngine, Tree, TreeOps};
pub use types::{Color, Key, Node, NodeId, Variant};

//! Variant-tagged facade over the three engines.

use crate::action::Trace;
use crate::avl::AvlTree;
use crate::bst::BstTree;
use crate::config::TraceConfig;
use crate::error::TreeError;
use crate::red_black::RbTree;
use crate::snapshot::Snapshot;
use crate::types::{Key, NodeId, Variant};

/// Read-only queries every engine answers.
pub trait TreeOps<K> {
    /// Height of the subtree rooted at `subtree`, `0` when empty.
    fn height(&self, subtree: Option<NodeId>) -> u32;
    /// Smallest key in the subtree.
    fn minimum(&self, subtree: Option<NodeId>) -> Option<K>;
    fn find(&self, key: &K) -> Option<NodeId>;
}

/// Mutating interface shared by the engines.
///
/// `delete` requires the key to be present; `insert` requires it to be
/// absent except on the red-black engine.
pub trait TraceEngine<K>: TreeOps<K> {
    fn variant(&self) -> Variant;
    fn root(&self) -> Option<NodeId>;
    fn insert(&mut self, key: K) -> Result<Trace<K>, TreeError>;
    fn delete(&mut self, key: &K) -> Result<Trace<K>, TreeError>;
    fn snapshot(&self) -> Snapshot<K>;
    fn keys(&self) -> Vec<K>;
    fn len(&self) -> usize;
    fn clear(&mut self);
    fn assert_valid(&self) -> Result<(), String>;
}

/// A tree whose engine is picked at construction.
///
/// ```
/// use tree_trace::{OperationTag, Tree, Variant};
///
/// let mut tree = Tree::new(Variant::Avl);
/// tree.insert(10).unwrap();
/// tree.insert(20).unwrap();
/// let trace = tree.insert(30).unwrap();
/// assert_eq!(trace.count(OperationTag::RotateLeft), 1);
/// assert_eq!(tree.root_key(), Some(20));
/// ```
#[derive(Clone, Debug)]
pub enum Tree<K> {
    Bst(BstTree<K>),
    Avl(AvlTree<K>),
    RedBlack(RbTree<K>),
}

macro_rules! dispatch {
    ($self:expr, $tree:ident => $body:expr) => {
        match $self {
            Tree::Bst($tree) => $body,
            Tree::Avl($tree) => $body,
            Tree::RedBlack($tree) => $body,
        }
    };
}

impl<K: Key> Tree<K> {
    pub fn new(variant: Variant) -> Self {
        Self::with_config(variant, TraceConfig::default())
    }

    pub fn with_config(variant: Variant, config: TraceConfig) -> Self {
        match variant {
            Variant::Bst => Tree::Bst(BstTree::with_config(config)),
            Variant::Avl => Tree::Avl(AvlTree::with_config(config)),
            Variant::RedBlack => Tree::RedBlack(RbTree::with_config(config)),
        }
    }

    pub fn engine(&self) -> &dyn TraceEngine<K> {
        dispatch!(self, t => t)
    }

    pub fn engine_mut(&mut self) -> &mut dyn TraceEngine<K> {
        dispatch!(self, t => t)
    }

    pub fn variant(&self) -> Variant {
        self.engine().variant()
    }

    pub fn insert(&mut self, key: K) -> Result<Trace<K>, TreeError> {
        self.engine_mut().insert(key)
    }

    pub fn delete(&mut self, key: &K) -> Result<Trace<K>, TreeError> {
        self.engine_mut().delete(key)
    }

    pub fn find(&self, key: &K) -> Option<NodeId> {
        self.engine().find(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.engine().root()
    }

    pub fn root_key(&self) -> Option<K> {
        self.snapshot().root.map(|n| n.key)
    }

    /// Smallest key of the subtree rooted at `subtree`.
    pub fn minimum(&self, subtree: Option<NodeId>) -> Option<K> {
        self.engine().minimum(subtree)
    }

    /// Height of the subtree rooted at `subtree`.
    pub fn height(&self, subtree: Option<NodeId>) -> u32 {
        self.engine().height(subtree)
    }

    pub fn snapshot(&self) -> Snapshot<K> {
        self.engine().snapshot()
    }

    pub fn keys(&self) -> Vec<K> {
        self.engine().keys()
    }

    pub fn len(&self) -> usize {
        self.engine().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    pub fn clear(&mut self) {
        self.engine_mut().clear()
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        self.engine().assert_valid()
    }
}

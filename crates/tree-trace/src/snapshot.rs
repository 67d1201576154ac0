//! Acyclic copies of a tree.
//!
//! A [`Snapshot`] owns its nodes through `Box`es and never stores parent
//! links, so it can be handed to a player (or serialized) while the live
//! tree keeps mutating.

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::types::{Color, Node, NodeId, Variant};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode<K> {
    pub key: K,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub left: Option<Box<SnapshotNode<K>>>,
    pub right: Option<Box<SnapshotNode<K>>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot<K> {
    pub variant: Variant,
    pub root: Option<Box<SnapshotNode<K>>>,
}

/// Copies the subtree rooted at `root` out of `arena`.
pub fn snapshot<K, N>(arena: &Arena<N>, root: Option<NodeId>, variant: Variant) -> Snapshot<K>
where
    K: Clone,
    N: Node<K>,
{
    fn copy<K: Clone, N: Node<K>>(
        arena: &Arena<N>,
        node: Option<NodeId>,
    ) -> Option<Box<SnapshotNode<K>>> {
        let n = &arena[node?];
        Some(Box::new(SnapshotNode {
            key: n.key().clone(),
            height: n.height(),
            color: n.color(),
            left: copy(arena, n.l()),
            right: copy(arena, n.r()),
        }))
    }

    Snapshot {
        variant,
        root: copy(arena, root),
    }
}

impl<K> Snapshot<K> {
    pub fn empty(variant: Variant) -> Self {
        Self {
            variant,
            root: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root_key(&self) -> Option<&K> {
        self.root.as_ref().map(|n| &n.key)
    }

    /// Keys in in-order sequence.
    pub fn keys(&self) -> Vec<&K> {
        let mut out = Vec::new();
        let mut stack: Vec<&SnapshotNode<K>> = Vec::new();
        let mut curr = self.root.as_deref();
        loop {
            while let Some(n) = curr {
                stack.push(n);
                curr = n.left.as_deref();
            }
            let Some(n) = stack.pop() else {
                break;
            };
            out.push(&n.key);
            curr = n.right.as_deref();
        }
        out
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> u32 {
        fn depth<K>(node: Option<&SnapshotNode<K>>) -> u32 {
            match node {
                None => 0,
                Some(n) => 1 + depth(n.left.as_deref()).max(depth(n.right.as_deref())),
            }
        }
        depth(self.root.as_deref())
    }
}

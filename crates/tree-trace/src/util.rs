//! Traversal helpers shared by all node variants.
//!
//! These only follow `l` / `r` links, so they work for every [`Node`]
//! implementation regardless of whether it keeps a parent link.

use crate::action::{OperationTag, Payload, TraceBuilder};
use crate::arena::Arena;
use crate::error::TreeError;
use crate::types::{Key, Node, NodeId};

/// Exact-match lookup. Equal keys are routed right, matching insertion.
pub fn find<K: Ord, N: Node<K>>(arena: &Arena<N>, root: Option<NodeId>, key: &K) -> Option<NodeId> {
    let mut curr = root;
    while let Some(i) = curr {
        let k = arena[i].key();
        if key == k {
            return Some(i);
        }
        curr = if key < k { arena[i].l() } else { arena[i].r() };
    }
    None
}

/// Leftmost node of a subtree.
pub fn first<K, N: Node<K>>(arena: &Arena<N>, root: Option<NodeId>) -> Option<NodeId> {
    let mut curr = root?;
    while let Some(l) = arena[curr].l() {
        curr = l;
    }
    Some(curr)
}

/// Number of nodes on the longest downward path, `0` for an empty subtree.
pub fn height<K, N: Node<K>>(arena: &Arena<N>, node: Option<NodeId>) -> u32 {
    match node {
        None => 0,
        Some(i) => 1 + height(arena, arena[i].l()).max(height(arena, arena[i].r())),
    }
}

/// Visits nodes in key order.
pub fn for_each<K, N, F>(arena: &Arena<N>, root: Option<NodeId>, mut f: F)
where
    N: Node<K>,
    F: FnMut(NodeId, &N),
{
    let mut stack = Vec::new();
    let mut curr = root;
    loop {
        while let Some(i) = curr {
            stack.push(i);
            curr = arena[i].l();
        }
        let Some(i) = stack.pop() else {
            return;
        };
        f(i, &arena[i]);
        curr = arena[i].r();
    }
}

pub fn keys<K: Clone, N: Node<K>>(arena: &Arena<N>, root: Option<NodeId>) -> Vec<K> {
    let mut out = Vec::new();
    for_each(arena, root, |_, n| out.push(n.key().clone()));
    out
}

/// Checks the search-tree ordering: in-order keys never decrease.
pub fn assert_bst_order<K: Ord + std::fmt::Debug, N: Node<K>>(
    arena: &Arena<N>,
    root: Option<NodeId>,
) -> Result<(), String> {
    let mut prev: Option<NodeId> = None;
    let mut err = None;
    for_each(arena, root, |i, n| {
        if err.is_some() {
            return;
        }
        if let Some(p) = prev {
            if arena[p].key() > n.key() {
                err = Some(format!(
                    "Node order violated: {:?} before {:?}",
                    arena[p].key(),
                    n.key()
                ));
            }
        }
        prev = Some(i);
    });
    err.map_or(Ok(()), Err)
}

/// Walks from `node` to its in-order successor (leftmost node of the right
/// subtree), emitting one descend action per step.
pub(crate) fn trace_successor<K, N>(
    arena: &Arena<N>,
    node: NodeId,
    trace: &mut TraceBuilder<K>,
) -> Result<NodeId, TreeError>
where
    K: Key,
    N: Node<K>,
{
    let target = arena[node].key().clone();
    let mut curr = arena[node]
        .r()
        .ok_or(TreeError::Invariant("successor search without a right subtree"))?;
    trace.emit(
        OperationTag::DescendRight,
        Payload::Step {
            key: target.clone(),
            at: target.clone(),
        },
    );
    while let Some(l) = arena[curr].l() {
        trace.emit(
            OperationTag::DescendLeft,
            Payload::Step {
                key: target.clone(),
                at: arena[curr].key().clone(),
            },
        );
        curr = l;
    }
    Ok(curr)
}

use tracing::debug;

use crate::action::{OperationTag, Payload, Trace, TraceBuilder};
use crate::arena::Arena;
use crate::config::TraceConfig;
use crate::error::TreeError;
use crate::pending::PendingRecord;
use crate::snapshot::{snapshot, Snapshot};
use crate::tree::{TraceEngine, TreeOps};
use crate::types::{Key, NodeId, Variant};
use crate::util;

use super::types::AvlNode;
use super::util::{assert_avl_tree, balance, height, rotate_left, rotate_right, update_height};

/// New subtree root plus the structural change its caller must finalize.
type Step<K> = (NodeId, Option<PendingRecord<K>>);

/// AVL tree that traces descents, balance checks and rotations.
///
/// Each recursive step returns the (possibly rotated) subtree root; the
/// caller relinks it and finalizes any pending rotation with a snapshot.
#[derive(Clone, Debug)]
pub struct AvlTree<K> {
    arena: Arena<AvlNode<K>>,
    root: Option<NodeId>,
    config: TraceConfig,
}

impl<K: Key> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> AvlTree<K> {
    pub fn new() -> Self {
        Self::with_config(TraceConfig::default())
    }

    pub fn with_config(config: TraceConfig) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            config,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &AvlNode<K> {
        &self.arena[id]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    pub fn find(&self, key: &K) -> Option<NodeId> {
        util::find(&self.arena, self.root, key)
    }

    pub fn keys(&self) -> Vec<K> {
        util::keys(&self.arena, self.root)
    }

    pub fn snapshot(&self) -> Snapshot<K> {
        snapshot(&self.arena, self.root, Variant::Avl)
    }

    pub fn insert(&mut self, key: K) -> Result<Trace<K>, TreeError> {
        debug!(variant = "avl", key = ?key, "insert");
        let Some(root) = self.root else {
            self.root = Some(self.arena.alloc(AvlNode::new(key.clone())));
            return Ok(TraceBuilder::created(&self.config, key, self.snapshot()));
        };
        if self.find(&key).is_some() {
            return Err(TreeError::duplicate(&key));
        }

        let mut trace = TraceBuilder::new(&self.config);
        let (root, pending) = self.insert_at(root, &key, &mut trace)?;
        self.root = Some(root);
        if let Some(pending) = pending {
            self.finalize(pending.under(None), &mut trace);
        }
        let trace = trace.finish(format!("Inserted {key:?}"));
        debug!(actions = trace.len(), "insert complete");
        Ok(trace)
    }

    fn insert_at(
        &mut self,
        at: NodeId,
        key: &K,
        trace: &mut TraceBuilder<K>,
    ) -> Result<Step<K>, TreeError> {
        let at_key = self.arena[at].k.clone();
        let left = *key < at_key;
        let child = if left {
            self.arena[at].l
        } else {
            self.arena[at].r
        };
        match child {
            Some(child) => {
                let tag = if left {
                    OperationTag::DescendLeft
                } else {
                    OperationTag::DescendRight
                };
                trace.emit(
                    tag,
                    Payload::Step {
                        key: key.clone(),
                        at: at_key.clone(),
                    },
                );
                let (sub, pending) = self.insert_at(child, key, trace)?;
                if left {
                    self.arena[at].l = Some(sub);
                } else {
                    self.arena[at].r = Some(sub);
                }
                if let Some(pending) = pending {
                    self.finalize(pending.under(Some(at_key)), trace);
                }
            }
            None => {
                let id = self.arena.alloc(AvlNode::new(key.clone()));
                let tag = if left {
                    self.arena[at].l = Some(id);
                    OperationTag::AppendLeft
                } else {
                    self.arena[at].r = Some(id);
                    OperationTag::AppendRight
                };
                trace.emit(
                    tag,
                    Payload::Step {
                        key: key.clone(),
                        at: at_key,
                    },
                );
            }
        }
        self.rebalance(at, Some(key), trace)
    }

    /// Removes `key`. The key must be present.
    pub fn delete(&mut self, key: &K) -> Result<Trace<K>, TreeError> {
        debug!(variant = "avl", key = ?key, "delete");
        let root = match (self.root, self.find(key)) {
            (Some(root), Some(_)) => root,
            _ => return Err(TreeError::not_found(key)),
        };

        let mut trace = TraceBuilder::new(&self.config);
        let (root, pending) = self.delete_at(root, key, &mut trace)?;
        self.root = root;
        if let Some(pending) = pending {
            self.finalize(pending.under(None), &mut trace);
        }
        let trace = trace.finish(format!("Deleted {key:?}"));
        debug!(actions = trace.len(), "delete complete");
        Ok(trace)
    }

    fn delete_at(
        &mut self,
        at: NodeId,
        key: &K,
        trace: &mut TraceBuilder<K>,
    ) -> Result<(Option<NodeId>, Option<PendingRecord<K>>), TreeError> {
        let at_key = self.arena[at].k.clone();
        if *key < at_key {
            let l = self.arena[at]
                .l
                .ok_or(TreeError::Invariant("descended into an empty left subtree"))?;
            trace.emit(
                OperationTag::DescendLeft,
                Payload::Step {
                    key: key.clone(),
                    at: at_key.clone(),
                },
            );
            let (child, pending) = self.delete_at(l, key, trace)?;
            self.arena[at].l = child;
            if let Some(pending) = pending {
                self.finalize(pending.under(Some(at_key)), trace);
            }
        } else if *key > at_key {
            let r = self.arena[at]
                .r
                .ok_or(TreeError::Invariant("descended into an empty right subtree"))?;
            trace.emit(
                OperationTag::DescendRight,
                Payload::Step {
                    key: key.clone(),
                    at: at_key.clone(),
                },
            );
            let (child, pending) = self.delete_at(r, key, trace)?;
            self.arena[at].r = child;
            if let Some(pending) = pending {
                self.finalize(pending.under(Some(at_key)), trace);
            }
        } else {
            match (self.arena[at].l, self.arena[at].r) {
                (Some(_), Some(r)) => {
                    trace.emit(
                        OperationTag::MatchForSuccessor,
                        Payload::Key {
                            key: at_key.clone(),
                        },
                    );
                    let successor = util::trace_successor(&self.arena, at, trace)?;
                    let successor_key = self.arena[successor].k.clone();
                    trace.emit(
                        OperationTag::SwapValues,
                        Payload::Swap {
                            target: at_key,
                            successor: successor_key.clone(),
                        },
                    );
                    self.arena[at].k = successor_key.clone();
                    let (child, pending) = self.delete_at(r, &successor_key, trace)?;
                    self.arena[at].r = child;
                    if let Some(pending) = pending {
                        self.finalize(pending.under(Some(successor_key)), trace);
                    }
                }
                (l, r) => {
                    let replacement = l.or(r);
                    trace.emit(
                        OperationTag::MatchForDelete,
                        Payload::Splice {
                            key: at_key.clone(),
                            replacement: replacement.map(|i| self.arena[i].k.clone()),
                        },
                    );
                    self.arena.release(at);
                    return Ok((
                        replacement,
                        Some(PendingRecord::DeleteShape { removed: at_key }),
                    ));
                }
            }
        }

        let (top, pending) = self.rebalance(at, None, trace)?;
        Ok((Some(top), pending))
    }

    /// Refreshes the cached height of `at`, reports its balance and rotates
    /// when it is out of range. `inserted` picks the single/double rotation
    /// case on insert; on delete the child's own balance decides.
    fn rebalance(
        &mut self,
        at: NodeId,
        inserted: Option<&K>,
        trace: &mut TraceBuilder<K>,
    ) -> Result<Step<K>, TreeError> {
        update_height(&mut self.arena, at);
        let bf = balance(&self.arena, at);
        let at_key = self.arena[at].k.clone();
        let payload = Payload::Balance {
            key: at_key.clone(),
            balance: bf,
            height: self.arena[at].h,
        };
        if (-1..=1).contains(&bf) {
            trace.emit(OperationTag::BalanceOk, payload);
            return Ok((at, None));
        }
        trace.emit(OperationTag::BalanceViolation, payload);

        if bf > 1 {
            let l = self.arena[at]
                .l
                .ok_or(TreeError::Invariant("left-heavy node without a left child"))?;
            let outer = match inserted {
                Some(key) => *key < self.arena[l].k,
                None => balance(&self.arena, l) >= 0,
            };
            if !outer {
                let (sub, record) = rotate_left(&mut self.arena, l)?;
                self.arena[at].l = Some(sub);
                self.finalize(
                    PendingRecord::Rotation(record).under(Some(at_key)),
                    trace,
                );
            }
            let (top, record) = rotate_right(&mut self.arena, at)?;
            Ok((top, Some(PendingRecord::Rotation(record))))
        } else {
            let r = self.arena[at]
                .r
                .ok_or(TreeError::Invariant("right-heavy node without a right child"))?;
            let outer = match inserted {
                Some(key) => *key >= self.arena[r].k,
                None => balance(&self.arena, r) <= 0,
            };
            if !outer {
                let (sub, record) = rotate_right(&mut self.arena, r)?;
                self.arena[at].r = Some(sub);
                self.finalize(
                    PendingRecord::Rotation(record).under(Some(at_key)),
                    trace,
                );
            }
            let (top, record) = rotate_left(&mut self.arena, at)?;
            Ok((top, Some(PendingRecord::Rotation(record))))
        }
    }

    fn finalize(&self, pending: PendingRecord<K>, trace: &mut TraceBuilder<K>) {
        trace.finalize(pending, || self.snapshot());
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        assert_avl_tree(&self.arena, self.root)
    }
}

impl<K: Key> TreeOps<K> for AvlTree<K> {
    fn height(&self, subtree: Option<NodeId>) -> u32 {
        height(&self.arena, subtree)
    }

    fn minimum(&self, subtree: Option<NodeId>) -> Option<K> {
        util::first(&self.arena, subtree).map(|i| self.arena[i].k.clone())
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        AvlTree::find(self, key)
    }
}

impl<K: Key> TraceEngine<K> for AvlTree<K> {
    fn variant(&self) -> Variant {
        Variant::Avl
    }

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn insert(&mut self, key: K) -> Result<Trace<K>, TreeError> {
        AvlTree::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> Result<Trace<K>, TreeError> {
        AvlTree::delete(self, key)
    }

    fn snapshot(&self) -> Snapshot<K> {
        AvlTree::snapshot(self)
    }

    fn keys(&self) -> Vec<K> {
        AvlTree::keys(self)
    }

    fn len(&self) -> usize {
        AvlTree::len(self)
    }

    fn clear(&mut self) {
        AvlTree::clear(self)
    }

    fn assert_valid(&self) -> Result<(), String> {
        AvlTree::assert_valid(self)
    }
}

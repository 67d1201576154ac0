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

use super::types::BstNode;

type DeleteStep<K> = (Option<NodeId>, Option<PendingRecord<K>>);

/// Unbalanced binary search tree that traces every descent and splice.
#[derive(Clone, Debug)]
pub struct BstTree<K> {
    arena: Arena<BstNode<K>>,
    root: Option<NodeId>,
    config: TraceConfig,
}

impl<K: Key> Default for BstTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> BstTree<K> {
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

    pub fn node(&self, id: NodeId) -> &BstNode<K> {
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
        snapshot(&self.arena, self.root, Variant::Bst)
    }

    pub fn insert(&mut self, key: K) -> Result<Trace<K>, TreeError> {
        debug!(variant = "bst", key = ?key, "insert");
        let Some(root) = self.root else {
            self.root = Some(self.arena.alloc(BstNode::new(key.clone())));
            return Ok(TraceBuilder::created(&self.config, key, self.snapshot()));
        };
        if self.find(&key).is_some() {
            return Err(TreeError::duplicate(&key));
        }

        let mut trace = TraceBuilder::new(&self.config);
        self.insert_at(root, key.clone(), &mut trace);
        let trace = trace.finish(format!("Inserted {key:?}"));
        debug!(actions = trace.len(), "insert complete");
        Ok(trace)
    }

    fn insert_at(&mut self, at: NodeId, key: K, trace: &mut TraceBuilder<K>) {
        let at_key = self.arena[at].k.clone();
        let left = key < at_key;
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
                        at: at_key,
                    },
                );
                self.insert_at(child, key, trace);
            }
            None => {
                let id = self.arena.alloc(BstNode::new(key.clone()));
                let tag = if left {
                    self.arena[at].l = Some(id);
                    OperationTag::AppendLeft
                } else {
                    self.arena[at].r = Some(id);
                    OperationTag::AppendRight
                };
                trace.emit(tag, Payload::Step { key, at: at_key });
            }
        }
    }

    /// Removes `key`. The key must be present.
    pub fn delete(&mut self, key: &K) -> Result<Trace<K>, TreeError> {
        debug!(variant = "bst", key = ?key, "delete");
        let root = match (self.root, self.find(key)) {
            (Some(root), Some(_)) => root,
            _ => return Err(TreeError::not_found(key)),
        };

        let mut trace = TraceBuilder::new(&self.config);
        let (root, pending) = self.delete_at(root, key, &mut trace)?;
        self.root = root;
        if let Some(pending) = pending {
            self.finalize(pending, &mut trace);
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
    ) -> Result<DeleteStep<K>, TreeError> {
        let at_key = self.arena[at].k.clone();
        if *key < at_key {
            let l = self.arena[at]
                .l
                .ok_or(TreeError::Invariant("descended into an empty left subtree"))?;
            trace.emit(
                OperationTag::DescendLeft,
                Payload::Step {
                    key: key.clone(),
                    at: at_key,
                },
            );
            let (child, pending) = self.delete_at(l, key, trace)?;
            self.arena[at].l = child;
            if let Some(pending) = pending {
                self.finalize(pending, trace);
            }
            return Ok((Some(at), None));
        }
        if *key > at_key {
            let r = self.arena[at]
                .r
                .ok_or(TreeError::Invariant("descended into an empty right subtree"))?;
            trace.emit(
                OperationTag::DescendRight,
                Payload::Step {
                    key: key.clone(),
                    at: at_key,
                },
            );
            let (child, pending) = self.delete_at(r, key, trace)?;
            self.arena[at].r = child;
            if let Some(pending) = pending {
                self.finalize(pending, trace);
            }
            return Ok((Some(at), None));
        }

        match (self.arena[at].l, self.arena[at].r) {
            (Some(_), Some(r)) => {
                trace.emit(OperationTag::MatchForSuccessor, Payload::Key { key: at_key.clone() });
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
                    self.finalize(pending, trace);
                }
                Ok((Some(at), None))
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
                Ok((replacement, Some(PendingRecord::DeleteShape { removed: at_key })))
            }
        }
    }

    fn finalize(&self, pending: PendingRecord<K>, trace: &mut TraceBuilder<K>) {
        trace.finalize(pending, || self.snapshot());
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        util::assert_bst_order(&self.arena, self.root)?;
        let mut count = 0;
        util::for_each(&self.arena, self.root, |_, _| count += 1);
        if count != self.arena.len() {
            return Err(format!(
                "Arena holds {} live nodes, tree reaches {count}",
                self.arena.len()
            ));
        }
        Ok(())
    }
}

impl<K: Key> TreeOps<K> for BstTree<K> {
    fn height(&self, subtree: Option<NodeId>) -> u32 {
        util::height(&self.arena, subtree)
    }

    fn minimum(&self, subtree: Option<NodeId>) -> Option<K> {
        util::first(&self.arena, subtree).map(|i| self.arena[i].k.clone())
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        BstTree::find(self, key)
    }
}

impl<K: Key> TraceEngine<K> for BstTree<K> {
    fn variant(&self) -> Variant {
        Variant::Bst
    }

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn insert(&mut self, key: K) -> Result<Trace<K>, TreeError> {
        BstTree::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> Result<Trace<K>, TreeError> {
        BstTree::delete(self, key)
    }

    fn snapshot(&self) -> Snapshot<K> {
        BstTree::snapshot(self)
    }

    fn keys(&self) -> Vec<K> {
        BstTree::keys(self)
    }

    fn len(&self) -> usize {
        BstTree::len(self)
    }

    fn clear(&mut self) {
        BstTree::clear(self)
    }

    fn assert_valid(&self) -> Result<(), String> {
        BstTree::assert_valid(self)
    }
}

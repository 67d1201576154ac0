use tracing::debug;

use crate::action::{ColorChange, OperationTag, Payload, Trace, TraceBuilder};
use crate::arena::Arena;
use crate::config::TraceConfig;
use crate::error::TreeError;
use crate::pending::{Direction, PendingRecord, RotationRecord};
use crate::snapshot::{snapshot, Snapshot};
use crate::tree::{TraceEngine, TreeOps};
use crate::types::{Color, Key, NodeId, Variant};
use crate::util;

use super::types::RbNode;
use super::util::{assert_red_black_tree, is_black};

/// Red-black tree that traces descents, fixup cases, recolors and rotations.
///
/// Rotations relink parent pointers in place (and replace `root` when they
/// happen at the top), so every rotation is finalized with a snapshot by the
/// fixup step that requested it.
#[derive(Clone, Debug)]
pub struct RbTree<K> {
    arena: Arena<RbNode<K>>,
    root: Option<NodeId>,
    config: TraceConfig,
}

impl<K: Key> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> RbTree<K> {
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

    pub fn node(&self, id: NodeId) -> &RbNode<K> {
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

    /// Parent-free copy of the tree.
    pub fn snapshot(&self) -> Snapshot<K> {
        snapshot(&self.arena, self.root, Variant::RedBlack)
    }

    /// Inserts `key` as a red leaf and repairs the coloring. Equal keys are
    /// accepted and routed right.
    pub fn insert(&mut self, key: K) -> Result<Trace<K>, TreeError> {
        debug!(variant = "red-black", key = ?key, "insert");
        let Some(root) = self.root else {
            let mut node = RbNode::new(key.clone());
            node.b = true;
            self.root = Some(self.arena.alloc(node));
            return Ok(TraceBuilder::created(&self.config, key, self.snapshot()));
        };

        let mut trace = TraceBuilder::new(&self.config);
        let mut curr = root;
        let n = loop {
            let curr_key = self.arena[curr].k.clone();
            let left = key < curr_key;
            let next = if left {
                self.arena[curr].l
            } else {
                self.arena[curr].r
            };
            if let Some(next) = next {
                let tag = if left {
                    OperationTag::DescendLeft
                } else {
                    OperationTag::DescendRight
                };
                trace.emit(
                    tag,
                    Payload::Step {
                        key: key.clone(),
                        at: curr_key,
                    },
                );
                curr = next;
                continue;
            }

            let mut node = RbNode::new(key.clone());
            node.p = Some(curr);
            let id = self.arena.alloc(node);
            let tag = if left {
                self.arena[curr].l = Some(id);
                OperationTag::AppendLeft
            } else {
                self.arena[curr].r = Some(id);
                OperationTag::AppendRight
            };
            trace.emit(
                tag,
                Payload::Step {
                    key: key.clone(),
                    at: curr_key,
                },
            );
            break id;
        };

        self.fix_insert(n, &mut trace)?;
        let trace = trace.finish(format!("Inserted {key:?}"));
        debug!(actions = trace.len(), "insert complete");
        Ok(trace)
    }

    fn fix_insert(&mut self, mut n: NodeId, trace: &mut TraceBuilder<K>) -> Result<(), TreeError> {
        trace.emit(
            OperationTag::BeginFixup,
            Payload::Key {
                key: self.key_of(n),
            },
        );
        while let Some(p) = self.arena[n].p {
            if self.arena[p].b {
                trace.emit(
                    OperationTag::ParentBlackTerminal,
                    Payload::Position {
                        key: self.key_of(n),
                        parent: Some(self.key_of(p)),
                    },
                );
                break;
            }
            let Some(g) = self.arena[p].p else {
                let change = self.paint(p, true);
                trace.emit(
                    OperationTag::RootRecolorTerminal,
                    Payload::Recolor {
                        changes: vec![change],
                    },
                );
                break;
            };

            let parent_is_left = self.arena[g].l == Some(p);
            let uncle = if parent_is_left {
                self.arena[g].r
            } else {
                self.arena[g].l
            };
            if let Some(u) = uncle.filter(|&u| !self.arena[u].b) {
                let changes = vec![self.paint(p, true), self.paint(u, true), self.paint(g, false)];
                trace.emit(OperationTag::RecolorGrandparentCase, Payload::Recolor { changes });
                trace.emit(
                    OperationTag::AdvanceFixupPointer,
                    Payload::Move {
                        from: Some(self.key_of(n)),
                        to: self.key_of(g),
                    },
                );
                n = g;
                continue;
            }

            // Zig-zag: turn the inner grandchild into an outer one first.
            let mut top = p;
            let inner = if parent_is_left {
                self.arena[p].r == Some(n)
            } else {
                self.arena[p].l == Some(n)
            };
            if inner {
                let direction = if parent_is_left {
                    Direction::Left
                } else {
                    Direction::Right
                };
                self.rotate(p, direction, trace)?;
                trace.emit(
                    OperationTag::FormerPositionNote,
                    Payload::Position {
                        key: self.key_of(p),
                        parent: Some(self.key_of(n)),
                    },
                );
                top = n;
            }

            let changes = vec![self.paint(top, true), self.paint(g, false)];
            trace.emit(OperationTag::RecolorSiblingRotateCase, Payload::Recolor { changes });
            let direction = if parent_is_left {
                Direction::Right
            } else {
                Direction::Left
            };
            self.rotate(g, direction, trace)?;
            break;
        }
        self.blacken_root(trace);
        Ok(())
    }

    /// Removes one node holding `key`. The key must be present.
    pub fn delete(&mut self, key: &K) -> Result<Trace<K>, TreeError> {
        debug!(variant = "red-black", key = ?key, "delete");
        let root = match (self.root, self.find(key)) {
            (Some(root), Some(_)) => root,
            _ => return Err(TreeError::not_found(key)),
        };

        let mut trace = TraceBuilder::new(&self.config);
        let mut target = self.locate(root, key, &mut trace)?;
        loop {
            let (Some(_), Some(r)) = (self.arena[target].l, self.arena[target].r) else {
                break;
            };
            let target_key = self.key_of(target);
            trace.emit(
                OperationTag::MatchForSuccessor,
                Payload::Key {
                    key: target_key.clone(),
                },
            );
            let successor = util::trace_successor(&self.arena, target, &mut trace)?;
            let successor_key = self.key_of(successor);
            trace.emit(
                OperationTag::SwapValues,
                Payload::Swap {
                    target: target_key,
                    successor: successor_key.clone(),
                },
            );
            self.arena[target].k = successor_key.clone();
            target = self.locate(r, &successor_key, &mut trace)?;
        }
        self.remove(target, &mut trace)?;

        let trace = trace.finish(format!("Deleted {key:?}"));
        debug!(actions = trace.len(), "delete complete");
        Ok(trace)
    }

    /// Descends from `start` to the first node equal to `key`.
    fn locate(
        &self,
        start: NodeId,
        key: &K,
        trace: &mut TraceBuilder<K>,
    ) -> Result<NodeId, TreeError> {
        let mut curr = start;
        loop {
            let curr_key = self.key_of(curr);
            if *key == curr_key {
                return Ok(curr);
            }
            let left = *key < curr_key;
            let (next, tag) = if left {
                (self.arena[curr].l, OperationTag::DescendLeft)
            } else {
                (self.arena[curr].r, OperationTag::DescendRight)
            };
            let next = next.ok_or(TreeError::Invariant("key vanished during descent"))?;
            trace.emit(
                tag,
                Payload::Step {
                    key: key.clone(),
                    at: curr_key,
                },
            );
            curr = next;
        }
    }

    /// Splices out a node with at most one child and repairs the coloring.
    fn remove(&mut self, target: NodeId, trace: &mut TraceBuilder<K>) -> Result<(), TreeError> {
        let removed = self.key_of(target);
        let removed_black = self.arena[target].b;
        let child = self.arena[target].l.or(self.arena[target].r);
        let parent = self.arena[target].p;

        trace.emit(
            OperationTag::MatchForDelete,
            Payload::Splice {
                key: removed.clone(),
                replacement: child.map(|c| self.key_of(c)),
            },
        );

        if let Some(c) = child {
            self.arena[c].p = parent;
        }
        match parent {
            None => self.root = child,
            Some(p) => {
                if self.arena[p].l == Some(target) {
                    self.arena[p].l = child;
                } else {
                    self.arena[p].r = child;
                }
            }
        }
        self.arena.release(target);
        self.finalize(
            PendingRecord::DeleteShape {
                removed: removed.clone(),
            },
            trace,
        );

        if !removed_black {
            trace.emit(OperationTag::NoViolation, Payload::Key { key: removed });
        } else if let Some(c) = child.filter(|&c| !self.arena[c].b) {
            let change = self.paint(c, true);
            trace.emit(
                OperationTag::RecolorNode,
                Payload::Recolor {
                    changes: vec![change],
                },
            );
        } else if let Some(p) = parent {
            trace.emit(
                OperationTag::FormerPositionNote,
                Payload::Position {
                    key: removed,
                    parent: Some(self.key_of(p)),
                },
            );
            self.delete_fix(p, child, trace)?;
        }
        self.blacken_root(trace);
        Ok(())
    }

    /// Resolves a double-black defect at `node` (possibly an empty slot)
    /// under `parent`.
    fn delete_fix(
        &mut self,
        mut parent: NodeId,
        mut node: Option<NodeId>,
        trace: &mut TraceBuilder<K>,
    ) -> Result<(), TreeError> {
        trace.emit(
            OperationTag::BeginFixup,
            Payload::Key {
                key: self.key_of(parent),
            },
        );
        while node != self.root && is_black(&self.arena, node) {
            let node_is_left = self.arena[parent].l == node;
            let toward = if node_is_left {
                Direction::Left
            } else {
                Direction::Right
            };
            let away = if node_is_left {
                Direction::Right
            } else {
                Direction::Left
            };

            let mut sibling = self.sibling(parent, node_is_left)?;
            if !self.arena[sibling].b {
                let changes = vec![self.paint(sibling, true), self.paint(parent, false)];
                trace.emit(OperationTag::SiblingRecolor, Payload::Recolor { changes });
                self.rotate(parent, toward, trace)?;
                sibling = self.sibling(parent, node_is_left)?;
            }

            let (near, far) = self.nephews(sibling, node_is_left);
            if is_black(&self.arena, near) && is_black(&self.arena, far) {
                let change = self.paint(sibling, false);
                trace.emit(
                    OperationTag::SiblingRecolor,
                    Payload::Recolor {
                        changes: vec![change],
                    },
                );
                trace.emit(
                    OperationTag::AdvanceFixupPointer,
                    Payload::Move {
                        from: node.map(|n| self.key_of(n)),
                        to: self.key_of(parent),
                    },
                );
                node = Some(parent);
                match self.arena[parent].p {
                    Some(p) => parent = p,
                    None => break,
                }
                continue;
            }

            if is_black(&self.arena, far) {
                let near = near.ok_or(TreeError::Invariant("red nephew missing"))?;
                let changes = vec![self.paint(near, true), self.paint(sibling, false)];
                trace.emit(OperationTag::DoubleBlackRecolorRotate, Payload::Recolor { changes });
                self.rotate(sibling, away, trace)?;
                sibling = self.sibling(parent, node_is_left)?;
            }

            let (_, far) = self.nephews(sibling, node_is_left);
            let far = far.ok_or(TreeError::Invariant("far nephew missing"))?;
            let parent_black = self.arena[parent].b;
            let changes = vec![
                self.paint(sibling, parent_black),
                self.paint(parent, true),
                self.paint(far, true),
            ];
            trace.emit(OperationTag::DoubleBlackRecolorRotate, Payload::Recolor { changes });
            self.rotate(parent, toward, trace)?;
            node = self.root;
            break;
        }

        if let Some(n) = node.filter(|&n| !self.arena[n].b) {
            let change = self.paint(n, true);
            trace.emit(
                OperationTag::FinalBlacken,
                Payload::Recolor {
                    changes: vec![change],
                },
            );
        }
        Ok(())
    }

    fn sibling(&self, parent: NodeId, node_is_left: bool) -> Result<NodeId, TreeError> {
        let sibling = if node_is_left {
            self.arena[parent].r
        } else {
            self.arena[parent].l
        };
        sibling.ok_or(TreeError::Invariant("double-black node without a sibling"))
    }

    /// `(near, far)` children of `sibling` relative to the defect side.
    fn nephews(&self, sibling: NodeId, node_is_left: bool) -> (Option<NodeId>, Option<NodeId>) {
        let s = &self.arena[sibling];
        if node_is_left {
            (s.l, s.r)
        } else {
            (s.r, s.l)
        }
    }

    fn blacken_root(&mut self, trace: &mut TraceBuilder<K>) {
        let Some(root) = self.root.filter(|&r| !self.arena[r].b) else {
            return;
        };
        let change = self.paint(root, true);
        trace.emit(
            OperationTag::FinalBlacken,
            Payload::Recolor {
                changes: vec![change],
            },
        );
    }

    /// Rotates `n` down toward `direction` and finalizes the rotation.
    fn rotate(
        &mut self,
        n: NodeId,
        direction: Direction,
        trace: &mut TraceBuilder<K>,
    ) -> Result<(), TreeError> {
        let record = match direction {
            Direction::Left => self.rotate_left(n)?,
            Direction::Right => self.rotate_right(n)?,
        };
        self.finalize(PendingRecord::Rotation(record), trace);
        Ok(())
    }

    fn rotate_left(&mut self, n: NodeId) -> Result<RotationRecord<K>, TreeError> {
        let nr = self.arena[n]
            .r
            .ok_or(TreeError::Invariant("left rotation without a right child"))?;
        let p = self.arena[n].p;
        let nrl = self.arena[nr].l;

        self.arena[n].r = nrl;
        if let Some(nrl) = nrl {
            self.arena[nrl].p = Some(n);
        }
        self.relink_parent(p, n, nr);
        self.arena[nr].l = Some(n);
        self.arena[n].p = Some(nr);

        let mut record = RotationRecord::new(
            Direction::Left,
            self.key_of(n),
            self.key_of(nr),
            nrl.map(|i| self.key_of(i)),
        );
        record.parent = p.map(|i| self.key_of(i));
        Ok(record)
    }

    fn rotate_right(&mut self, n: NodeId) -> Result<RotationRecord<K>, TreeError> {
        let nl = self.arena[n]
            .l
            .ok_or(TreeError::Invariant("right rotation without a left child"))?;
        let p = self.arena[n].p;
        let nlr = self.arena[nl].r;

        self.arena[n].l = nlr;
        if let Some(nlr) = nlr {
            self.arena[nlr].p = Some(n);
        }
        self.relink_parent(p, n, nl);
        self.arena[nl].r = Some(n);
        self.arena[n].p = Some(nl);

        let mut record = RotationRecord::new(
            Direction::Right,
            self.key_of(n),
            self.key_of(nl),
            nlr.map(|i| self.key_of(i)),
        );
        record.parent = p.map(|i| self.key_of(i));
        Ok(record)
    }

    /// Points `p`'s slot (or the tree root) that held `old` at `new`.
    fn relink_parent(&mut self, p: Option<NodeId>, old: NodeId, new: NodeId) {
        self.arena[new].p = p;
        match p {
            None => self.root = Some(new),
            Some(p) => {
                if self.arena[p].l == Some(old) {
                    self.arena[p].l = Some(new);
                } else {
                    self.arena[p].r = Some(new);
                }
            }
        }
    }

    fn paint(&mut self, i: NodeId, black: bool) -> ColorChange<K> {
        let from = Color::from_black(self.arena[i].b);
        self.arena[i].b = black;
        ColorChange {
            key: self.key_of(i),
            from,
            to: Color::from_black(black),
        }
    }

    #[inline]
    fn key_of(&self, i: NodeId) -> K {
        self.arena[i].k.clone()
    }

    fn finalize(&self, pending: PendingRecord<K>, trace: &mut TraceBuilder<K>) {
        trace.finalize(pending, || self.snapshot());
    }

    pub fn assert_valid(&self) -> Result<(), String> {
        assert_red_black_tree(&self.arena, self.root)
    }
}

impl<K: Key> TreeOps<K> for RbTree<K> {
    fn height(&self, subtree: Option<NodeId>) -> u32 {
        util::height(&self.arena, subtree)
    }

    fn minimum(&self, subtree: Option<NodeId>) -> Option<K> {
        util::first(&self.arena, subtree).map(|i| self.key_of(i))
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        RbTree::find(self, key)
    }
}

impl<K: Key> TraceEngine<K> for RbTree<K> {
    fn variant(&self) -> Variant {
        Variant::RedBlack
    }

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn insert(&mut self, key: K) -> Result<Trace<K>, TreeError> {
        RbTree::insert(self, key)
    }

    fn delete(&mut self, key: &K) -> Result<Trace<K>, TreeError> {
        RbTree::delete(self, key)
    }

    fn snapshot(&self) -> Snapshot<K> {
        RbTree::snapshot(self)
    }

    fn keys(&self) -> Vec<K> {
        RbTree::keys(self)
    }

    fn len(&self) -> usize {
        RbTree::len(self)
    }

    fn clear(&mut self) {
        RbTree::clear(self)
    }

    fn assert_valid(&self) -> Result<(), String> {
        RbTree::assert_valid(self)
    }
}

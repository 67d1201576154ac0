//! Action trace vocabulary and assembly.
//!
//! An [`Action`] is an [`OperationTag`] plus a [`Payload`] whose shape is
//! fixed per tag (see [`OperationTag::payload_kind`]). Engines push actions
//! into a [`TraceBuilder`] as decisions are made; rotations and delete
//! re-shapes arrive as [`PendingRecord`]s and are finalized with a snapshot
//! by the frame that relinked them. [`TraceBuilder::finish`] seals the list,
//! appends the end-of-sequence summary and yields the replay-ordered
//! [`Trace`].

use serde::{Deserialize, Serialize};

use crate::config::TraceConfig;
use crate::pending::{Direction, PendingRecord, RotationRecord};
use crate::snapshot::Snapshot;
use crate::types::{Color, Key};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationTag {
    AppendLeft,
    AppendRight,
    DescendLeft,
    DescendRight,
    Resize,
    MatchForSuccessor,
    SwapValues,
    MatchForDelete,
    BalanceOk,
    BalanceViolation,
    RotateLeft,
    RotateRight,
    BeginFixup,
    RootRecolorTerminal,
    ParentBlackTerminal,
    RecolorGrandparentCase,
    RecolorSiblingRotateCase,
    AdvanceFixupPointer,
    FormerPositionNote,
    RecolorNode,
    NoViolation,
    SiblingRecolor,
    DoubleBlackRecolorRotate,
    FinalBlacken,
    EndOfSequence,
    CreateNewTree,
}

impl OperationTag {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationTag::AppendLeft => "append-left",
            OperationTag::AppendRight => "append-right",
            OperationTag::DescendLeft => "descend-left",
            OperationTag::DescendRight => "descend-right",
            OperationTag::Resize => "resize",
            OperationTag::MatchForSuccessor => "match-for-successor",
            OperationTag::SwapValues => "swap-values",
            OperationTag::MatchForDelete => "match-for-delete",
            OperationTag::BalanceOk => "balance-ok",
            OperationTag::BalanceViolation => "balance-violation",
            OperationTag::RotateLeft => "rotate-left",
            OperationTag::RotateRight => "rotate-right",
            OperationTag::BeginFixup => "begin-fixup",
            OperationTag::RootRecolorTerminal => "root-recolor-terminal",
            OperationTag::ParentBlackTerminal => "parent-black-terminal",
            OperationTag::RecolorGrandparentCase => "recolor-grandparent-case",
            OperationTag::RecolorSiblingRotateCase => "recolor-sibling-rotate-case",
            OperationTag::AdvanceFixupPointer => "advance-fixup-pointer",
            OperationTag::FormerPositionNote => "former-position-note",
            OperationTag::RecolorNode => "recolor-node",
            OperationTag::NoViolation => "no-violation",
            OperationTag::SiblingRecolor => "sibling-recolor",
            OperationTag::DoubleBlackRecolorRotate => "double-black-recolor-rotate",
            OperationTag::FinalBlacken => "final-blacken",
            OperationTag::EndOfSequence => "end-of-sequence",
            OperationTag::CreateNewTree => "create-new-tree",
        }
    }

    /// Payload shape every action with this tag carries.
    pub fn payload_kind(self) -> &'static str {
        match self {
            OperationTag::AppendLeft
            | OperationTag::AppendRight
            | OperationTag::DescendLeft
            | OperationTag::DescendRight => "step",
            OperationTag::Resize | OperationTag::CreateNewTree => "shape",
            OperationTag::MatchForSuccessor
            | OperationTag::BeginFixup
            | OperationTag::NoViolation => "key",
            OperationTag::SwapValues => "swap",
            OperationTag::MatchForDelete => "splice",
            OperationTag::BalanceOk | OperationTag::BalanceViolation => "balance",
            OperationTag::RotateLeft | OperationTag::RotateRight => "rotation",
            OperationTag::ParentBlackTerminal | OperationTag::FormerPositionNote => "position",
            OperationTag::AdvanceFixupPointer => "move",
            OperationTag::RootRecolorTerminal
            | OperationTag::RecolorGrandparentCase
            | OperationTag::RecolorSiblingRotateCase
            | OperationTag::RecolorNode
            | OperationTag::SiblingRecolor
            | OperationTag::DoubleBlackRecolorRotate
            | OperationTag::FinalBlacken => "recolor",
            OperationTag::EndOfSequence => "message",
        }
    }
}

impl std::fmt::Display for OperationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node changing color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorChange<K> {
    pub key: K,
    pub from: Color,
    pub to: Color,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Payload<K> {
    /// `key` moves past (or is attached under) node `at`.
    Step { key: K, at: K },
    /// `key` together with the tree snapshot after the change.
    Shape { key: K, snapshot: Option<Snapshot<K>> },
    Key { key: K },
    Swap { target: K, successor: K },
    /// `key` is removed and `replacement` takes its slot.
    Splice { key: K, replacement: Option<K> },
    Balance { key: K, balance: i32, height: u32 },
    Rotation {
        record: RotationRecord<K>,
        snapshot: Option<Snapshot<K>>,
    },
    Position { key: K, parent: Option<K> },
    Move { from: Option<K>, to: K },
    Recolor { changes: Vec<ColorChange<K>> },
    Message { text: String },
}

impl<K> Payload<K> {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Step { .. } => "step",
            Payload::Shape { .. } => "shape",
            Payload::Key { .. } => "key",
            Payload::Swap { .. } => "swap",
            Payload::Splice { .. } => "splice",
            Payload::Balance { .. } => "balance",
            Payload::Rotation { .. } => "rotation",
            Payload::Position { .. } => "position",
            Payload::Move { .. } => "move",
            Payload::Recolor { .. } => "recolor",
            Payload::Message { .. } => "message",
        }
    }

    /// Snapshot carried by shape and rotation payloads.
    pub fn snapshot(&self) -> Option<&Snapshot<K>> {
        match self {
            Payload::Shape { snapshot, .. } | Payload::Rotation { snapshot, .. } => {
                snapshot.as_ref()
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action<K> {
    pub tag: OperationTag,
    pub payload: Payload<K>,
}

impl<K> Action<K> {
    pub fn new(tag: OperationTag, payload: Payload<K>) -> Self {
        debug_assert_eq!(
            tag.payload_kind(),
            payload.kind(),
            "payload shape does not match {tag}"
        );
        Self { tag, payload }
    }
}

/// Accumulates the actions of one insert/delete call.
#[derive(Debug)]
pub struct TraceBuilder<K> {
    actions: Vec<Action<K>>,
    snapshots: bool,
    summary: bool,
}

impl<K: Key> TraceBuilder<K> {
    pub fn new(config: &TraceConfig) -> Self {
        Self {
            actions: Vec::new(),
            snapshots: config.snapshots,
            summary: config.summary,
        }
    }

    pub fn emit(&mut self, tag: OperationTag, payload: Payload<K>) {
        tracing::trace!(tag = tag.as_str(), "action");
        self.actions.push(Action::new(tag, payload));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Converts a pending record into its action, once the caller has
    /// relinked the affected subtree. `snapshot` must observe the tree as it
    /// now stands.
    ///
    /// A re-shape that left the tree empty is consumed without an action.
    pub fn finalize<F>(&mut self, pending: PendingRecord<K>, snapshot: F)
    where
        F: FnOnce() -> Snapshot<K>,
    {
        match pending {
            PendingRecord::DeleteShape { removed } => {
                let snap = snapshot();
                if snap.is_empty() {
                    tracing::trace!(key = ?removed, "tree emptied, no re-shape");
                    return;
                }
                let snapshot = self.snapshots.then_some(snap);
                self.emit(
                    OperationTag::Resize,
                    Payload::Shape {
                        key: removed,
                        snapshot,
                    },
                );
            }
            PendingRecord::Rotation(record) => {
                let tag = match record.direction {
                    Direction::Left => OperationTag::RotateLeft,
                    Direction::Right => OperationTag::RotateRight,
                };
                let snapshot = self.snapshots.then(snapshot);
                self.emit(tag, Payload::Rotation { record, snapshot });
            }
        }
    }

    /// Seals the trace. The summary action (when enabled) plays last.
    pub fn finish(mut self, message: impl Into<String>) -> Trace<K> {
        if self.summary {
            self.emit(
                OperationTag::EndOfSequence,
                Payload::Message {
                    text: message.into(),
                },
            );
        }
        Trace {
            actions: self.actions,
        }
    }

    /// Trace for the first insert into an empty tree: a single
    /// create-new-tree action.
    pub fn created(config: &TraceConfig, key: K, snapshot: Snapshot<K>) -> Trace<K> {
        let mut builder = Self::new(config);
        let snapshot = builder.snapshots.then_some(snapshot);
        builder.emit(OperationTag::CreateNewTree, Payload::Shape { key, snapshot });
        Trace {
            actions: builder.actions,
        }
    }
}

/// Replay-ordered actions produced by one insert or delete.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace<K> {
    actions: Vec<Action<K>>,
}

impl<K> Trace<K> {
    pub fn actions(&self) -> &[Action<K>] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<Action<K>> {
        self.actions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action<K>> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn tags(&self) -> Vec<OperationTag> {
        self.actions.iter().map(|a| a.tag).collect()
    }

    pub fn count(&self, tag: OperationTag) -> usize {
        self.actions.iter().filter(|a| a.tag == tag).count()
    }

    pub fn first_of(&self, tag: OperationTag) -> Option<&Action<K>> {
        self.actions.iter().find(|a| a.tag == tag)
    }

    /// Same actions, last first. Used to step a replay backwards.
    pub fn reversed(mut self) -> Self {
        self.actions.reverse();
        self
    }

    /// Text of the end-of-sequence action, if present.
    pub fn summary(&self) -> Option<&str> {
        match self.actions.last().map(|a| &a.payload) {
            Some(Payload::Message { text }) => Some(text),
            _ => None,
        }
    }
}

impl<K: Serialize> Trace<K> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'a, K> IntoIterator for &'a Trace<K> {
    type Item = &'a Action<K>;
    type IntoIter = std::slice::Iter<'a, Action<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variant;

    fn rotation(direction: Direction) -> PendingRecord<i32> {
        PendingRecord::Rotation(RotationRecord::new(direction, 10, 20, None))
    }

    #[test]
    fn finalize_tags_rotation_by_direction() {
        let mut builder = TraceBuilder::new(&TraceConfig::default());
        builder.finalize(rotation(Direction::Left).under(Some(5)), || {
            Snapshot::empty(Variant::Avl)
        });
        builder.finalize(rotation(Direction::Right), || Snapshot::empty(Variant::Avl));
        let trace = builder.finish("done");

        assert_eq!(
            trace.tags(),
            vec![
                OperationTag::RotateLeft,
                OperationTag::RotateRight,
                OperationTag::EndOfSequence
            ]
        );
        match &trace.actions()[0].payload {
            Payload::Rotation { record, snapshot } => {
                assert_eq!(record.parent, Some(5));
                assert!(snapshot.is_some());
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(trace.summary(), Some("done"));
    }

    #[test]
    fn delete_shape_into_empty_tree_is_dropped() {
        let mut builder = TraceBuilder::<i32>::new(&TraceConfig::default());
        builder.finalize(PendingRecord::DeleteShape { removed: 1 }, || {
            Snapshot::empty(Variant::Bst)
        });
        assert!(builder.is_empty());
    }

    #[test]
    fn snapshots_can_be_disabled() {
        let config = TraceConfig {
            snapshots: false,
            summary: false,
            ..TraceConfig::default()
        };
        let mut builder = TraceBuilder::new(&config);
        builder.finalize(rotation(Direction::Left), || Snapshot::empty(Variant::Avl));
        let trace = builder.finish("ignored");

        assert_eq!(trace.len(), 1);
        assert!(trace.actions()[0].payload.snapshot().is_none());
        assert_eq!(trace.summary(), None);
    }

    #[test]
    fn tags_serialize_kebab_case() {
        let json = serde_json::to_string(&OperationTag::DoubleBlackRecolorRotate).unwrap();
        assert_eq!(json, "\"double-black-recolor-rotate\"");
        for tag in [OperationTag::RotateLeft, OperationTag::CreateNewTree] {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
        }
    }
}

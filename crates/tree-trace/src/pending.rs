//! Deferred completion of structural changes.
//!
//! A rotation or splice deep in the recursion cannot snapshot the tree yet:
//! the caller has not relinked the returned subtree root. The frame that made
//! the change hands a [`PendingRecord`] back to its caller, which relinks and
//! then turns the record into an action carrying a snapshot. Each recursive
//! step returns at most one record (`Option<PendingRecord<K>>`), so there is
//! never more than one outstanding.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

/// Keys touched by one rotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationRecord<K> {
    pub direction: Direction,
    /// Subtree root before the rotation.
    pub old_root: K,
    /// Pivot that replaced it.
    pub new_root: K,
    /// Inner subtree of the pivot that moved across to `old_root`.
    pub displaced: Option<K>,
    /// Node above the rotated pair, `None` at the top of the tree.
    pub parent: Option<K>,
}

impl<K> RotationRecord<K> {
    pub fn new(direction: Direction, old_root: K, new_root: K, displaced: Option<K>) -> Self {
        Self {
            direction,
            old_root,
            new_root,
            displaced,
            parent: None,
        }
    }
}

#[must_use = "a pending record must be finalized by the caller"]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingRecord<K> {
    /// A node was spliced out; the caller relinks the replacement.
    DeleteShape { removed: K },
    /// A subtree root was rotated; the caller relinks the new root.
    Rotation(RotationRecord<K>),
}

impl<K> PendingRecord<K> {
    /// Fills in the node the subtree now hangs from.
    pub fn under(self, parent: Option<K>) -> Self {
        match self {
            PendingRecord::Rotation(mut record) => {
                record.parent = parent;
                PendingRecord::Rotation(record)
            }
            other => other,
        }
    }
}

use crate::arena::Arena;
use crate::error::TreeError;
use crate::pending::{Direction, RotationRecord};
use crate::types::{Key, NodeId};
use crate::util::assert_bst_order;

use super::types::AvlNode;

/// Cached height, `0` for an empty subtree.
#[inline]
pub fn height<K>(arena: &Arena<AvlNode<K>>, node: Option<NodeId>) -> u32 {
    node.map_or(0, |i| arena[i].h)
}

#[inline]
pub fn update_height<K>(arena: &mut Arena<AvlNode<K>>, i: NodeId) {
    let h = height(arena, arena[i].l).max(height(arena, arena[i].r)) + 1;
    arena[i].h = h;
}

/// `height(left) - height(right)`.
#[inline]
pub fn balance<K>(arena: &Arena<AvlNode<K>>, i: NodeId) -> i32 {
    height(arena, arena[i].l) as i32 - height(arena, arena[i].r) as i32
}

/// Rotates `n` down to the left; its right child becomes the subtree root.
///
/// Returns the new subtree root. The caller relinks it under the old parent.
pub fn rotate_left<K: Key>(
    arena: &mut Arena<AvlNode<K>>,
    n: NodeId,
) -> Result<(NodeId, RotationRecord<K>), TreeError> {
    let nr = arena[n]
        .r
        .ok_or(TreeError::Invariant("left rotation without a right child"))?;
    let displaced = arena[nr].l;

    arena[n].r = displaced;
    arena[nr].l = Some(n);
    update_height(arena, n);
    update_height(arena, nr);

    let record = RotationRecord::new(
        Direction::Left,
        arena[n].k.clone(),
        arena[nr].k.clone(),
        displaced.map(|d| arena[d].k.clone()),
    );
    Ok((nr, record))
}

/// Mirror of [`rotate_left`].
pub fn rotate_right<K: Key>(
    arena: &mut Arena<AvlNode<K>>,
    n: NodeId,
) -> Result<(NodeId, RotationRecord<K>), TreeError> {
    let nl = arena[n]
        .l
        .ok_or(TreeError::Invariant("right rotation without a left child"))?;
    let displaced = arena[nl].r;

    arena[n].l = displaced;
    arena[nl].r = Some(n);
    update_height(arena, n);
    update_height(arena, nl);

    let record = RotationRecord::new(
        Direction::Right,
        arena[n].k.clone(),
        arena[nl].k.clone(),
        displaced.map(|d| arena[d].k.clone()),
    );
    Ok((nl, record))
}

pub fn assert_avl_tree<K: Key>(arena: &Arena<AvlNode<K>>, root: Option<NodeId>) -> Result<(), String> {
    fn check<K: Key>(arena: &Arena<AvlNode<K>>, node: Option<NodeId>) -> Result<u32, String> {
        let Some(i) = node else {
            return Ok(0);
        };
        let lh = check(arena, arena[i].l)?;
        let rh = check(arena, arena[i].r)?;
        let h = lh.max(rh) + 1;
        if arena[i].h != h {
            return Err(format!(
                "Cached height {} of {:?} should be {h}",
                arena[i].h, arena[i].k
            ));
        }
        if lh.abs_diff(rh) > 1 {
            return Err(format!("Node {:?} is out of balance", arena[i].k));
        }
        Ok(h)
    }

    check(arena, root)?;
    assert_bst_order(arena, root)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10 -> 20 -> 30 chain hanging right.
    fn chain() -> (Arena<AvlNode<i32>>, NodeId) {
        let mut arena = Arena::new();
        let a = arena.alloc(AvlNode::new(10));
        let b = arena.alloc(AvlNode::new(20));
        let c = arena.alloc(AvlNode::new(30));
        arena[b].r = Some(c);
        arena[b].h = 2;
        arena[a].r = Some(b);
        arena[a].h = 3;
        (arena, a)
    }

    #[test]
    fn rotate_left_lifts_right_child() {
        let (mut arena, a) = chain();
        let (top, record) = rotate_left(&mut arena, a).unwrap();
        assert_eq!(arena[top].k, 20);
        assert_eq!(arena[top].h, 2);
        assert_eq!(arena[a].h, 1);
        assert_eq!(record.old_root, 10);
        assert_eq!(record.new_root, 20);
        assert_eq!(record.displaced, None);
        assert_avl_tree(&arena, Some(top)).unwrap();
    }

    #[test]
    fn rotate_right_requires_left_child() {
        let (mut arena, a) = chain();
        assert_eq!(
            rotate_right(&mut arena, a).unwrap_err(),
            TreeError::Invariant("right rotation without a left child")
        );
    }

    #[test]
    fn stale_height_is_reported() {
        let (arena, a) = chain();
        let mut arena = arena;
        arena[a].h = 5;
        assert!(assert_avl_tree(&arena, Some(a)).is_err());
    }
}

use crate::arena::Arena;
use crate::types::{Key, NodeId};
use crate::util::assert_bst_order;

use super::types::RbNode;

#[inline]
pub fn is_black<K>(arena: &Arena<RbNode<K>>, node: Option<NodeId>) -> bool {
    node.map_or(true, |i| arena[i].b)
}

/// Checks every red-black rule plus parent-link consistency.
pub fn assert_red_black_tree<K: Key>(
    arena: &Arena<RbNode<K>>,
    root: Option<NodeId>,
) -> Result<(), String> {
    let Some(root) = root else {
        return Ok(());
    };

    if arena[root].p.is_some() {
        return Err("Root has parent".to_string());
    }
    if !arena[root].b {
        return Err("Root is not black".to_string());
    }

    fn black_height<K>(arena: &Arena<RbNode<K>>, node: Option<NodeId>) -> Result<usize, String> {
        let Some(node) = node else {
            return Ok(0);
        };

        let l = arena[node].l;
        let r = arena[node].r;

        if let Some(li) = l {
            if arena[li].p != Some(node) {
                return Err("Broken parent link on left child".to_string());
            }
        }
        if let Some(ri) = r {
            if arena[ri].p != Some(node) {
                return Err("Broken parent link on right child".to_string());
            }
        }

        if !arena[node].b {
            if !is_black(arena, l) {
                return Err("Red node has red left child".to_string());
            }
            if !is_black(arena, r) {
                return Err("Red node has red right child".to_string());
            }
        }

        let lh = black_height(arena, l)?;
        let rh = black_height(arena, r)?;
        if lh != rh {
            return Err("Black height mismatch".to_string());
        }

        Ok(lh + usize::from(arena[node].b))
    }

    black_height(arena, Some(root))?;
    assert_bst_order(arena, Some(root))
}

use std::fmt::Debug;

use crate::snapshot::{Snapshot, SnapshotNode};

/// Debug dump of a snapshot.
///
/// ```text
/// 20 h=2
/// ├─ L: 10 h=1
/// └─ R: 30 h=1
/// ```
pub fn print<K: Debug>(snapshot: &Snapshot<K>) -> String {
    match snapshot.root.as_deref() {
        None => "∅".to_string(),
        Some(root) => {
            let mut out = label(root);
            print_children(root, "", &mut out);
            out
        }
    }
}

fn label<K: Debug>(node: &SnapshotNode<K>) -> String {
    let mut out = format!("{:?}", node.key);
    if let Some(h) = node.height {
        out.push_str(&format!(" h={h}"));
    }
    if let Some(color) = node.color {
        out.push_str(if color.is_black() { " black" } else { " red" });
    }
    out
}

fn print_children<K: Debug>(node: &SnapshotNode<K>, tab: &str, out: &mut String) {
    if node.left.is_none() && node.right.is_none() {
        return;
    }
    let children = [("L", node.left.as_deref()), ("R", node.right.as_deref())];
    for (i, (side, child)) in children.into_iter().enumerate() {
        let is_last = i == 1;
        let branch = if is_last { "└─" } else { "├─" };
        out.push('\n');
        out.push_str(tab);
        out.push_str(branch);
        out.push_str(&format!(" {side}: "));
        match child {
            None => out.push('∅'),
            Some(c) => {
                out.push_str(&label(c));
                let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
                print_children(c, &child_tab, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Variant};

    fn leaf(key: i32, color: Color) -> Option<Box<SnapshotNode<i32>>> {
        Some(Box::new(SnapshotNode {
            key,
            height: None,
            color: Some(color),
            left: None,
            right: None,
        }))
    }

    #[test]
    fn prints_colors_and_empty_slots() {
        let snapshot = Snapshot {
            variant: Variant::RedBlack,
            root: Some(Box::new(SnapshotNode {
                key: 10,
                height: None,
                color: Some(Color::Black),
                left: leaf(5, Color::Red),
                right: None,
            })),
        };
        assert_eq!(print(&snapshot), "10 black\n├─ L: 5 red\n└─ R: ∅");
    }

    #[test]
    fn empty_tree() {
        assert_eq!(print(&Snapshot::<i32>::empty(Variant::Avl)), "∅");
    }
}

use std::collections::BTreeSet;

use proptest::prelude::*;
use tree_trace::{OperationTag, Tree, Variant};

const VARIANTS: [Variant; 3] = [Variant::Bst, Variant::Avl, Variant::RedBlack];

#[derive(Clone, Copy, Debug)]
enum Op {
    Insert(i16),
    Delete(i16),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-64i16..64).prop_map(Op::Insert),
        2 => (-64i16..64).prop_map(Op::Delete),
    ]
}

proptest! {
    #[test]
    fn distinct_inserts_keep_inorder_sorted(keys in proptest::collection::btree_set(any::<i32>(), 0..96)) {
        let mut shuffled: Vec<i32> = keys.iter().copied().collect();
        shuffled.reverse();
        let mid = shuffled.len() / 3;
        shuffled.rotate_left(mid);
        for variant in VARIANTS {
            let mut tree = Tree::new(variant);
            for &k in &shuffled {
                tree.insert(k).unwrap();
            }
            let expected: Vec<i32> = keys.iter().copied().collect();
            prop_assert_eq!(tree.keys(), expected);
            prop_assert_eq!(tree.assert_valid(), Ok(()));
        }
    }

    #[test]
    fn mixed_ops_preserve_invariants(ops in proptest::collection::vec(op(), 0..160)) {
        for variant in VARIANTS {
            let mut tree = Tree::new(variant);
            let mut model = BTreeSet::new();
            for op in &ops {
                match *op {
                    Op::Insert(k) if !model.contains(&k) => {
                        tree.insert(k).unwrap();
                        model.insert(k);
                    }
                    Op::Delete(k) if model.contains(&k) => {
                        let trace = tree.delete(&k).unwrap();
                        prop_assert_eq!(trace.count(OperationTag::MatchForDelete), 1);
                        model.remove(&k);
                    }
                    _ => continue,
                }
                prop_assert_eq!(tree.assert_valid(), Ok(()), "{} after {:?}", variant, op);
            }
            prop_assert_eq!(tree.keys(), model.iter().copied().collect::<Vec<_>>());
            prop_assert_eq!(tree.len(), model.len());
        }
    }

    #[test]
    fn insert_then_delete_round_trips(k in any::<i64>()) {
        for variant in VARIANTS {
            let mut tree = Tree::new(variant);
            tree.insert(k).unwrap();
            tree.delete(&k).unwrap();
            prop_assert!(tree.is_empty());
            prop_assert!(tree.snapshot().is_empty());
        }
    }

    #[test]
    fn double_reverse_is_identity(keys in proptest::collection::btree_set(-500i32..500, 1..40)) {
        for variant in VARIANTS {
            let mut tree = Tree::new(variant);
            for &k in &keys {
                let trace = tree.insert(k).unwrap();
                prop_assert_eq!(trace.clone().reversed().reversed(), trace);
            }
        }
    }

    #[test]
    fn every_payload_matches_its_tag(keys in proptest::collection::vec(-40i32..40, 1..60)) {
        let mut tree = Tree::new(Variant::RedBlack);
        for &k in &keys {
            let trace = tree.insert(k).unwrap();
            for action in &trace {
                prop_assert_eq!(action.tag.payload_kind(), action.payload.kind());
            }
        }
        for &k in &keys {
            let trace = tree.delete(&k).unwrap();
            for action in &trace {
                prop_assert_eq!(action.tag.payload_kind(), action.payload.kind());
            }
            prop_assert_eq!(tree.assert_valid(), Ok(()));
        }
        prop_assert!(tree.is_empty());
    }
}

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tree_trace::{OperationTag, Snapshot, Tree, Variant};

const VARIANTS: [Variant; 3] = [Variant::Bst, Variant::Avl, Variant::RedBlack];

/// Longest root-to-leaf path in nodes.
fn depth(snapshot: &Snapshot<i32>) -> u32 {
    snapshot.height()
}

#[test]
fn ladder_insert_delete_matrix() {
    for variant in VARIANTS {
        let mut tree = Tree::new(variant);

        for i in 0..200 {
            tree.insert(i).unwrap();
            assert!(tree.contains(&i));
            tree.assert_valid().unwrap();
        }
        assert_eq!(tree.len(), 200);

        for i in (0..200).step_by(2) {
            tree.delete(&i).unwrap();
            tree.assert_valid().unwrap();
        }
        assert_eq!(tree.len(), 100);

        for i in 0..200 {
            assert_eq!(tree.contains(&i), i % 2 == 1, "{variant} key {i}");
        }
    }
}

#[test]
fn balanced_engines_stay_shallow_matrix() {
    let mut avl = Tree::new(Variant::Avl);
    let mut rb = Tree::new(Variant::RedBlack);
    let mut bst = Tree::new(Variant::Bst);
    for i in 0..1023 {
        avl.insert(i).unwrap();
        rb.insert(i).unwrap();
        bst.insert(i).unwrap();
    }
    // 1.44 * log2(n) and 2 * log2(n + 1) bounds.
    assert!(depth(&avl.snapshot()) <= 14);
    assert!(depth(&rb.snapshot()) <= 20);
    assert_eq!(depth(&bst.snapshot()), 1023);
}

#[test]
fn seeded_random_workload_matrix() {
    for seed in [1u64, 7, 42, 1337] {
        for variant in VARIANTS {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut tree = Tree::new(variant);
            let mut model = BTreeSet::new();
            let mut rotations = 0;

            for _ in 0..600 {
                let k: i32 = rng.gen_range(0..150);
                let trace = if model.contains(&k) {
                    model.remove(&k);
                    tree.delete(&k).unwrap()
                } else {
                    model.insert(k);
                    tree.insert(k).unwrap()
                };
                rotations += trace.count(OperationTag::RotateLeft)
                    + trace.count(OperationTag::RotateRight);
                tree.assert_valid()
                    .unwrap_or_else(|e| panic!("{variant} seed {seed}: {e}"));
            }

            assert_eq!(tree.keys(), model.iter().copied().collect::<Vec<_>>());
            if variant == Variant::Bst {
                assert_eq!(rotations, 0);
            } else {
                assert!(rotations > 0, "{variant} seed {seed} never rotated");
            }
        }
    }
}

#[test]
fn arena_slots_are_reused_matrix() {
    for variant in VARIANTS {
        let mut tree = Tree::new(variant);
        for round in 0..5 {
            for i in 0..50 {
                tree.insert(i).unwrap();
            }
            for i in 0..50 {
                tree.delete(&i).unwrap();
            }
            assert!(tree.is_empty(), "{variant} round {round}");
        }
        tree.insert(1).unwrap();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }
}

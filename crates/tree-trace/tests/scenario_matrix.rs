use tree_trace::{
    AvlTree, OperationTag, Payload, RbTree, Trace, TraceConfig, Tree, Variant,
};

const VARIANTS: [Variant; 3] = [Variant::Bst, Variant::Avl, Variant::RedBlack];

fn build(variant: Variant, keys: &[i32]) -> Tree<i32> {
    let mut tree = Tree::new(variant);
    for &k in keys {
        tree.insert(k).unwrap();
        tree.assert_valid().unwrap();
    }
    tree
}

fn assert_shapes_match(trace: &Trace<i32>) {
    for action in trace {
        assert_eq!(action.tag.payload_kind(), action.payload.kind(), "{action:?}");
    }
}

#[test]
fn avl_ascending_insert_rotates_left_once_matrix() {
    let mut tree = AvlTree::new();
    tree.insert(10).unwrap();
    tree.insert(20).unwrap();
    let trace = tree.insert(30).unwrap();

    assert_eq!(trace.count(OperationTag::RotateLeft), 1);
    assert_eq!(trace.count(OperationTag::RotateRight), 0);
    let rotate = trace.first_of(OperationTag::RotateLeft).unwrap();
    let Payload::Rotation { record, snapshot } = &rotate.payload else {
        panic!("rotation payload expected");
    };
    assert_eq!(record.old_root, 10);
    assert_eq!(record.new_root, 20);
    assert_eq!(record.displaced, None);
    assert_eq!(record.parent, None);
    assert_eq!(snapshot.as_ref().unwrap().root_key(), Some(&20));

    let violation = trace
        .tags()
        .iter()
        .position(|t| *t == OperationTag::BalanceViolation)
        .unwrap();
    let rotation = trace
        .tags()
        .iter()
        .position(|t| *t == OperationTag::RotateLeft)
        .unwrap();
    assert!(violation < rotation);

    assert_eq!(tree.snapshot().root_key(), Some(&20));
    assert_shapes_match(&trace);
    tree.assert_valid().unwrap();
}

#[test]
fn red_black_child_of_black_root_is_terminal_matrix() {
    let mut tree = RbTree::new();
    tree.insert(10).unwrap();
    let trace = tree.insert(5).unwrap();

    assert_eq!(
        trace.tags(),
        vec![
            OperationTag::AppendLeft,
            OperationTag::BeginFixup,
            OperationTag::ParentBlackTerminal,
            OperationTag::EndOfSequence,
        ]
    );
    assert_shapes_match(&trace);
    tree.assert_valid().unwrap();
}

#[test]
fn red_black_delete_runs_sibling_rotation_fixup_matrix() {
    let mut tree = RbTree::new();
    for k in [10, 20, 30, 15] {
        tree.insert(k).unwrap();
        tree.assert_valid().unwrap();
    }
    let trace = tree.delete(&30).unwrap();

    assert_eq!(trace.count(OperationTag::FormerPositionNote), 1);
    assert_eq!(trace.count(OperationTag::DoubleBlackRecolorRotate), 2);
    assert_eq!(trace.count(OperationTag::RotateLeft), 1);
    assert_eq!(trace.count(OperationTag::RotateRight), 1);

    let begin = trace.first_of(OperationTag::BeginFixup).unwrap();
    assert_eq!(begin.payload, Payload::Key { key: 20 });

    assert_eq!(tree.keys(), vec![10, 15, 20]);
    assert_eq!(tree.snapshot().root_key(), Some(&15));
    assert_shapes_match(&trace);
    tree.assert_valid().unwrap();
}

#[test]
fn deleting_sole_key_empties_tree_matrix() {
    for variant in VARIANTS {
        let mut tree = build(variant, &[42]);
        let trace = tree.delete(&42).unwrap();

        assert_eq!(
            trace.tags(),
            vec![OperationTag::MatchForDelete, OperationTag::EndOfSequence],
            "{variant}"
        );
        assert_eq!(
            trace.actions()[0].payload,
            Payload::Splice {
                key: 42,
                replacement: None
            }
        );
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.snapshot().is_empty());
    }
}

#[test]
fn first_insert_is_single_create_action_matrix() {
    for variant in VARIANTS {
        let mut tree = Tree::new(variant);
        let trace = tree.insert(1).unwrap();
        assert_eq!(trace.tags(), vec![OperationTag::CreateNewTree]);
        let snapshot = trace.actions()[0].payload.snapshot().unwrap();
        assert_eq!(snapshot.variant, variant);
        assert_eq!(snapshot.keys(), vec![&1]);
    }
}

#[test]
fn trace_ends_with_summary_matrix() {
    for variant in VARIANTS {
        let mut tree = build(variant, &[50, 25, 75]);
        let trace = tree.insert(60).unwrap();
        assert_eq!(trace.summary(), Some("Inserted 60"));
        assert_eq!(trace.actions().last().unwrap().tag, OperationTag::EndOfSequence);

        let trace = tree.delete(&25).unwrap();
        assert_eq!(trace.summary(), Some("Deleted 25"));
        assert_shapes_match(&trace);
    }
}

#[test]
fn double_reverse_restores_order_matrix() {
    for variant in VARIANTS {
        let mut tree = build(variant, &[8, 4, 12, 2, 6, 10, 14]);
        let trace = tree.delete(&8).unwrap();
        let back = trace.clone().reversed();
        assert_eq!(back.actions().first(), trace.actions().last());
        assert_eq!(back.reversed(), trace);
    }
}

#[test]
fn two_child_delete_swaps_before_splice_matrix() {
    for variant in VARIANTS {
        let mut tree = build(variant, &[8, 4, 12, 2, 6, 10, 14]);
        let trace = tree.delete(&8).unwrap();
        let tags = trace.tags();
        let swap = tags
            .iter()
            .position(|t| *t == OperationTag::SwapValues)
            .unwrap();
        let splice = tags
            .iter()
            .position(|t| *t == OperationTag::MatchForDelete)
            .unwrap();
        assert_eq!(tags[0], OperationTag::MatchForSuccessor, "{variant}");
        assert!(swap < splice);
        assert_eq!(
            trace.actions()[swap].payload,
            Payload::Swap {
                target: 8,
                successor: 10
            }
        );
        assert_eq!(tree.keys(), vec![2, 4, 6, 10, 12, 14]);
        tree.assert_valid().unwrap();
    }
}

#[test]
fn contract_violations_leave_tree_untouched_matrix() {
    for variant in [Variant::Bst, Variant::Avl] {
        let mut tree = build(variant, &[3, 1, 2]);
        let before = tree.snapshot();
        assert!(tree.insert(2).is_err());
        assert!(tree.delete(&9).is_err());
        assert_eq!(tree.snapshot(), before);
    }
    let mut tree = build(Variant::RedBlack, &[3, 1]);
    assert!(tree.delete(&9).is_err());
    assert!(tree.insert(3).is_ok());
}

#[test]
fn capability_queries_matrix() {
    for variant in VARIANTS {
        let tree = build(variant, &[40, 20, 60, 10, 30]);
        assert_eq!(tree.minimum(tree.root()), Some(10));
        assert_eq!(tree.minimum(None), None);
        assert_eq!(tree.height(None), 0);
        assert_eq!(tree.height(tree.root()), 3, "{variant}");
        let twenty = tree.find(&20).unwrap();
        assert_eq!(tree.height(Some(twenty)), 2);
        assert_eq!(tree.minimum(Some(twenty)), Some(10));
        assert!(tree.contains(&30));
        assert!(!tree.contains(&35));
        assert_eq!(tree.len(), 5);
    }
}

#[test]
fn disabled_snapshots_and_summary_matrix() {
    let config = TraceConfig {
        snapshots: false,
        summary: false,
        variant: Variant::Avl,
    };
    let mut tree = Tree::with_config(config.variant, config);
    for k in [1, 2] {
        tree.insert(k).unwrap();
    }
    let trace = tree.insert(3).unwrap();
    assert_eq!(trace.summary(), None);
    assert_eq!(trace.count(OperationTag::RotateLeft), 1);
    assert!(trace.iter().all(|a| a.payload.snapshot().is_none()));
}

#[test]
fn trace_serializes_for_player_matrix() {
    let mut tree = build(Variant::Avl, &[10, 20]);
    let trace = tree.insert(30).unwrap();
    let json: serde_json::Value = serde_json::from_str(&trace.to_json().unwrap()).unwrap();

    let actions = json.as_array().unwrap();
    assert_eq!(actions[0]["tag"], "descend-right");
    assert_eq!(actions[0]["payload"]["kind"], "step");
    let rotate = actions
        .iter()
        .find(|a| a["tag"] == "rotate-left")
        .unwrap();
    assert_eq!(rotate["payload"]["record"]["old_root"], 10);
    assert_eq!(rotate["payload"]["snapshot"]["root"]["height"], 2);
    assert!(rotate["payload"]["snapshot"]["root"].get("color").is_none());

    let back: Trace<i32> = serde_json::from_value(json).unwrap();
    assert_eq!(back, trace);
}

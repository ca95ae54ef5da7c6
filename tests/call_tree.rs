//! Full pipeline to call tree: symbolicate a profile, aggregate a thread,
//! and check the accounting and rendered output.

mod common;

use common::{lib, profile, table, MemoryStore, ScriptedSupplier};
use profview::analysis::{build_tree, render, CallTreeNode};
use profview::symbolication::{symbolicate, SymbolStore};
use std::sync::Arc;

fn assert_conservation(node: &CallTreeNode) {
    let child_total: u64 = node.children.iter().map(|c| c.total).sum();
    assert_eq!(node.self_count + child_total, node.total, "at node {}", node.name);
    for child in &node.children {
        assert_conservation(child);
    }
}

#[tokio::test]
async fn symbolicated_profile_aggregates_into_the_expected_tree() {
    let key = lib("libapp.so", "abc123");
    let supplier = Arc::new(ScriptedSupplier::new());
    supplier.succeed_with(&key, table(&[(0x100, "main"), (0x200, "render"), (0x300, "paint")]));
    let store = SymbolStore::new(supplier, MemoryStore::new());

    // Stacks: [main, render] x2, [main, paint] x1
    let p = profile(
        &[key],
        &[(
            "GeckoMain",
            &[(0x110, Some(0)), (0x210, Some(0)), (0x310, Some(0))],
            &[&[0, 1], &[0, 1], &[0, 2]],
        )],
    );

    let resolved = symbolicate(p, &store, |_| {}).await;
    let tree = build_tree(&resolved.threads[0]);

    assert_eq!(tree.total, 3);
    assert_conservation(&tree);

    assert_eq!(
        render(&tree, 20),
        "3 (root)\n  3 main\n    2 render\n    1 paint\n"
    );
}

#[tokio::test]
async fn failed_library_frames_aggregate_by_address() {
    let good = lib("libgood.so", "aaaa");
    let bad = lib("libbad.so", "bbbb");
    let supplier = Arc::new(ScriptedSupplier::new());
    supplier.succeed_with(&good, table(&[(0x100, "main")]));
    supplier.fail_with(&bad, "host unavailable");
    let store = SymbolStore::new(supplier, MemoryStore::new());

    // Two samples through the same unresolved address merge; a different
    // unresolved address stays its own node.
    let p = profile(
        &[good, bad],
        &[(
            "Main",
            &[(0x110, Some(0)), (0x500, Some(1)), (0x600, Some(1))],
            &[&[0, 1], &[0, 1], &[0, 2]],
        )],
    );

    let resolved = symbolicate(p, &store, |_| {}).await;
    let tree = build_tree(&resolved.threads[0]);
    assert_conservation(&tree);

    let main = &tree.children[0];
    assert_eq!(main.name, "main");
    assert_eq!(main.children.len(), 2);
    assert_eq!((main.children[0].name.as_str(), main.children[0].total), ("0x500", 2));
    assert_eq!((main.children[1].name.as_str(), main.children[1].total), ("0x600", 1));
}

#[tokio::test]
async fn tree_can_be_rebuilt_after_every_incremental_snapshot() {
    let a = lib("liba.so", "aaaa");
    let b = lib("libb.so", "bbbb");
    let supplier = Arc::new(ScriptedSupplier::new());
    supplier.succeed_with(&a, table(&[(0x100, "alpha")]));
    supplier.succeed_with(&b, table(&[(0x100, "beta")]));
    let store = SymbolStore::new(supplier, MemoryStore::new());

    let p = profile(
        &[a, b],
        &[("Main", &[(0x110, Some(0)), (0x110, Some(1))], &[&[0, 1], &[0, 1]])],
    );

    // Building from every intermediate snapshot keeps the accounting intact;
    // only names change as libraries land.
    let trees = std::sync::Mutex::new(Vec::new());
    let resolved = symbolicate(p, &store, |snapshot| {
        trees.lock().unwrap().push(build_tree(&snapshot.threads[0]));
    })
    .await;

    let trees = trees.into_inner().unwrap();
    assert_eq!(trees.len(), 2);
    for tree in &trees {
        assert_eq!(tree.total, 2);
        assert_conservation(tree);
    }

    let final_tree = build_tree(&resolved.threads[0]);
    assert_eq!(final_tree.children[0].name, "alpha");
    assert_eq!(final_tree.children[0].children[0].name, "beta");
}

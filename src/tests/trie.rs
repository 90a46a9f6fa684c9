//! Node-level tests with hand-picked hashes, independent of the hasher.

use crate::invariant;
use crate::node::{self, CompactNode, Entry, Node};
use crate::ops::insert::{InsertOutcome, insert_recursive};
use crate::ops::remove::remove_recursive;

fn same_key(a: &u32, b: &u32) -> bool {
    a == b
}

fn entry(hash: u32, key: u32) -> Entry<u32, u32> {
    Entry {
        hash,
        key,
        value: key * 10,
    }
}

fn build(entries: &[(u32, u32)]) -> Node<u32, u32> {
    let mut root = Node::empty();
    for &(hash, key) in entries {
        let outcome = insert_recursive(&mut root, entry(hash, key), 0, &same_key);
        assert_eq!(outcome, InsertOutcome::Inserted);
    }
    assert_eq!(invariant::check_tree(&root, &mut |_| Ok(())), Ok(()));
    root
}

fn remove(root: &mut Node<u32, u32>, hash: u32, key: u32) -> Option<u32> {
    let removed = remove_recursive(root, hash, &key, 0, &same_key).map(|e| e.value);
    assert_eq!(invariant::check_tree(root, &mut |_| Ok(())), Ok(()));
    removed
}

fn bitmaps(node: &Node<u32, u32>) -> (u32, u32) {
    match node {
        Node::Compact(compact) => (compact.data_map, compact.node_map),
        Node::Collision(_) => panic!("expected a compact node"),
    }
}

fn keys_of(entries: &[Entry<u32, u32>]) -> Vec<u32> {
    entries.iter().map(|e| e.key).collect()
}

fn keys(node: &Node<u32, u32>) -> Vec<u32> {
    keys_of(node.entries())
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

#[test]
fn fragment_mask_index() {
    assert_eq!(node::fragment(0b11111_00001, 0), 1);
    assert_eq!(node::fragment(0b11111_00001, 5), 31);
    assert_eq!(node::fragment(u32::MAX, 30), 0b11);
    assert_eq!(node::mask(4), 0b10000);
    assert_eq!(node::index(0b1011_0110, node::mask(5)), 3);
    assert_eq!(node::index(0b1011_0110, node::mask(0)), 0);
}

// ---------------------------------------------------------------------------
// Slot migrations
// ---------------------------------------------------------------------------

#[test]
fn migrate_inline_to_child_moves_entry_out_of_data_slot() {
    // Slots 1 and 3 inline; hash 65 shares slot 1 with hash 1.
    let mut compact = CompactNode {
        data_map: node::mask(1) | node::mask(3),
        node_map: 0,
        entries: vec![entry(1, 100), entry(3, 300)],
        children: Vec::new(),
    };
    compact.migrate_inline_to_child(node::mask(1), entry(65, 200), 5);

    assert_eq!(compact.data_map, node::mask(3));
    assert_eq!(compact.node_map, node::mask(1));
    assert_eq!(compact.data_map & compact.node_map, 0);
    assert_eq!(keys_of(&compact.entries), vec![300]);
    assert_eq!(compact.children.len(), 1);
    assert_eq!(keys(&compact.children[0]), vec![100, 200]);

    let root = Node::Compact(compact);
    assert_eq!(invariant::check_tree(&root, &mut |_| Ok(())), Ok(()));
}

#[test]
fn repeated_slot_sharing_keeps_bitmaps_disjoint() {
    // Every hash lands in root slot 0; they split at level 1.
    let pairs: Vec<(u32, u32)> = (0..32).map(|i| (i << 5, i)).collect();
    let root = build(&pairs);

    assert_eq!(bitmaps(&root), (0, node::mask(0)));
    let child = &root.children()[0];
    assert_eq!(bitmaps(child), (u32::MAX, 0));
    assert_eq!(keys(child), (0..32).collect::<Vec<_>>());
}

// ---------------------------------------------------------------------------
// Slot sharing pushes both entries one level down
// ---------------------------------------------------------------------------

#[test]
fn shared_slot_creates_child_lower_slot_first() {
    // Hashes 1 and 65 share fragment 1 at level 0, then split as 0 and 2.
    for order in [[(1, 100), (65, 200)], [(65, 200), (1, 100)]] {
        let root = build(&order);
        assert_eq!(bitmaps(&root), (0, node::mask(1)));

        let child = &root.children()[0];
        assert_eq!(bitmaps(child), (node::mask(0) | node::mask(2), 0));
        assert_eq!(keys(child), vec![100, 200]);
    }
}

#[test]
fn removal_inlines_remaining_entry() {
    let mut root = build(&[(1, 100), (65, 200)]);
    assert_eq!(remove(&mut root, 65, 200), Some(2000));

    assert_eq!(bitmaps(&root), (node::mask(1), 0));
    assert_eq!(keys(&root), vec![100]);
    assert!(root.children().is_empty());
}

#[test]
fn long_shared_prefix_builds_chain() {
    // Equal in every fragment except the last two bits.
    let mut root = build(&[(0, 1), (1 << 30, 2)]);

    let mut node = &root;
    for _ in 0..6 {
        assert_eq!(bitmaps(node), (0, node::mask(0)));
        node = &*node.children()[0];
    }
    assert_eq!(bitmaps(node), (node::mask(0) | node::mask(1), 0));

    assert_eq!(remove(&mut root, 1 << 30, 2), Some(20));
    assert_eq!(bitmaps(&root), (node::mask(0), 0));
    assert_eq!(keys(&root), vec![1]);
}

#[test]
fn full_hash_collision_at_last_level() {
    let hash = 0x0000_0055;
    let mut root = build(&[(hash, 1), (hash, 2), (hash, 3)]);

    let mut node = &root;
    for _ in 0..7 {
        assert!(matches!(node, Node::Compact(_)));
        node = &*node.children()[0];
    }
    assert!(matches!(node, Node::Collision(_)));
    assert_eq!(keys(node), vec![1, 2, 3]);

    assert_eq!(remove(&mut root, hash, 2), Some(20));
    assert_eq!(remove(&mut root, hash, 1), Some(10));
    assert_eq!(bitmaps(&root), (node::mask(0x15), 0));
    assert_eq!(keys(&root), vec![3]);
}

#[test]
fn replace_in_place() {
    let mut root = build(&[(7, 1)]);
    let outcome = insert_recursive(
        &mut root,
        Entry {
            hash: 7,
            key: 1,
            value: 99,
        },
        0,
        &same_key,
    );
    assert_eq!(outcome, InsertOutcome::Replaced(10));
    assert_eq!(root.entries()[0].value, 99);
}

#[test]
fn remove_missing_changes_nothing() {
    let mut root = build(&[(1, 100), (65, 200)]);
    // Same slot, different hash.
    assert_eq!(remove(&mut root, 33, 300), None);
    // Same hash, different key.
    assert_eq!(remove(&mut root, 1, 999), None);
    // Empty slot.
    assert_eq!(remove(&mut root, 2, 100), None);
    assert_eq!(bitmaps(&root), (0, node::mask(1)));
}

#[test]
fn removing_last_entry_leaves_empty_root() {
    let mut root = build(&[(9, 1)]);
    assert_eq!(remove(&mut root, 9, 1), Some(10));
    assert_eq!(bitmaps(&root), (0, 0));
    assert!(root.entries().is_empty());
}

//! Insertion operation: in-place insert over copy-on-write nodes.

use crate::hash::BITS_PER_LEVEL;
use crate::node::{self, CollisionNode, CompactNode, Entry, Node};

/// What an insert did to the subtree.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome<V> {
    /// A new key was added.
    Inserted,
    /// The key existed; its previous value is returned.
    Replaced(V),
}

/// Inserts `entry` into the subtree rooted at `node`.
///
/// Every node on the path has already been made writable by the caller
/// through [`Node::edit`]; children are made writable on the way down.
pub fn insert_recursive<K, V, F>(
    node: &mut Node<K, V>,
    entry: Entry<K, V>,
    shift: u32,
    key_eq: &F,
) -> InsertOutcome<V>
where
    K: Clone,
    V: Clone,
    F: Fn(&K, &K) -> bool + ?Sized,
{
    match node {
        Node::Compact(compact) => insert_into_compact(compact, entry, shift, key_eq),
        Node::Collision(collision) => insert_into_collision(collision, entry, key_eq),
    }
}

fn insert_into_compact<K, V, F>(
    node: &mut CompactNode<K, V>,
    entry: Entry<K, V>,
    shift: u32,
    key_eq: &F,
) -> InsertOutcome<V>
where
    K: Clone,
    V: Clone,
    F: Fn(&K, &K) -> bool + ?Sized,
{
    let bit = node::mask(node::fragment(entry.hash, shift));

    if node.data_map & bit != 0 {
        let pos = node::index(node.data_map, bit);
        let existing = &mut node.entries[pos];

        if existing.hash == entry.hash && key_eq(&existing.key, &entry.key) {
            // Same key → replace the value, keep the stored key.
            return InsertOutcome::Replaced(std::mem::replace(&mut existing.value, entry.value));
        }

        // Different key in the same slot → push both one level down.
        node.migrate_inline_to_child(bit, entry, shift + BITS_PER_LEVEL);
        InsertOutcome::Inserted
    } else if node.node_map & bit != 0 {
        let pos = node::index(node.node_map, bit);
        let child = Node::edit(&mut node.children[pos]);
        insert_recursive(child, entry, shift + BITS_PER_LEVEL, key_eq)
    } else {
        node.insert_entry(bit, entry);
        InsertOutcome::Inserted
    }
}

fn insert_into_collision<K, V, F>(
    node: &mut CollisionNode<K, V>,
    entry: Entry<K, V>,
    key_eq: &F,
) -> InsertOutcome<V>
where
    F: Fn(&K, &K) -> bool + ?Sized,
{
    // Only keys with the node's full hash are ever routed here.
    debug_assert_eq!(node.hash, entry.hash);

    if let Some(existing) = node.entries.iter_mut().find(|e| key_eq(&e.key, &entry.key)) {
        return InsertOutcome::Replaced(std::mem::replace(&mut existing.value, entry.value));
    }
    node.entries.push(entry);
    InsertOutcome::Inserted
}

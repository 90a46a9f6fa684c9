//! Removal operation: in-place delete with canonical inlining.

use crate::hash::BITS_PER_LEVEL;
use crate::node::{self, CollisionNode, CompactNode, Entry, Node, SizePredicate};

/// Removes `key` from the subtree rooted at `node`, returning its entry.
///
/// A child left holding a single entry is dissolved and the entry moves up
/// into this node's slot, so no chain of singleton sub-nodes survives a
/// removal. The caller inspects this node's [`SizePredicate`] afterwards to
/// apply the same rule one level up.
pub fn remove_recursive<K, V, F>(
    node: &mut Node<K, V>,
    hash: u32,
    key: &K,
    shift: u32,
    key_eq: &F,
) -> Option<Entry<K, V>>
where
    K: Clone,
    V: Clone,
    F: Fn(&K, &K) -> bool + ?Sized,
{
    match node {
        Node::Compact(compact) => remove_from_compact(compact, hash, key, shift, key_eq),
        Node::Collision(collision) => remove_from_collision(collision, hash, key, key_eq),
    }
}

fn remove_from_compact<K, V, F>(
    node: &mut CompactNode<K, V>,
    hash: u32,
    key: &K,
    shift: u32,
    key_eq: &F,
) -> Option<Entry<K, V>>
where
    K: Clone,
    V: Clone,
    F: Fn(&K, &K) -> bool + ?Sized,
{
    let bit = node::mask(node::fragment(hash, shift));

    if node.data_map & bit != 0 {
        let existing = &node.entries[node::index(node.data_map, bit)];
        if existing.hash != hash || !key_eq(&existing.key, key) {
            return None;
        }
        Some(node.remove_entry(bit))
    } else if node.node_map & bit != 0 {
        let pos = node::index(node.node_map, bit);
        let child = Node::edit(&mut node.children[pos]);
        let removed = remove_recursive(child, hash, key, shift + BITS_PER_LEVEL, key_eq)?;

        match child.size_predicate() {
            SizePredicate::MoreThanOne => {}
            SizePredicate::One => {
                if let Some(sole) = child.pop_entry() {
                    node.migrate_child_to_inline(bit, sole);
                }
            }
            SizePredicate::Empty => node.drop_child(bit),
        }
        Some(removed)
    } else {
        None
    }
}

fn remove_from_collision<K, V, F>(
    node: &mut CollisionNode<K, V>,
    hash: u32,
    key: &K,
    key_eq: &F,
) -> Option<Entry<K, V>>
where
    F: Fn(&K, &K) -> bool + ?Sized,
{
    if node.hash != hash {
        return None;
    }
    let pos = node.entries.iter().position(|e| key_eq(&e.key, key))?;
    let removed = node.entries.remove(pos);
    if node.entries.len() == 1 {
        tracing::trace!(hash, "collision node down to one entry, inlining into parent");
    }
    Some(removed)
}

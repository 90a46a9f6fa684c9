//! Lookup operation: traverses the trie to find a key.

use crate::hash::BITS_PER_LEVEL;
use crate::node::{self, Entry, Node};

/// Searches for `key` in the subtree rooted at `node`.
///
/// `key_eq` decides key equality; stored hashes are compared first so it
/// only runs against keys in the same slot.
pub fn get_recursive<'a, K, V, F>(
    node: &'a Node<K, V>,
    hash: u32,
    key: &K,
    shift: u32,
    key_eq: &F,
) -> Option<&'a Entry<K, V>>
where
    F: Fn(&K, &K) -> bool + ?Sized,
{
    match node {
        Node::Compact(compact) => {
            let bit = node::mask(node::fragment(hash, shift));

            if compact.data_map & bit != 0 {
                // Slot holds an inline entry.
                let entry = &compact.entries[node::index(compact.data_map, bit)];
                (entry.hash == hash && key_eq(&entry.key, key)).then_some(entry)
            } else if compact.node_map & bit != 0 {
                // Slot holds a child subtree, recurse.
                let child = &compact.children[node::index(compact.node_map, bit)];
                get_recursive(child, hash, key, shift + BITS_PER_LEVEL, key_eq)
            } else {
                None
            }
        }
        Node::Collision(collision) => {
            if collision.hash != hash {
                return None;
            }
            collision.entries.iter().find(|entry| key_eq(&entry.key, key))
        }
    }
}

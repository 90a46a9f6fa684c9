//! Trie operations and the root handle they run against.

pub mod get;
pub mod insert;
pub mod remove;

use std::hash::Hash;
use std::sync::Arc;

use crate::hash::{self, entry_hash};
use crate::invariant::{self, InvariantError};
use crate::node::{Entry, Node};

use self::get::get_recursive;
use self::insert::{InsertOutcome, insert_recursive};
use self::remove::remove_recursive;

/// Root node plus the cached size and combined hash of the whole trie.
///
/// Shared by [`ChampMap`](crate::ChampMap), which never edits a root it
/// has handed out, and [`TransientChampMap`](crate::TransientChampMap),
/// which owns its root exclusively until frozen.
pub struct Root<K, V> {
    /// Root node, always a compact node; empty when `size == 0`.
    pub node: Arc<Node<K, V>>,
    /// Number of live entries.
    pub size: usize,
    /// XOR of `hash(key) ^ hash(value)` over all entries.
    pub hash: u32,
}

impl<K, V> Root<K, V> {
    /// Creates an empty root.
    pub fn new() -> Self {
        Self {
            node: Arc::new(Node::empty()),
            size: 0,
            hash: 0,
        }
    }
}

impl<K, V> Clone for Root<K, V> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            size: self.size,
            hash: self.hash,
        }
    }
}

impl<K: Hash, V> Root<K, V> {
    /// Looks up the entry for `key` under the given key equality.
    pub fn find<F>(&self, key: &K, key_eq: &F) -> Option<&Entry<K, V>>
    where
        F: Fn(&K, &K) -> bool + ?Sized,
    {
        get_recursive(&self.node, hash::hash_one(key), key, 0, key_eq)
    }
}

impl<K: Hash + Clone, V: Hash + Clone> Root<K, V> {
    /// Associates `value` with `key`, returning the previous value.
    ///
    /// When the stored value is already equal under `value_eq` nothing is
    /// touched and the stored value is returned.
    pub fn put<KE, VE>(&mut self, key: K, value: V, key_eq: &KE, value_eq: &VE) -> Option<V>
    where
        KE: Fn(&K, &K) -> bool + ?Sized,
        VE: Fn(&V, &V) -> bool + ?Sized,
    {
        let key_hash = hash::hash_one(&key);
        if let Some(existing) = get_recursive(&self.node, key_hash, &key, 0, key_eq) {
            if value_eq(&existing.value, &value) {
                return Some(existing.value.clone());
            }
        }

        let value_hash = hash::hash_one(&value);
        let entry = Entry {
            hash: key_hash,
            key,
            value,
        };
        let previous = match insert_recursive(Node::edit(&mut self.node), entry, 0, key_eq) {
            InsertOutcome::Inserted => {
                self.size += 1;
                self.hash ^= entry_hash(key_hash, value_hash);
                None
            }
            InsertOutcome::Replaced(old) => {
                self.hash ^= entry_hash(key_hash, hash::hash_one(&old));
                self.hash ^= entry_hash(key_hash, value_hash);
                Some(old)
            }
        };

        #[cfg(feature = "debug-invariants")]
        debug_assert_eq!(self.validate(), Ok(()));

        previous
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// A missing key leaves every node untouched.
    pub fn remove<F>(&mut self, key: &K, key_eq: &F) -> Option<V>
    where
        F: Fn(&K, &K) -> bool + ?Sized,
    {
        let key_hash = hash::hash_one(key);
        get_recursive(&self.node, key_hash, key, 0, key_eq)?;

        let removed = remove_recursive(Node::edit(&mut self.node), key_hash, key, 0, key_eq)?;
        self.size -= 1;
        self.hash ^= entry_hash(removed.hash, hash::hash_one(&removed.value));

        #[cfg(feature = "debug-invariants")]
        debug_assert_eq!(self.validate(), Ok(()));

        Some(removed.value)
    }
}

impl<K: Hash, V: Hash> Root<K, V> {
    /// Re-derives size and combined hash from a full scan and checks every
    /// node-shape invariant along the way.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let result = self.rescan();
        if let Err(error) = &result {
            tracing::warn!(%error, "trie invariant violated");
        }
        result
    }

    fn rescan(&self) -> Result<(), InvariantError> {
        let mut actual_size = 0_usize;
        let mut actual_hash = 0_u32;

        let mut visit = |entry: &Entry<K, V>| {
            let key_hash = hash::hash_one(&entry.key);
            if key_hash != entry.hash {
                return Err(InvariantError::StaleKeyHash {
                    cached: entry.hash,
                    actual: key_hash,
                });
            }
            actual_size += 1;
            actual_hash ^= entry_hash(key_hash, hash::hash_one(&entry.value));
            Ok(())
        };
        invariant::check_tree(&self.node, &mut visit)?;

        if actual_size != self.size {
            return Err(InvariantError::StaleSize {
                cached: self.size,
                actual: actual_size,
            });
        }
        if actual_hash != self.hash {
            return Err(InvariantError::StaleHash {
                cached: self.hash,
                actual: actual_hash,
            });
        }
        Ok(())
    }
}

//! Read-only view over map-like collections.
//!
//! [`ChampMap::eq_map`](crate::ChampMap::eq_map) compares against anything
//! implementing [`MapView`], so a persistent map can be checked for equal
//! contents against standard library maps without converting either side.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// Key-to-value lookup with a known number of entries.
pub trait MapView<K, V> {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the view holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value stored for `key`, if any.
    fn lookup(&self, key: &K) -> Option<&V>;
}

impl<K: Hash + Eq, V, S: BuildHasher> MapView<K, V> for HashMap<K, V, S> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

impl<K: Ord, V> MapView<K, V> for BTreeMap<K, V> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

//! Persistent CHAMP map.

use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops;
use std::sync::Arc;

use crate::invariant::InvariantError;
use crate::iter::{Iter, Keys, Values};
use crate::ops::Root;
use crate::transient::TransientChampMap;
use crate::view::MapView;

/// Persistent hash map based on a CHAMP trie.
///
/// Every value is immutable: [`insert`](Self::insert) and
/// [`remove`](Self::remove) return a new map that shares all untouched
/// nodes with the original. Cloning is O(1), and maps can be read from any
/// number of threads at once without locking.
///
/// Same set of key-value pairs always produces the same trie structure
/// (canonical form), so equality first compares the cached size and
/// [`combined_hash`](Self::combined_hash).
///
/// ```
/// use champ_map::ChampMap;
///
/// let empty = ChampMap::new();
/// let (one, previous) = empty.insert("a", 1);
/// assert_eq!(previous, None);
/// assert_eq!(one.get(&"a"), Some(&1));
/// assert!(empty.is_empty());
/// ```
pub struct ChampMap<K, V> {
    pub(crate) root: Root<K, V>,
}

// ---------------------------------------------------------------------------
// Construction & accessors (no trait bounds)
// ---------------------------------------------------------------------------

impl<K, V> ChampMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self { root: Root::new() }
    }

    pub(crate) const fn from_root(root: Root<K, V>) -> Self {
        Self { root }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.root.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.size == 0
    }

    /// Returns the combined hash: XOR of `hash(key) ^ hash(value)` over all
    /// entries.
    ///
    /// Independent of insertion order; maintained incrementally.
    #[must_use]
    pub const fn combined_hash(&self) -> u32 {
        self.root.hash
    }

    /// Returns `true` if both maps share the same root node.
    ///
    /// Sharing implies equality; the converse does not hold.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root.node, &other.root.node)
    }

    /// Starts a transient session seeded with this map's entries.
    ///
    /// Nodes stay shared with `self` until the session first writes to them.
    #[must_use]
    pub fn transient(&self) -> TransientChampMap<K, V> {
        TransientChampMap::from_root(self.root.clone())
    }

    /// Returns an iterator over `(&K, &V)` pairs.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root.node, self.root.size)
    }

    /// Returns an iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> ChampMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_equivalent(key, K::eq)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if `other` holds exactly the same entries.
    pub fn eq_map<M>(&self, other: &M) -> bool
    where
        V: PartialEq,
        M: MapView<K, V> + ?Sized,
    {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.lookup(key) == Some(value))
    }
}

impl<K: Hash, V> ChampMap<K, V> {
    /// Looks up `key`, deciding key equality with `key_eq` for this call.
    ///
    /// `key_eq` must only accept keys with equal hashes.
    pub fn get_equivalent<F>(&self, key: &K, key_eq: F) -> Option<&V>
    where
        F: Fn(&K, &K) -> bool,
    {
        self.root.find(key, &key_eq).map(|entry| &entry.value)
    }

    /// Returns `true` if a key equivalent to `key` under `key_eq` is present.
    pub fn contains_key_equivalent<F>(&self, key: &K, key_eq: F) -> bool
    where
        F: Fn(&K, &K) -> bool,
    {
        self.get_equivalent(key, key_eq).is_some()
    }
}

// ---------------------------------------------------------------------------
// Write operations
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Hash + Clone> ChampMap<K, V> {
    /// Returns a map with `key` associated to `value`, and the value `key`
    /// had before.
    ///
    /// If the stored value already equals `value`, the returned map shares
    /// this map's root.
    #[must_use = "insert returns a new map and leaves this one unchanged"]
    pub fn insert(&self, key: K, value: V) -> (Self, Option<V>)
    where
        V: PartialEq,
    {
        self.insert_equivalent(key, value, K::eq, V::eq)
    }

    /// Returns a map without `key`, and the value it had.
    ///
    /// Removing a missing key returns a map sharing this map's root.
    #[must_use = "remove returns a new map and leaves this one unchanged"]
    pub fn remove(&self, key: &K) -> (Self, Option<V>) {
        self.remove_equivalent(key, K::eq)
    }

    /// Returns a map with every entry of `entries` added, later entries
    /// winning over earlier ones and over existing keys.
    ///
    /// Runs as one transient session, so nodes created along the way are
    /// edited in place instead of copied per entry.
    #[must_use]
    pub fn insert_all<I>(&self, entries: I) -> Self
    where
        V: PartialEq,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut transient = self.transient();
        transient.extend(entries);
        transient.freeze()
    }
}

impl<K: Hash + Clone, V: Hash + Clone> ChampMap<K, V> {
    /// [`insert`](Self::insert) with caller-supplied key and value equality
    /// for this call.
    #[must_use = "insert_equivalent returns a new map and leaves this one unchanged"]
    pub fn insert_equivalent<KE, VE>(
        &self,
        key: K,
        value: V,
        key_eq: KE,
        value_eq: VE,
    ) -> (Self, Option<V>)
    where
        KE: Fn(&K, &K) -> bool,
        VE: Fn(&V, &V) -> bool,
    {
        // The clone shares every node with `self`, so each edit copies.
        let mut root = self.root.clone();
        let previous = root.put(key, value, &key_eq, &value_eq);
        (Self::from_root(root), previous)
    }

    /// [`remove`](Self::remove) with caller-supplied key equality for this
    /// call.
    #[must_use = "remove_equivalent returns a new map and leaves this one unchanged"]
    pub fn remove_equivalent<F>(&self, key: &K, key_eq: F) -> (Self, Option<V>)
    where
        F: Fn(&K, &K) -> bool,
    {
        let mut root = self.root.clone();
        let previous = root.remove(key, &key_eq);
        (Self::from_root(root), previous)
    }
}

impl<K: Hash, V: Hash> ChampMap<K, V> {
    /// Checks every structural invariant and re-derives the cached size and
    /// combined hash.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant. A map built only through this
    /// crate's API never fails.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.root.validate()
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V> Clone for ChampMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<K, V> Default for ChampMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ChampMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for ChampMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.len() != other.len() || self.combined_hash() != other.combined_hash() {
            return false;
        }
        self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl<K: Hash + Eq, V: Eq> Eq for ChampMap<K, V> {}

impl<K, V> Hash for ChampMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.root.hash);
    }
}

impl<K, V, S> PartialEq<HashMap<K, V, S>> for ChampMap<K, V>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &HashMap<K, V, S>) -> bool {
        self.eq_map(other)
    }
}

impl<K: Hash + Eq, V> MapView<K, V> for ChampMap<K, V> {
    fn len(&self) -> usize {
        self.root.size
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
}

impl<K: Hash + Eq + Clone, V: Hash + PartialEq + Clone> FromIterator<(K, V)> for ChampMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut transient = TransientChampMap::new();
        transient.extend(iter);
        transient.freeze()
    }
}

impl<K: Hash + Eq, V> ops::Index<&K> for ChampMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V> IntoIterator for &'a ChampMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

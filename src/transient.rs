//! Transient (batch-mutable) CHAMP map.

use std::fmt;
use std::hash::Hash;

use crate::invariant::InvariantError;
use crate::map::ChampMap;
use crate::ops::Root;

/// Single-owner builder that edits a CHAMP trie in place.
///
/// A session starts empty or from a [`ChampMap`] (via
/// [`ChampMap::transient`] or `From`). Nodes the session allocates are
/// exclusively its own and are edited in place; nodes still shared with a
/// persistent map are copied on first write, so the source map is never
/// affected. [`freeze`](Self::freeze) consumes the builder and publishes
/// the trie as an immutable [`ChampMap`].
///
/// The builder is not `Clone`, and after `freeze` it no longer exists:
///
/// ```compile_fail
/// use champ_map::TransientChampMap;
///
/// let mut builder = TransientChampMap::new();
/// builder.put(1, "one");
/// let frozen = builder.freeze();
/// builder.put(2, "two");
/// ```
///
/// ```
/// use champ_map::{ChampMap, TransientChampMap};
///
/// let mut builder = TransientChampMap::new();
/// for i in 0..100 {
///     builder.put(i, i * 2);
/// }
/// let map: ChampMap<i32, i32> = builder.freeze();
/// assert_eq!(map.len(), 100);
/// assert_eq!(map.get(&21), Some(&42));
/// ```
pub struct TransientChampMap<K, V> {
    root: Root<K, V>,
}

// ---------------------------------------------------------------------------
// Construction & accessors (no trait bounds)
// ---------------------------------------------------------------------------

impl<K, V> TransientChampMap<K, V> {
    /// Creates an empty builder.
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

    /// Returns `true` if the builder contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.size == 0
    }

    /// Returns the combined hash of the current entries.
    #[must_use]
    pub const fn combined_hash(&self) -> u32 {
        self.root.hash
    }

    /// Ends the session and returns the built map.
    ///
    /// Every node becomes shared-immutable; later sessions started from the
    /// result copy before writing.
    #[must_use]
    pub fn freeze(self) -> ChampMap<K, V> {
        tracing::debug!(
            len = self.root.size,
            hash = self.root.hash,
            "froze transient map"
        );
        ChampMap::from_root(self.root)
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> TransientChampMap<K, V> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.root.find(key, &K::eq).map(|entry| &entry.value)
    }

    /// Returns `true` if the builder contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

// ---------------------------------------------------------------------------
// Write operations
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Hash + Clone> TransientChampMap<K, V> {
    /// Associates `value` with `key`, returning the previous value.
    ///
    /// Putting a value equal to the stored one changes nothing.
    pub fn put(&mut self, key: K, value: V) -> Option<V>
    where
        V: PartialEq,
    {
        self.root.put(key, value, &K::eq, &V::eq)
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.root.remove(key, &K::eq)
    }
}

impl<K: Hash + Clone, V: Hash + Clone> TransientChampMap<K, V> {
    /// [`put`](Self::put) with caller-supplied key and value equality for
    /// this call.
    pub fn put_equivalent<KE, VE>(
        &mut self,
        key: K,
        value: V,
        key_eq: KE,
        value_eq: VE,
    ) -> Option<V>
    where
        KE: Fn(&K, &K) -> bool,
        VE: Fn(&V, &V) -> bool,
    {
        self.root.put(key, value, &key_eq, &value_eq)
    }

    /// [`remove`](Self::remove) with caller-supplied key equality for this
    /// call.
    pub fn remove_equivalent<F>(&mut self, key: &K, key_eq: F) -> Option<V>
    where
        F: Fn(&K, &K) -> bool,
    {
        self.root.remove(key, &key_eq)
    }
}

impl<K: Hash, V: Hash> TransientChampMap<K, V> {
    /// Checks every structural invariant and re-derives the cached size and
    /// combined hash.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), InvariantError> {
        self.root.validate()
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V> Default for TransientChampMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> From<ChampMap<K, V>> for TransientChampMap<K, V> {
    fn from(map: ChampMap<K, V>) -> Self {
        Self::from_root(map.root)
    }
}

impl<K, V> fmt::Debug for TransientChampMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientChampMap")
            .field("len", &self.root.size)
            .field("hash", &format_args!("{:#010x}", self.root.hash))
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq + Clone, V: Hash + PartialEq + Clone> Extend<(K, V)> for TransientChampMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

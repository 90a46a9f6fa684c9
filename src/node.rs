//! CHAMP trie node types and bitmap helpers.

use std::fmt;
use std::sync::Arc;

use crate::hash::{BITS_PER_LEVEL, HASH_WIDTH};

/// Inline entry storing a key-value pair with its precomputed key hash.
#[derive(Clone)]
pub struct Entry<K, V> {
    /// Precomputed 32-bit hash of the key.
    pub hash: u32,
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

/// Cached arity class of a node, used to decide inlining on removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePredicate {
    /// No entries and no children. Only legal for the root.
    Empty,
    /// Exactly one entry and no children: the parent absorbs it.
    One,
    /// Anything larger; the node stays a sub-node.
    MoreThanOne,
}

/// Bitmap-compressed node covering one 5-bit slice of the hash.
///
/// Invariant: `data_map & node_map == 0`. `entries` and `children` hold the
/// present slots only, each in ascending slot order.
#[derive(Clone)]
pub struct CompactNode<K, V> {
    /// Bitmap of slots occupied by inline entries.
    pub data_map: u32,
    /// Bitmap of slots occupied by child nodes.
    pub node_map: u32,
    /// Inline entries, one per bit of `data_map`.
    pub entries: Vec<Entry<K, V>>,
    /// Child nodes, one per bit of `node_map`.
    pub children: Vec<Arc<Node<K, V>>>,
}

/// Linear node for keys whose hashes are equal across the full hash width.
///
/// Invariant: `entries.len() >= 2` once the node is reachable from a
/// published root.
#[derive(Clone)]
pub struct CollisionNode<K, V> {
    /// The hash shared by every entry.
    pub hash: u32,
    /// Entries in insertion order.
    pub entries: Vec<Entry<K, V>>,
}

/// CHAMP trie node.
#[derive(Clone)]
pub enum Node<K, V> {
    /// Bitmap-compressed node.
    Compact(CompactNode<K, V>),
    /// Full-width hash collision bucket.
    Collision(CollisionNode<K, V>),
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit hash fragment at the given bit-shift depth.
#[inline]
#[must_use]
pub const fn fragment(hash: u32, shift: u32) -> u32 {
    debug_assert!(shift < HASH_WIDTH);
    (hash >> shift) & 0x1F
}

/// Returns the single-bit mask for the given fragment (0..31).
#[inline]
#[must_use]
pub const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// Returns the compact index of `bit` within `bitmap`.
///
/// Counts the number of set bits below `bit`.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<K, V> Node<K, V> {
    /// Creates the empty root node.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Compact(CompactNode {
            data_map: 0,
            node_map: 0,
            entries: Vec::new(),
            children: Vec::new(),
        })
    }

    /// Builds the sub-node holding two entries that share a slot one level
    /// up, descending while their fragments agree.
    ///
    /// The entry with the lower slot index is stored first. Once `shift`
    /// passes the hash width the hashes are fully equal and a collision node
    /// is returned instead.
    pub fn merge_two_entries(first: Entry<K, V>, second: Entry<K, V>, shift: u32) -> Self {
        if shift >= HASH_WIDTH {
            debug_assert_eq!(first.hash, second.hash);
            tracing::trace!(hash = first.hash, "full-width hash collision");
            return Self::Collision(CollisionNode {
                hash: first.hash,
                entries: vec![first, second],
            });
        }

        let f1 = fragment(first.hash, shift);
        let f2 = fragment(second.hash, shift);

        if f1 == f2 {
            let child = Self::merge_two_entries(first, second, shift + BITS_PER_LEVEL);
            Self::Compact(CompactNode {
                data_map: 0,
                node_map: mask(f1),
                entries: Vec::new(),
                children: vec![Arc::new(child)],
            })
        } else {
            let entries = if f1 < f2 {
                vec![first, second]
            } else {
                vec![second, first]
            };
            Self::Compact(CompactNode {
                data_map: mask(f1) | mask(f2),
                node_map: 0,
                entries,
                children: Vec::new(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Node accessors
// ---------------------------------------------------------------------------

impl<K, V> Node<K, V> {
    /// Inline entries of this node, in slot order.
    #[must_use]
    pub fn entries(&self) -> &[Entry<K, V>] {
        match self {
            Self::Compact(node) => &node.entries,
            Self::Collision(node) => &node.entries,
        }
    }

    /// Child nodes (always empty for collision nodes).
    #[must_use]
    pub fn children(&self) -> &[Arc<Self>] {
        match self {
            Self::Compact(node) => &node.children,
            Self::Collision(_) => &[],
        }
    }

    /// Classifies this node's arity.
    #[must_use]
    pub fn size_predicate(&self) -> SizePredicate {
        if !self.children().is_empty() {
            return SizePredicate::MoreThanOne;
        }
        match self.entries().len() {
            0 => SizePredicate::Empty,
            1 => SizePredicate::One,
            _ => SizePredicate::MoreThanOne,
        }
    }

    /// Removes and returns the inline entry in the highest occupied slot.
    pub fn pop_entry(&mut self) -> Option<Entry<K, V>> {
        match self {
            Self::Compact(node) => {
                let entry = node.entries.pop()?;
                let highest = u32::BITS - 1 - node.data_map.leading_zeros();
                node.data_map ^= 1 << highest;
                Some(entry)
            }
            Self::Collision(node) => node.entries.pop(),
        }
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Grants write access to a node for the tree that holds `node`.
    ///
    /// A node referenced only through `node` belongs to the caller and is
    /// edited in place. A node still shared with another map is copied first
    /// and the copy takes its place.
    pub fn edit(node: &mut Arc<Self>) -> &mut Self {
        Arc::make_mut(node)
    }
}

// ---------------------------------------------------------------------------
// Slot migrations
// ---------------------------------------------------------------------------

impl<K, V> CompactNode<K, V> {
    /// Stores `entry` in the empty slot `bit`.
    pub fn insert_entry(&mut self, bit: u32, entry: Entry<K, V>) {
        debug_assert_eq!((self.data_map | self.node_map) & bit, 0);
        self.data_map |= bit;
        self.entries.insert(index(self.data_map, bit), entry);
    }

    /// Empties the data slot `bit`, returning its entry.
    pub fn remove_entry(&mut self, bit: u32) -> Entry<K, V> {
        debug_assert_ne!(self.data_map & bit, 0);
        let entry = self.entries.remove(index(self.data_map, bit));
        self.data_map ^= bit;
        entry
    }

    /// Turns the data slot `bit` into a child slot holding the entry stored
    /// there and `incoming`, merged one level down at `shift`.
    pub fn migrate_inline_to_child(&mut self, bit: u32, incoming: Entry<K, V>, shift: u32) {
        debug_assert_ne!(self.data_map & bit, 0);
        let existing = self.entries.remove(index(self.data_map, bit));
        self.data_map ^= bit;
        self.node_map |= bit;
        let child = Node::merge_two_entries(existing, incoming, shift);
        self.children.insert(index(self.node_map, bit), Arc::new(child));
    }

    /// Replaces the child slot `bit` by the inline `entry` that child held.
    pub fn migrate_child_to_inline(&mut self, bit: u32, entry: Entry<K, V>) {
        self.drop_child(bit);
        self.insert_entry(bit, entry);
    }

    /// Empties the child slot `bit`.
    pub fn drop_child(&mut self, bit: u32) {
        debug_assert_ne!(self.node_map & bit, 0);
        self.children.remove(index(self.node_map, bit));
        self.node_map ^= bit;
    }
}

// ---------------------------------------------------------------------------
// Manual trait impls: avoid false `K: Debug, V: Debug` bounds.
// ---------------------------------------------------------------------------

impl<K, V> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compact(node) => f
                .debug_struct("Compact")
                .field("data_map", &format_args!("{:#034b}", node.data_map))
                .field("node_map", &format_args!("{:#034b}", node.node_map))
                .field("children", &node.children)
                .finish(),
            Self::Collision(node) => f
                .debug_struct("Collision")
                .field("hash", &format_args!("{:#010x}", node.hash))
                .field("entries_len", &node.entries.len())
                .finish(),
        }
    }
}

//! Structural invariants of the trie.
//!
//! These are never triggered by ordinary use. They describe the shape every
//! reachable node must have and are checked by `validate()` on the map types
//! and, with the `debug-invariants` feature, after every mutation.

use crate::hash::{BITS_PER_LEVEL, HASH_WIDTH};
use crate::node::{Entry, Node, SizePredicate};

/// A violated trie invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// A slot is marked as both inline entry and child.
    #[error("data and node bitmaps overlap at depth {depth}: {overlap:#034b}")]
    OverlappingBitmaps {
        /// Trie level of the node.
        depth: usize,
        /// Bits set in both bitmaps.
        overlap: u32,
    },
    /// A bitmap and the storage it indexes disagree on arity.
    #[error("bitmap announces {expected} {kind} at depth {depth}, node stores {actual}")]
    ArityMismatch {
        /// Trie level of the node.
        depth: usize,
        /// `"entries"` or `"children"`.
        kind: &'static str,
        /// Population count of the bitmap.
        expected: usize,
        /// Length of the backing storage.
        actual: usize,
    },
    /// An entry sits in a slot its hash does not lead to.
    #[error("entry with hash {hash:#010x} stored off its hash path at depth {depth}")]
    MisplacedEntry {
        /// Trie level of the node.
        depth: usize,
        /// Cached hash of the entry.
        hash: u32,
    },
    /// A cached key hash differs from the key's current hash.
    #[error("cached key hash {cached:#010x} differs from recomputed {actual:#010x}")]
    StaleKeyHash {
        /// Hash stored with the entry.
        cached: u32,
        /// Hash of the key now.
        actual: u32,
    },
    /// A sub-node holds one entry and no children instead of being inlined.
    #[error("sub-node at depth {depth} holds a single entry and was not inlined")]
    UninlinedSingleton {
        /// Trie level of the sub-node.
        depth: usize,
    },
    /// A sub-node holds nothing.
    #[error("empty sub-node at depth {depth}")]
    EmptySubNode {
        /// Trie level of the sub-node.
        depth: usize,
    },
    /// A collision node with fewer than two entries.
    #[error("collision node at depth {depth} holds {len} entries")]
    UndersizedCollision {
        /// Trie level of the node.
        depth: usize,
        /// Number of entries it holds.
        len: usize,
    },
    /// A collision node above the last level, or a compact node below it.
    #[error("{kind} node found at depth {depth}")]
    WrongNodeKind {
        /// Trie level of the node.
        depth: usize,
        /// `"collision"` or `"compact"`.
        kind: &'static str,
    },
    /// The cached size differs from the number of reachable entries.
    #[error("cached size {cached} differs from {actual} live entries")]
    StaleSize {
        /// Size stored in the root handle.
        cached: usize,
        /// Entries found by a full scan.
        actual: usize,
    },
    /// The cached combined hash differs from a full re-derivation.
    #[error("cached combined hash {cached:#010x} differs from recomputed {actual:#010x}")]
    StaleHash {
        /// Hash stored in the root handle.
        cached: u32,
        /// Hash re-derived from all entries.
        actual: u32,
    },
}

/// Walks the tree under `root`, checking node shapes and calling `visit` on
/// every entry.
pub(crate) fn check_tree<K, V, F>(root: &Node<K, V>, visit: &mut F) -> Result<(), InvariantError>
where
    F: FnMut(&Entry<K, V>) -> Result<(), InvariantError>,
{
    check_node(root, 0, 0, visit)
}

/// Bits of the hash already fixed by the path to a node at `shift`.
const fn path_mask(shift: u32) -> u32 {
    if shift >= HASH_WIDTH {
        u32::MAX
    } else {
        (1 << shift) - 1
    }
}

fn check_node<K, V, F>(
    node: &Node<K, V>,
    shift: u32,
    prefix: u32,
    visit: &mut F,
) -> Result<(), InvariantError>
where
    F: FnMut(&Entry<K, V>) -> Result<(), InvariantError>,
{
    let depth = (shift / BITS_PER_LEVEL) as usize;

    match node {
        Node::Compact(compact) => {
            if shift >= HASH_WIDTH {
                return Err(InvariantError::WrongNodeKind { depth, kind: "compact" });
            }
            if shift > 0 {
                match node.size_predicate() {
                    SizePredicate::Empty => return Err(InvariantError::EmptySubNode { depth }),
                    SizePredicate::One => return Err(InvariantError::UninlinedSingleton { depth }),
                    SizePredicate::MoreThanOne => {}
                }
            }
            let overlap = compact.data_map & compact.node_map;
            if overlap != 0 {
                return Err(InvariantError::OverlappingBitmaps { depth, overlap });
            }
            check_arity(depth, "entries", compact.data_map, compact.entries.len())?;
            check_arity(depth, "children", compact.node_map, compact.children.len())?;

            let data_slots = slots(compact.data_map);
            for (slot, entry) in data_slots.zip(&compact.entries) {
                let expected = prefix | (slot << shift);
                if entry.hash & path_mask(shift + BITS_PER_LEVEL) != expected {
                    return Err(InvariantError::MisplacedEntry { depth, hash: entry.hash });
                }
                visit(entry)?;
            }

            let child_slots = slots(compact.node_map);
            for (slot, child) in child_slots.zip(&compact.children) {
                let child_prefix = prefix | (slot << shift);
                check_node(child, shift + BITS_PER_LEVEL, child_prefix, visit)?;
            }
            Ok(())
        }
        Node::Collision(collision) => {
            if shift < HASH_WIDTH {
                return Err(InvariantError::WrongNodeKind { depth, kind: "collision" });
            }
            if collision.entries.len() < 2 {
                return Err(InvariantError::UndersizedCollision {
                    depth,
                    len: collision.entries.len(),
                });
            }
            for entry in &collision.entries {
                if entry.hash != collision.hash || entry.hash != prefix {
                    return Err(InvariantError::MisplacedEntry { depth, hash: entry.hash });
                }
                visit(entry)?;
            }
            Ok(())
        }
    }
}

const fn check_arity(
    depth: usize,
    kind: &'static str,
    bitmap: u32,
    actual: usize,
) -> Result<(), InvariantError> {
    let expected = bitmap.count_ones() as usize;
    if expected == actual {
        Ok(())
    } else {
        Err(InvariantError::ArityMismatch {
            depth,
            kind,
            expected,
            actual,
        })
    }
}

/// Set bit positions of `bitmap`, lowest first.
fn slots(mut bitmap: u32) -> impl Iterator<Item = u32> {
    std::iter::from_fn(move || {
        if bitmap == 0 {
            return None;
        }
        let slot = bitmap.trailing_zeros();
        bitmap &= bitmap - 1;
        Some(slot)
    })
}

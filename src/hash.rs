//! Key and value hashing.
//!
//! The trie consumes 32-bit hashes, five bits per level. Every key and
//! value is hashed with [`DefaultHashBuilder`], whose 64-bit output is
//! folded down to the trie's hash width.
//!
//! The map's combined hash is the XOR of `hash(key) ^ hash(value)` over all
//! entries, so it is independent of insertion order and can be maintained
//! incrementally: adding and removing a contribution are the same XOR.

use std::hash::{BuildHasher, Hash};

/// Width in bits of the hashes the trie consumes.
pub const HASH_WIDTH: u32 = 32;

/// Bits of the hash consumed per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Maximum number of bitmap-indexed levels: `ceil(HASH_WIDTH / BITS_PER_LEVEL)`.
pub const MAX_DEPTH: usize = HASH_WIDTH.div_ceil(BITS_PER_LEVEL) as usize;

/// Hash builder used for keys and values.
#[cfg(feature = "fxhash")]
pub type DefaultHashBuilder = rustc_hash::FxBuildHasher;

/// Hash builder used for keys and values.
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultHashBuilder = std::hash::BuildHasherDefault<ahash::AHasher>;

/// Hash builder used for keys and values.
///
/// SipHash with fixed keys: the same value hashes identically in every map,
/// which lets separately built maps be compared by combined hash.
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultHashBuilder = std::hash::BuildHasherDefault<std::hash::DefaultHasher>;

/// Computes the 32-bit trie hash of a value.
#[must_use]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u32 {
    fold(DefaultHashBuilder::default().hash_one(value))
}

/// Contribution of a single entry to the combined hash.
#[must_use]
pub const fn entry_hash(key_hash: u32, value_hash: u32) -> u32 {
    key_hash ^ value_hash
}

#[allow(clippy::cast_possible_truncation)]
const fn fold(wide: u64) -> u32 {
    (wide as u32) ^ ((wide >> 32) as u32)
}

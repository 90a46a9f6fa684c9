//! Persistent hash map based on CHAMP, with a transient builder.
//!
//! CHAMP (Compressed Hash-Array Mapped Prefix-tree) is a refined HAMT that
//! guarantees **canonical form**: the same set of key-value pairs always
//! produces the same trie structure, regardless of insertion order or of
//! the removals that led there.
//!
//! # Key properties
//!
//! - **Structural sharing**: [`ChampMap`] values are immutable; updates copy
//!   only the path to the changed slot, and clones are O(1)
//! - **Batch construction**: [`TransientChampMap`] edits the nodes it owns
//!   in place and freezes into a [`ChampMap`]
//! - **Order-independent hashing**: a combined hash maintained on every
//!   update makes unequal maps cheap to tell apart
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # Cargo features
//!
//! - `fxhash` / `ahash`: swap the default SipHash-based hash builder for
//!   `rustc-hash` or `ahash` (see [`hash::DefaultHashBuilder`])
//! - `debug-invariants`: re-validate the whole trie after every mutation in
//!   debug builds
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015, "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Bagwell, 2001, "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod hash;
pub mod iter;

mod invariant;
mod map;
mod node;
mod ops;
mod transient;
mod view;

#[cfg(test)]
mod tests;

pub use invariant::InvariantError;
pub use map::ChampMap;
pub use transient::TransientChampMap;
pub use view::MapView;

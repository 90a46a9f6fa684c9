//! Iterator types for CHAMP maps.
//!
//! Traversal is depth-first and pre-order: a node's inline entries come
//! first, in slot order, then each child subtree, lowest slot first. The
//! order is stable for a given set of entries but unrelated to key order.

use std::iter::FusedIterator;
use std::slice;
use std::sync::Arc;

use arrayvec::ArrayVec;

use crate::hash::MAX_DEPTH;
use crate::node::{Entry, Node};

/// Iterator over references to key-value pairs in a [`ChampMap`](crate::ChampMap).
///
/// Keeps one frame per compact level on a fixed-size stack; a step never
/// allocates.
pub struct Iter<'a, K, V> {
    /// Unvisited children of each node on the current path.
    stack: ArrayVec<slice::Iter<'a, Arc<Node<K, V>>>, MAX_DEPTH>,
    /// Unconsumed inline entries of the current node.
    payload: slice::Iter<'a, Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: ArrayVec::new(),
            payload: slice::Iter::default(),
            remaining: len,
        };
        iter.enter(root);
        iter
    }

    fn enter(&mut self, node: &'a Node<K, V>) {
        self.payload = node.entries().iter();
        let children = node.children();
        if !children.is_empty() {
            self.stack.push(children.iter());
        }
    }

    /// Advances to the next node with inline entries. Returns `false` once
    /// the stack is exhausted.
    fn seek(&mut self) -> bool {
        loop {
            let Some(top) = self.stack.last_mut() else {
                return false;
            };
            match top.next() {
                Some(child) => {
                    self.enter(child);
                    if !self.payload.as_slice().is_empty() {
                        return true;
                    }
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.payload.next() {
            Some(entry) => entry,
            None if self.seek() => self.payload.next()?,
            None => return None,
        };
        self.remaining -= 1;
        Some((&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            payload: self.payload.clone(),
            remaining: self.remaining,
        }
    }
}

/// Iterator over the keys of a [`ChampMap`](crate::ChampMap).
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Iterator over the values of a [`ChampMap`](crate::ChampMap).
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) const fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

//! ValueChain: the ordered, append-only values of one key.
//!
//! Nodes live in a table-wide `SlotMap` arena and link forward through
//! generational keys; the chain itself is just `(head, tail, len)`, so
//! append is O(1) and the chain can be copied around as a plain value.

use core::fmt;
use core::iter::FusedIterator;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub(crate) struct ValueKey;
}

#[derive(Debug)]
pub(crate) struct ValueNode<V> {
    value: V,
    next: Option<ValueKey>,
}

pub(crate) type ValueArena<V> = SlotMap<ValueKey, ValueNode<V>>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ValueChain {
    head: Option<ValueKey>,
    tail: Option<ValueKey>,
    len: usize,
}

impl ValueChain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A chain holding exactly `value`.
    pub(crate) fn single<V>(arena: &mut ValueArena<V>, value: V) -> Self {
        let mut chain = Self::new();
        chain.append(arena, value);
        chain
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn append<V>(&mut self, arena: &mut ValueArena<V>, value: V) {
        let key = arena.insert(ValueNode { value, next: None });
        match self.tail {
            Some(tail) => arena[tail].next = Some(key),
            None => self.head = Some(key),
        }
        self.tail = Some(key);
        self.len += 1;
    }

    pub(crate) fn first<'a, V>(&self, arena: &'a ValueArena<V>) -> Option<&'a V> {
        self.head.map(|k| &arena[k].value)
    }

    pub(crate) fn iter<'a, V>(&self, arena: &'a ValueArena<V>) -> Values<'a, V> {
        Values {
            arena,
            next: self.head,
            remaining: self.len(),
        }
    }

    pub(crate) fn to_vec<V: Clone>(&self, arena: &ValueArena<V>) -> Vec<V> {
        self.iter(arena).cloned().collect()
    }

    /// Releases every node back to the arena, returning the values in order.
    /// The chain is left empty.
    pub(crate) fn drain<V>(&mut self, arena: &mut ValueArena<V>) -> Vec<V> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(k) = cursor {
            let node = arena.remove(k).expect("value chain links a freed node");
            cursor = node.next;
            out.push(node.value);
        }
        *self = Self::new();
        out
    }

    /// As `drain`, dropping the values in place.
    pub(crate) fn clear<V>(&mut self, arena: &mut ValueArena<V>) {
        let mut cursor = self.head;
        while let Some(k) = cursor {
            cursor = arena.remove(k).and_then(|node| node.next);
        }
        *self = Self::new();
    }
}

/// Values stored under one key, in insertion order.
pub struct Values<'a, V> {
    arena: &'a ValueArena<V>,
    next: Option<ValueKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.arena[self.next?];
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> FusedIterator for Values<'_, V> {}

impl<V> Clone for Values<'_, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Values<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let mut arena: ValueArena<i32> = SlotMap::with_key();
        let mut chain = ValueChain::single(&mut arena, 100);
        chain.append(&mut arena, 150);
        chain.append(&mut arena, 175);

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.first(&arena), Some(&100));
        assert_eq!(chain.to_vec(&arena), vec![100, 150, 175]);
        assert_eq!(chain.iter(&arena).len(), 3);
    }

    #[test]
    fn empty_chain_has_no_values() {
        let arena: ValueArena<i32> = SlotMap::with_key();
        let chain = ValueChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.first(&arena), None);
        assert_eq!(chain.iter(&arena).next(), None);
    }

    /// Invariant: chains sharing one arena stay independent.
    #[test]
    fn interleaved_chains_do_not_mix() {
        let mut arena: ValueArena<&str> = SlotMap::with_key();
        let mut a = ValueChain::single(&mut arena, "a1");
        let mut b = ValueChain::single(&mut arena, "b1");
        a.append(&mut arena, "a2");
        b.append(&mut arena, "b2");
        a.append(&mut arena, "a3");

        assert_eq!(a.to_vec(&arena), vec!["a1", "a2", "a3"]);
        assert_eq!(b.to_vec(&arena), vec!["b1", "b2"]);
    }

    #[test]
    fn drain_returns_values_and_frees_nodes() {
        let mut arena: ValueArena<String> = SlotMap::with_key();
        let mut keep = ValueChain::single(&mut arena, "keep".to_string());
        let mut chain = ValueChain::single(&mut arena, "x".to_string());
        chain.append(&mut arena, "y".to_string());

        let drained = chain.drain(&mut arena);
        assert_eq!(drained, vec!["x".to_string(), "y".to_string()]);
        assert!(chain.is_empty());
        assert_eq!(arena.len(), 1);

        keep.clear(&mut arena);
        assert!(keep.is_empty());
        assert!(arena.is_empty());
    }

    #[test]
    fn append_after_drain_starts_a_fresh_chain() {
        let mut arena: ValueArena<i32> = SlotMap::with_key();
        let mut chain = ValueChain::single(&mut arena, 1);
        let _ = chain.drain(&mut arena);
        chain.append(&mut arena, 2);
        assert_eq!(chain.to_vec(&arena), vec![2]);
    }

    #[test]
    fn values_debug_lists_entries() {
        let mut arena: ValueArena<i32> = SlotMap::with_key();
        let mut chain = ValueChain::single(&mut arena, 1);
        chain.append(&mut arena, 2);
        assert_eq!(format!("{:?}", chain.iter(&arena)), "[1, 2]");
    }
}

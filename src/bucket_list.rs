//! BucketList: a doubly linked list of key entries over shared arenas.
//!
//! A bucket stores only `(head, tail, len)`. Entries and their value nodes
//! live in an [`Arena`] owned by the table and passed in by reference, so
//! moving an entry between buckets during a resize is a relink, not a copy.
//!
//! Invariants (per bucket):
//! - Walking `next` from `head` visits every entry in link order and ends
//!   at `tail`; walking `prev` from `tail` is the exact reverse.
//! - `head.prev` and `tail.next` are `None`.
//! - At most one entry per key.

use crate::value_chain::{ValueArena, ValueChain, Values};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct KeyEntry<K> {
    pub(crate) key: K,
    pub(crate) chain: ValueChain,
    pub(crate) prev: Option<EntryKey>,
    pub(crate) next: Option<EntryKey>,
}

/// Storage shared by every bucket of one table.
#[derive(Debug)]
pub(crate) struct Arena<K, V> {
    pub(crate) entries: SlotMap<EntryKey, KeyEntry<K>>,
    pub(crate) values: ValueArena<V>,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            values: SlotMap::with_key(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.values.clear();
    }
}

/// What an insert did to the key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was absent; a new entry now holds the value.
    NewKey,
    /// The key was present; the value went to the end of its chain.
    Appended,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct BucketList {
    head: Option<EntryKey>,
    tail: Option<EntryKey>,
    len: usize,
}

impl BucketList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn head(&self) -> Option<EntryKey> {
        self.head
    }

    pub(crate) fn find<K: Eq, V>(&self, arena: &Arena<K, V>, key: &K) -> Option<EntryKey> {
        self.iter(arena).find(|&e| arena.entries[e].key == *key)
    }

    pub(crate) fn insert_or_append<K: Eq, V>(
        &mut self,
        arena: &mut Arena<K, V>,
        key: K,
        value: V,
    ) -> InsertOutcome {
        if let Some(e) = self.find(arena, &key) {
            arena.entries[e].chain.append(&mut arena.values, value);
            return InsertOutcome::Appended;
        }
        let chain = ValueChain::single(&mut arena.values, value);
        let e = arena.entries.insert(KeyEntry {
            key,
            chain,
            prev: None,
            next: None,
        });
        self.link_back(arena, e);
        InsertOutcome::NewKey
    }

    pub(crate) fn remove<K: Eq, V>(&mut self, arena: &mut Arena<K, V>, key: &K) -> bool {
        let Some(e) = self.find(arena, key) else {
            return false;
        };
        self.unlink(arena, e);
        if let Some(mut entry) = arena.entries.remove(e) {
            entry.chain.clear(&mut arena.values);
        }
        true
    }

    /// Removes the entry for `key`, returning the owned key and its values.
    pub(crate) fn take<K: Eq, V>(
        &mut self,
        arena: &mut Arena<K, V>,
        key: &K,
    ) -> Option<(K, Vec<V>)> {
        let e = self.find(arena, key)?;
        self.unlink(arena, e);
        let mut entry = arena.entries.remove(e)?;
        let values = entry.chain.drain(&mut arena.values);
        Some((entry.key, values))
    }

    /// First value stored under `key`.
    pub(crate) fn search<'a, K: Eq, V>(&self, arena: &'a Arena<K, V>, key: &K) -> Option<&'a V> {
        let e = self.find(arena, key)?;
        let chain = &arena.entries[e].chain;
        debug_assert!(!chain.is_empty(), "live entry with an empty chain");
        chain.first(&arena.values)
    }

    pub(crate) fn all_values<'a, K: Eq, V>(
        &self,
        arena: &'a Arena<K, V>,
        key: &K,
    ) -> Option<Values<'a, V>> {
        let e = self.find(arena, key)?;
        Some(arena.entries[e].chain.iter(&arena.values))
    }

    /// Links an unlinked entry at the tail. Performs no lookup, so the
    /// caller guarantees the key is not already in this bucket.
    pub(crate) fn link_back<K, V>(&mut self, arena: &mut Arena<K, V>, e: EntryKey) {
        let node = &mut arena.entries[e];
        node.prev = self.tail;
        node.next = None;
        match self.tail {
            Some(tail) => arena.entries[tail].next = Some(e),
            None => self.head = Some(e),
        }
        self.tail = Some(e);
        self.len += 1;
    }

    /// Detaches `e`, repairing head/tail and neighbour links. The entry
    /// stays in the arena with cleared links.
    pub(crate) fn unlink<K, V>(&mut self, arena: &mut Arena<K, V>, e: EntryKey) {
        let (prev, next) = {
            let node = &mut arena.entries[e];
            (node.prev.take(), node.next.take())
        };
        match prev {
            Some(p) => arena.entries[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => arena.entries[n].prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
    }

    /// Entry keys from head to tail.
    pub(crate) fn iter<'a, K, V>(
        &self,
        arena: &'a Arena<K, V>,
    ) -> impl Iterator<Item = EntryKey> + 'a {
        core::iter::successors(self.head, move |&e| arena.entries[e].next)
    }

    /// Entry keys from tail to head.
    #[cfg(test)]
    pub(crate) fn iter_rev<'a, K, V>(
        &self,
        arena: &'a Arena<K, V>,
    ) -> impl Iterator<Item = EntryKey> + 'a {
        core::iter::successors(self.tail, move |&e| arena.entries[e].prev)
    }
}

//! ChainedHashTable: resizable separate-chaining table with multi-valued keys.

use crate::bucket_list::{Arena, BucketList, EntryKey, InsertOutcome};
use crate::config::{ConfigError, TableConfig};
use crate::dump::Dump;
use crate::strategy::{Division, HashStrategy, IntegerKey};
use crate::value_chain::Values;
use core::fmt;
use log::{debug, trace};

/// A hash table whose buckets are doubly linked lists of keys and whose keys
/// each own an ordered chain of values.
///
/// `len()` counts keys, not values: inserting a value under a key that is
/// already present appends to that key's chain and leaves the load factor
/// unchanged. The bucket count doubles once `len / capacity` reaches the
/// configured load factor and halves once it falls to the shrink factor,
/// never going below the initial capacity.
pub struct ChainedHashTable<K, V, H = Division> {
    strategy: H,
    buckets: Vec<BucketList>,
    arena: Arena<K, V>,
    len: usize,
    config: TableConfig,
    resizes: usize,
}

impl<K, V> ChainedHashTable<K, V, Division>
where
    K: IntegerKey,
{
    /// Integer-keyed table using the division method and the default policy.
    pub fn new() -> Self {
        Self::with_strategy(Division)
    }
}

impl<K, V, H> Default for ChainedHashTable<K, V, H>
where
    K: Eq,
    H: HashStrategy<K> + Default,
{
    fn default() -> Self {
        Self::with_strategy(H::default())
    }
}

impl<K, V, H> ChainedHashTable<K, V, H>
where
    K: Eq,
    H: HashStrategy<K>,
{
    pub fn with_strategy(strategy: H) -> Self {
        Self::from_parts(strategy, TableConfig::default())
    }

    /// Builds a table with a custom resize policy, rejecting invalid ones.
    pub fn with_config(strategy: H, config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(strategy, config))
    }

    fn from_parts(strategy: H, config: TableConfig) -> Self {
        Self {
            strategy,
            buckets: vec![BucketList::new(); config.initial_capacity],
            arena: Arena::new(),
            len: 0,
            config,
            resizes: 0,
        }
    }

    #[inline]
    fn bucket_index(&self, key: &K) -> usize {
        let capacity = self.buckets.len();
        let index = self.strategy.index(key, capacity);
        debug_assert!(index < capacity, "strategy returned {index} for capacity {capacity}");
        index
    }

    /// Stores `value` under `key`, appending to the key's chain if present.
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome {
        let index = self.bucket_index(&key);
        let outcome = self.buckets[index].insert_or_append(&mut self.arena, key, value);
        if outcome == InsertOutcome::NewKey {
            self.len += 1;
            trace!("new key entry in bucket {index} ({} keys)", self.len);
            if self.config.should_grow(self.len, self.capacity()) {
                self.resize(self.capacity() * 2);
            }
        }
        outcome
    }

    /// Removes `key` and all its values. Returns whether the key was present.
    pub fn remove(&mut self, key: &K) -> bool {
        let index = self.bucket_index(key);
        if !self.buckets[index].remove(&mut self.arena, key) {
            return false;
        }
        self.after_remove(index);
        true
    }

    /// Removes `key`, returning its values in insertion order.
    pub fn take(&mut self, key: &K) -> Option<Vec<V>> {
        let index = self.bucket_index(key);
        let (_key, values) = self.buckets[index].take(&mut self.arena, key)?;
        self.after_remove(index);
        Some(values)
    }

    fn after_remove(&mut self, index: usize) {
        self.len -= 1;
        trace!("removed key entry from bucket {index} ({} keys)", self.len);
        if self.config.should_shrink(self.len, self.capacity()) {
            self.resize(self.capacity() / 2);
        }
    }

    /// First value stored under `key`.
    pub fn find(&self, key: &K) -> Option<&V> {
        self.buckets[self.bucket_index(key)].search(&self.arena, key)
    }

    /// Every value stored under `key`, in insertion order.
    pub fn all_values(&self, key: &K) -> Option<Values<'_, V>> {
        self.buckets[self.bucket_index(key)].all_values(&self.arena, key)
    }

    /// Owned copy of every value stored under `key`, in insertion order.
    pub fn get_all(&self, key: &K) -> Option<Vec<V>>
    where
        V: Clone,
    {
        let bucket = &self.buckets[self.bucket_index(key)];
        let e = bucket.find(&self.arena, key)?;
        Some(self.arena.entries[e].chain.to_vec(&self.arena.values))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.buckets[self.bucket_index(key)]
            .find(&self.arena, key)
            .is_some()
    }

    /// Rebuilds the bucket array at `new_capacity`.
    ///
    /// Entries are relinked in the old array's traversal order, so each
    /// bucket keeps its relative order and every value chain is untouched.
    /// Relinking goes through `link_back` directly and never re-enters the
    /// grow/shrink checks.
    fn resize(&mut self, new_capacity: usize) {
        debug!(
            "resizing table: {} -> {} buckets ({} keys, {} values)",
            self.buckets.len(),
            new_capacity,
            self.len,
            self.arena.values.len()
        );
        let mut buckets = vec![BucketList::new(); new_capacity];
        for old in &self.buckets {
            let mut cursor = old.head();
            while let Some(e) = cursor {
                let entry = &self.arena.entries[e];
                cursor = entry.next;
                let index = self.strategy.index(&entry.key, new_capacity);
                debug_assert!(index < new_capacity);
                buckets[index].link_back(&mut self.arena, e);
            }
        }
        self.buckets = buckets;
        self.resizes += 1;
    }
}

impl<K, V, H> ChainedHashTable<K, V, H> {
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of stored values across all keys.
    pub fn value_count(&self) -> usize {
        self.arena.values.len()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity() as f64
    }

    /// Number of grow or shrink operations performed so far.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn strategy(&self) -> &H {
        &self.strategy
    }

    /// Removes every key and restores the initial capacity.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.buckets = vec![BucketList::new(); self.config.initial_capacity];
        self.len = 0;
    }

    /// Keys with their values, bucket by bucket and in link order within a
    /// bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Values<'_, V>)> + '_ {
        self.buckets
            .iter()
            .flat_map(move |b| b.iter(&self.arena).map(move |e| self.entry_view(e)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Contents of each bucket in link order, paired with the bucket index.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, Vec<(&K, Values<'_, V>)>)> + '_ {
        self.buckets.iter().enumerate().map(move |(i, b)| {
            let mut entries = Vec::with_capacity(b.len());
            entries.extend(b.iter(&self.arena).map(|e| self.entry_view(e)));
            (i, entries)
        })
    }

    fn entry_view(&self, e: EntryKey) -> (&K, Values<'_, V>) {
        let entry = &self.arena.entries[e];
        (&entry.key, entry.chain.iter(&self.arena.values))
    }

    /// Read-only rendering of every bucket; see [`Dump`].
    pub fn dump(&self) -> Dump<'_, K, V, H> {
        Dump::new(self)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for ChainedHashTable<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<K, V, H> ChainedHashTable<K, V, H>
where
    K: Eq + fmt::Debug,
    H: HashStrategy<K>,
{
    /// Panics unless every structural invariant holds.
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.capacity();
        assert!(capacity > 0, "capacity must be positive");
        assert!(capacity >= self.config.initial_capacity);
        assert_eq!(capacity % self.config.initial_capacity, 0);
        assert!((capacity / self.config.initial_capacity).is_power_of_two());
        assert_eq!(self.len, self.arena.entries.len(), "len counts key entries");

        let mut linked = 0;
        let mut chained_values = 0;
        for (i, bucket) in self.buckets.iter().enumerate() {
            let forward: Vec<_> = bucket.iter(&self.arena).collect();
            let mut backward: Vec<_> = bucket.iter_rev(&self.arena).collect();
            backward.reverse();
            assert_eq!(forward, backward, "bucket {i} links disagree");
            assert_eq!(forward.len(), bucket.len(), "bucket {i} len");

            let mut prev = None;
            for (pos, &e) in forward.iter().enumerate() {
                let entry = &self.arena.entries[e];
                assert_eq!(entry.prev, prev, "bucket {i} prev link");
                assert_eq!(
                    self.strategy.index(&entry.key, capacity),
                    i,
                    "key {:?} in wrong bucket",
                    entry.key
                );
                for &other in &forward[pos + 1..] {
                    assert!(
                        self.arena.entries[other].key != entry.key,
                        "key {:?} duplicated in bucket {i}",
                        entry.key
                    );
                }
                assert!(!entry.chain.is_empty());
                assert_eq!(entry.chain.iter(&self.arena.values).count(), entry.chain.len());
                chained_values += entry.chain.len();
                prev = Some(e);
            }
            linked += forward.len();
        }
        assert_eq!(linked, self.len, "every entry is linked exactly once");
        assert_eq!(chained_values, self.arena.values.len(), "no orphaned values");
    }
}

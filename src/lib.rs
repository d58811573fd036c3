//! chained-multimap: a resizable separate-chaining hash table whose keys
//! each hold an ordered chain of values.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a chained hash table built in small layers, each with its own
//!   invariant, so the whole can be checked piece by piece.
//! - Layers:
//!   - ValueChain: append-only singly linked values of one key; O(1)
//!     append through a retained tail.
//!   - BucketList: doubly linked list of key entries; find, insert-or-append,
//!     remove with head/tail/middle repair, and raw relinking for resizes.
//!   - HashStrategy: `(key, capacity) -> index`. Division and
//!     multiplication (Knuth) methods for integer keys, plus `Hashed` for any
//!     `K: Hash` through a `BuildHasher`.
//!   - ChainedHashTable<K, V, H>: public API; owns the bucket array, the
//!     strategy and the grow/shrink policy.
//!
//! Storage
//! - Every key entry and every value node lives in a table-wide
//!   `slotmap::SlotMap`; links are generational keys, never references.
//! - A bucket is `(head, tail, len)`. Resizing builds a fresh array of empty
//!   buckets and relinks existing entries into it; nothing is reallocated
//!   per entry and value chains are not touched.
//!
//! Sizing semantics
//! - `len()` is the number of distinct keys. Appending a value to an
//!   existing key does not change it and cannot trigger growth.
//!   `value_count()` is the total number of stored values.
//! - Grow (double) when `len / capacity >= load_factor` after inserting a
//!   new key; shrink (halve) when `len / capacity <= shrink_factor` after a
//!   removal, never below the initial capacity. Defaults: 16, 0.75, 0.25.
//! - A rehash relinks entries directly and never consults the policy, so a
//!   single insert or remove performs at most one resize.
//!
//! Ordering
//! - Within a bucket, entries stay in link order (insertion order, with
//!   resizes preserving relative order). Within a key, values stay in
//!   insertion order. Nothing else about iteration order is promised.
//!
//! Notes and non-goals
//! - Single-threaded; callers sharing a table must serialize access.
//! - No removal of individual values; remove or take drops a whole key.
//! - A strategy returning an index `>= capacity` is a contract violation and
//!   panics on the bucket lookup.

mod bucket_list;
mod chained_hash_table;
pub mod config;
mod dump;
pub mod strategy;
mod table_proptest;
mod value_chain;

// Public surface
pub use bucket_list::InsertOutcome;
pub use chained_hash_table::ChainedHashTable;
pub use config::{ConfigError, TableConfig};
pub use dump::Dump;
pub use strategy::{Division, HashStrategy, Hashed, IntegerKey, Multiplication};
pub use value_chain::Values;

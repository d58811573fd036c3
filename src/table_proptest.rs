#![cfg(test)]

// Property tests for ChainedHashTable kept inside the crate so they can
// check internal link invariants after every operation.

use crate::bucket_list::InsertOutcome;
use crate::chained_hash_table::ChainedHashTable;
use crate::config::TableConfig;
use crate::strategy::{Division, HashStrategy, Multiplication};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations: indices shrink toward earlier keys and op lists
// shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Take(usize),
    Find(usize),
    AllValues(usize),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i64>, Vec<Op>)> {
    proptest::collection::btree_set(-200i64..200, 1..=40).prop_flat_map(|pool| {
        let pool: Vec<i64> = pool.into_iter().collect();
        let idx = 0..pool.len();
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            1 => idx.clone().prop_map(Op::Take),
            2 => idx.clone().prop_map(Op::Find),
            2 => idx.clone().prop_map(Op::AllValues),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Sends every key to bucket 0, turning the table into one long chain.
#[derive(Clone, Copy, Default)]
struct SingleBucket;

impl HashStrategy<i64> for SingleBucket {
    fn index(&self, _key: &i64, _capacity: usize) -> usize {
        0
    }
}

// Runs `ops` against the table and a HashMap<K, Vec<V>> model.
// Invariants exercised after every step:
// - links, bucket placement and len bookkeeping (`assert_invariants`);
// - find/all_values/len/value_count parity with the model;
// - at most one resize per operation;
// - after an insert of a new key the load factor is below the grow bound;
// - after a removal the table is above the shrink bound or at its floor.
fn run<H: HashStrategy<i64>>(
    mut sut: ChainedHashTable<i64, i32, H>,
    pool: &[i64],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<i64, Vec<i32>> = HashMap::new();
    let config = *sut.config();

    for op in ops {
        let resizes_before = sut.resize_count();
        match op {
            Op::Insert(i, v) => {
                let k = pool[i];
                let expected = if model.contains_key(&k) {
                    InsertOutcome::Appended
                } else {
                    InsertOutcome::NewKey
                };
                prop_assert_eq!(sut.insert(k, v), expected);
                model.entry(k).or_default().push(v);
                prop_assert!(sut.load_factor() < config.load_factor);
            }
            Op::Remove(i) => {
                let k = pool[i];
                let capacity_before = sut.capacity();
                let removed = sut.remove(&k);
                prop_assert_eq!(removed, model.remove(&k).is_some());
                if !removed {
                    prop_assert_eq!(sut.capacity(), capacity_before);
                }
                prop_assert!(
                    sut.capacity() == config.initial_capacity
                        || sut.load_factor() > config.shrink_factor
                );
            }
            Op::Take(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.take(&k), model.remove(&k));
            }
            Op::Find(i) => {
                let k = pool[i];
                let expected = model.get(&k).and_then(|vs| vs.first());
                prop_assert_eq!(sut.find(&k), expected);
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            Op::AllValues(i) => {
                let k = pool[i];
                let got: Option<Vec<i32>> = sut.all_values(&k).map(|vs| vs.copied().collect());
                prop_assert_eq!(got.as_ref(), model.get(&k));
            }
            Op::Iterate => {
                let s_keys: BTreeSet<_> = sut.keys().copied().collect();
                let m_keys: BTreeSet<_> = model.keys().copied().collect();
                prop_assert_eq!(s_keys, m_keys);
                for (k, vs) in sut.iter() {
                    let vs: Vec<i32> = vs.copied().collect();
                    prop_assert_eq!(Some(&vs), model.get(k));
                }
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), config.initial_capacity);
            }
        }

        sut.assert_invariants();
        prop_assert!(sut.resize_count() - resizes_before <= 1, "resize storm");
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.value_count(), model.values().map(Vec::len).sum::<usize>());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine_division((pool, ops) in arb_scenario()) {
        run(ChainedHashTable::with_strategy(Division), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_multiplication((pool, ops) in arb_scenario()) {
        run(ChainedHashTable::with_strategy(Multiplication), &pool, ops)?;
    }

    // Worst-case collisions: every key shares one bucket, stressing
    // head/tail/middle unlink repair.
    #[test]
    fn prop_state_machine_single_bucket((pool, ops) in arb_scenario()) {
        run(ChainedHashTable::with_strategy(SingleBucket), &pool, ops)?;
    }

    // Small initial capacity so grow/shrink cycles happen constantly.
    #[test]
    fn prop_state_machine_small_table((pool, ops) in arb_scenario()) {
        let config = TableConfig::new().with_initial_capacity(2);
        let sut = ChainedHashTable::with_config(Multiplication, config).unwrap();
        run(sut, &pool, ops)?;
    }
}

use chained_multimap::{ChainedHashTable, Multiplication, TableConfig};
use proptest::prelude::*;
use std::collections::HashMap;

// Model inserts and removals over a small key space and assert every key
// resolves like a HashMap<K, Vec<V>> while the table grows and shrinks.
proptest! {
    #[test]
    fn prop_lookups_match_model_across_resizes(
        ops in proptest::collection::vec((any::<bool>(), -64i32..64, any::<u16>()), 1..400)
    ) {
        let mut t = ChainedHashTable::with_strategy(Multiplication);
        let mut model: HashMap<i32, Vec<u16>> = HashMap::new();

        for (insert, k, v) in ops {
            let capacity_before = t.capacity();
            let resizes_before = t.resize_count();
            if insert {
                t.insert(k, v);
                model.entry(k).or_default().push(v);
            } else {
                let removed = t.remove(&k);
                prop_assert_eq!(removed, model.remove(&k).is_some());
                if !removed {
                    prop_assert_eq!(t.capacity(), capacity_before);
                }
            }
            prop_assert!(t.resize_count() <= resizes_before + 1);
            prop_assert!(t.capacity() >= 16);
            prop_assert_eq!(t.len(), model.len());
        }

        for k in -64i32..64 {
            let got: Option<Vec<u16>> = t.all_values(&k).map(|vs| vs.copied().collect());
            prop_assert_eq!(got.as_ref(), model.get(&k));
            prop_assert_eq!(t.find(&k), model.get(&k).and_then(|vs| vs.first()));
        }
    }

    // Grow-only workload: capacity is the smallest power-of-two multiple of
    // the initial capacity that keeps the load factor below 0.75.
    #[test]
    fn prop_capacity_follows_key_count(n in 0usize..600, shift in 0u32..6) {
        let initial = 1usize << shift;
        let config = TableConfig::new().with_initial_capacity(initial);
        let mut t = ChainedHashTable::with_config(Multiplication, config).unwrap();
        for k in 0..n as u64 {
            t.insert(k, ());
        }
        let mut expected = initial;
        while n as f64 >= 0.75 * expected as f64 {
            expected *= 2;
        }
        prop_assert_eq!(t.capacity(), expected);
    }
}

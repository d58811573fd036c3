//! Human-readable bucket dump for debugging.

use crate::chained_hash_table::ChainedHashTable;
use core::fmt;

const RULE: &str = "-------------------------------";

/// Renders every key of a table, one line per key, as
/// `[bucket] key: v1 -> v2 -> ...`, between a header and a closing rule.
///
/// Produced by [`ChainedHashTable::dump`]; formatting never mutates the
/// table.
pub struct Dump<'a, K, V, H> {
    table: &'a ChainedHashTable<K, V, H>,
}

impl<'a, K, V, H> Dump<'a, K, V, H> {
    pub(crate) fn new(table: &'a ChainedHashTable<K, V, H>) -> Self {
        Self { table }
    }
}

impl<K: fmt::Display, V: fmt::Display, H> fmt::Display for Dump<'_, K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Hash Table ({} keys, {} buckets):",
            self.table.len(),
            self.table.capacity()
        )?;
        writeln!(f, "{RULE}")?;
        for (bucket, entries) in self.table.buckets() {
            for (key, values) in entries {
                write!(f, "[{bucket}] {key}:")?;
                for (i, value) in values.enumerate() {
                    let sep = if i == 0 { " " } else { " -> " };
                    write!(f, "{sep}{value}")?;
                }
                writeln!(f)?;
            }
        }
        write!(f, "{RULE}")
    }
}

#[cfg(test)]
mod tests {
    use crate::chained_hash_table::ChainedHashTable;

    #[test]
    fn dump_lists_keys_with_chained_values() {
        let mut t: ChainedHashTable<i32, i32> = ChainedHashTable::new();
        t.insert(10, 100);
        t.insert(20, 200);
        t.insert(10, 150);

        let out = t.dump().to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Hash Table (2 keys, 16 buckets):",
                "-------------------------------",
                "[4] 20: 200",
                "[10] 10: 100 -> 150",
                "-------------------------------",
            ]
        );
    }

    #[test]
    fn dump_of_empty_table_is_just_the_frame() {
        let t: ChainedHashTable<u8, u8> = ChainedHashTable::new();
        assert_eq!(t.dump().to_string().lines().count(), 3);
    }
}

//! Statistics and introspection for radix tables.
//!
//! Useful when tuning a [`TableConfig`](crate::config::TableConfig) for a workload, or to check
//! how well a key type spreads over the node store.

use std::fmt;

pub trait TableStatsTrait {
    fn get_table_stats(&self) -> TableStats;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStats {
    /// Bucket count of the node store; zero before the first insert.
    pub capacity: usize,
    /// Buckets holding a trie node.
    pub num_nodes: usize,
    /// Nodes that carry no payload, only live references from longer keys. Unlike the other
    /// fields, which are running totals, this one is counted by scanning every bucket.
    pub num_internal_nodes: usize,
    pub num_tombstones: usize,
    pub num_keys: usize,
    pub num_inserts: u64,
    pub num_collisions: u64,
    pub arena_pages: usize,
    pub arena_free_slots: usize,
    /// `num_nodes / capacity`.
    pub load_factor: f64,
}

impl TableStats {
    /// Average number of trie nodes per stored key.
    pub fn nodes_per_key(&self) -> f64 {
        if self.num_keys == 0 {
            return 0.0;
        }
        self.num_nodes as f64 / self.num_keys as f64
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "keys:        {}", self.num_keys)?;
        writeln!(
            f,
            "nodes:       {} ({} internal, {:.2} per key)",
            self.num_nodes,
            self.num_internal_nodes,
            self.nodes_per_key()
        )?;
        writeln!(
            f,
            "buckets:     {} ({:.1}% live, {} tombstones)",
            self.capacity,
            self.load_factor * 100.0,
            self.num_tombstones
        )?;
        writeln!(
            f,
            "inserts:     {} ({} collisions)",
            self.num_inserts, self.num_collisions
        )?;
        write!(
            f,
            "arena:       {} pages, {} free slots",
            self.arena_pages, self.arena_free_slots
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    #[test]
    fn stats_of_empty_table() {
        let stats = Table::<u32, ()>::new().get_table_stats();
        assert_eq!(stats, TableStats::default());
        assert_eq!(stats.nodes_per_key(), 0.0);
    }

    #[test]
    fn stats_track_nodes_and_tombstones() {
        let mut table = Table::<u16, ()>::new();
        for k in 0..10u16 {
            table.insert(k, ()).unwrap();
        }
        let stats = table.get_table_stats();
        // One shared high-byte node plus one node per key.
        assert_eq!(stats.num_nodes, 11);
        assert_eq!(stats.num_internal_nodes, 1);
        assert_eq!(stats.num_keys, 10);
        assert_eq!(stats.capacity, 256);
        assert!((stats.load_factor - 11.0 / 256.0).abs() < 1e-9);

        table.erase_key(&3);
        let stats = table.get_table_stats();
        assert_eq!(stats.num_tombstones, 1);
        assert_eq!(stats.arena_free_slots, 1);
        let shown = stats.to_string();
        assert!(shown.contains("keys:        9"), "{shown}");
    }
}

//! The engine shared by [`RadixMap`](crate::map::RadixMap) and [`RadixSet`](crate::set::RadixSet).
//!
//! [`Table`] stores an ordered set of keys, each with a payload, as an implicit radix trie over
//! the keys' base-256 digits. There are no child pointers: every trie node lives in one
//! open-addressed, linearly probed bucket array, at the position given by hashing its
//! `(depth, prefix, ordinal)` identity. A node exists exactly while at least one stored key
//! passes through it; its live count is the number of such keys, and a node whose count drops to
//! zero becomes a tombstone so that longer probe chains through it stay intact.
//!
//! Payloads live in an [`Arena`] and are referenced from their final node by a stable handle, so
//! they never move when the bucket array is resized. Cursors (see [`crate::cursor`]) lean on
//! that to survive resizes.
//!
//! Point operations cost `O(L)` probes for an `L`-digit key. Ordered traversal is implemented in
//! [`crate::cursor`].

use std::borrow::Borrow;
use std::mem;

use crate::config::TableConfig;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::keys::{Digits, TrieKey};
use crate::node::{Bucket, Node, Tag};
use crate::stats::{TableStats, TableStatsTrait};
use crate::utils::arena::{Arena, SlotId};
use crate::utils::murmur::{identity_hash, slot_hash};

/// Slot hash of the node `(depth, prefix, ordinal)`.
#[inline]
pub(crate) fn node_hash<D: Digits>(depth: usize, prefix: &D, ordinal: u8) -> u64 {
    slot_hash(identity_hash(depth, prefix.fingerprint()), ordinal)
}

pub struct Table<K: TrieKey, V> {
    pub(crate) buckets: Vec<Bucket<K::Digits>>,
    pub(crate) arena: Arena<(K, V)>,
    config: TableConfig,
    /// Buckets holding a node.
    num_entries: usize,
    num_tombstones: usize,
    /// Stored keys; also the number of nodes with a payload.
    pub(crate) num_final_entries: usize,
    /// Empty buckets that may still be claimed before the array has to be rebuilt.
    remaining_inserts: usize,
    num_inserts: u64,
    num_collisions: u64,
}

impl<K: TrieKey, V> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TrieKey, V> Table<K, V> {
    /// An empty table with the default configuration. Nothing is allocated until the first
    /// insert.
    pub fn new() -> Self {
        Self::with_valid_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Ok(Self::with_valid_config(config.validate()?))
    }

    fn with_valid_config(config: TableConfig) -> Self {
        Self {
            buckets: Vec::new(),
            arena: Arena::new(config.arena_page_size),
            config,
            num_entries: 0,
            num_tombstones: 0,
            num_final_entries: 0,
            remaining_inserts: 0,
            num_inserts: 0,
            num_collisions: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.num_final_entries
    }

    pub fn is_empty(&self) -> bool {
        self.num_final_entries == 0
    }

    /// Current bucket count of the node store.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Number of insert-family calls made, successful or not.
    pub fn num_inserts(&self) -> u64 {
        self.num_inserts
    }

    /// Occupied buckets stepped over while placing nodes, across the table's lifetime.
    pub fn num_collisions(&self) -> u64 {
        self.num_collisions
    }

    /// Drop every entry and release the node store and the arena.
    pub fn clear(&mut self) {
        self.buckets = Vec::new();
        self.arena.clear();
        self.num_entries = 0;
        self.num_tombstones = 0;
        self.num_final_entries = 0;
        self.remaining_inserts = 0;
        self.num_inserts = 0;
        self.num_collisions = 0;
    }

    /// Cursor at `key`, or the end cursor when it is not stored.
    pub fn find<Q>(&self, key: &Q) -> Cursor<K>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        let digits = key.to_digits();
        let depth = digits.digit_count();
        let (ordinal, prefix) = if depth == 0 {
            (0, digits)
        } else {
            digits.peel()
        };
        let hash = node_hash(depth, &prefix, ordinal);
        let Some((idx, offset)) = self.probe(hash, Tag::new(depth, ordinal), &prefix) else {
            return Cursor::end();
        };
        // The node may exist only as an ancestor of longer keys.
        match self.node_at(idx).payload {
            Some(slot) => Cursor {
                payload: Some(slot),
                depth,
                prefix,
                ordinal,
                offset,
                hash,
            },
            None => Cursor::end(),
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        !self.find(key).is_end()
    }

    pub fn get_value<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        let slot = self.find(key).payload?;
        self.arena.get(slot).map(|(_, v)| v)
    }

    pub fn get_value_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        let slot = self.find(key).payload?;
        self.arena.get_mut(slot).map(|(_, v)| v)
    }

    /// The entry under `cursor`, or `None` for the end cursor.
    ///
    /// # Panics
    ///
    /// If the cursor's entry is no longer in this table.
    pub fn get(&self, cursor: &Cursor<K>) -> Option<(&K, &V)> {
        let slot = self.live_slot(cursor)?;
        self.arena.get(slot).map(|(k, v)| (k, v))
    }

    /// Like [`Table::get`], with the payload borrowed mutably. Keys cannot be changed in place.
    pub fn get_mut(&mut self, cursor: &Cursor<K>) -> Option<(&K, &mut V)> {
        let slot = self.live_slot(cursor)?;
        self.arena.get_mut(slot).map(|(k, v)| (&*k, v))
    }

    fn live_slot(&self, cursor: &Cursor<K>) -> Option<SlotId> {
        let slot = cursor.payload?;
        if self.relocate(cursor).is_none() {
            panic!("cursor does not point at a live entry of this table: {cursor:?}");
        }
        Some(slot)
    }

    /// Store `key` with the payload produced by `make`, unless it is already present, in which
    /// case `make` is not called. Returns a cursor at the key and whether it was inserted.
    pub fn emplace<F>(&mut self, key: K, make: F) -> Result<(Cursor<K>, bool)>
    where
        F: FnOnce() -> V,
    {
        self.num_inserts += 1;
        let cursor = self.find(&key);
        if !cursor.is_end() {
            return Ok((cursor, false));
        }
        Ok((self.materialize(key, make())?, true))
    }

    /// Store `key` with `value` unless it is already present. An existing payload is kept and
    /// `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> Result<(Cursor<K>, bool)> {
        self.emplace(key, || value)
    }

    /// Store `key` with `value`, overwriting the payload of an existing entry.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<(Cursor<K>, bool)> {
        self.num_inserts += 1;
        let cursor = self.find(&key);
        if let Some(slot) = cursor.payload {
            self.arena[slot].1 = value;
            return Ok((cursor, false));
        }
        Ok((self.materialize(key, value)?, true))
    }

    /// Create (or add a live reference to) every node on the path of a key known to be absent,
    /// and hang the payload off the last one.
    fn materialize(&mut self, key: K, value: V) -> Result<Cursor<K>> {
        let digits = key.to_digits();
        let len = digits.digit_count();

        // Everything that can fail happens before the first node is touched.
        self.reserve_nodes(len.max(1))?;
        let slot = self.arena.alloc((key, value))?;

        // Peeling yields the deepest digit first; popping then walks from the root.
        let mut ordinals = Vec::with_capacity(len);
        let mut prefix = digits;
        for _ in 0..len {
            let (ordinal, shorter) = prefix.peel();
            ordinals.push(ordinal);
            prefix = shorter;
        }

        let mut depth = 0;
        let mut ordinal = 0;
        if let Some(first) = ordinals.pop() {
            depth = 1;
            ordinal = first;
        }
        while let Some(next) = ordinals.pop() {
            self.create_node(depth, &prefix, ordinal);
            prefix = prefix.attach(ordinal);
            depth += 1;
            ordinal = next;
        }

        let (idx, offset, hash) = self.create_node(depth, &prefix, ordinal);
        let Some(node) = self.buckets[idx].node_mut() else {
            unreachable!("create_node returned a bucket without a node");
        };
        debug_assert!(node.payload.is_none(), "materialize on a stored key");
        node.payload = Some(slot);
        self.num_final_entries += 1;

        Ok(Cursor {
            payload: Some(slot),
            depth,
            prefix,
            ordinal,
            offset,
            hash,
        })
    }

    /// Add one live reference to the node `(depth, prefix, ordinal)`, creating it if needed.
    /// Returns its bucket index, probe offset and slot hash.
    ///
    /// A new node goes into the first tombstone of its probe chain, or else into the empty
    /// bucket ending it. The whole chain is scanned first, since the node may already sit past
    /// a tombstone. Requires a remaining insert budget, see [`Table::reserve_nodes`].
    fn create_node(&mut self, depth: usize, prefix: &K::Digits, ordinal: u8) -> (usize, usize, u64) {
        let hash = node_hash(depth, prefix, ordinal);
        let tag = Tag::new(depth, ordinal);
        let mask = self.buckets.len() - 1;

        let mut first_tombstone = None;
        let mut offset = 0;
        let (idx, offset) = loop {
            let idx = (hash as usize).wrapping_add(offset) & mask;
            match &mut self.buckets[idx] {
                Bucket::Occupied(node) if node.matches(hash, tag, prefix) => {
                    node.inc_live();
                    return (idx, offset, hash);
                }
                Bucket::Occupied(_) => self.num_collisions += 1,
                Bucket::Tombstone => {
                    first_tombstone.get_or_insert((idx, offset));
                }
                Bucket::Empty => break first_tombstone.unwrap_or((idx, offset)),
            }
            offset += 1;
        };

        if matches!(self.buckets[idx], Bucket::Tombstone) {
            self.num_tombstones -= 1;
        } else {
            debug_assert!(self.remaining_inserts > 0, "node store out of insert budget");
            self.remaining_inserts -= 1;
        }
        self.buckets[idx] = Bucket::Occupied(Node::new(tag, hash, prefix.clone()));
        self.num_entries += 1;
        (idx, offset, hash)
    }

    /// Make sure `additional` new nodes can be placed without rebuilding the bucket array. The
    /// array doubles until the live nodes fit under the grow threshold; when they already do,
    /// it is rebuilt at the same size, which purges tombstones.
    fn reserve_nodes(&mut self, additional: usize) -> Result<()> {
        if self.buckets.is_empty() {
            self.resize(self.config.initial_capacity)?;
        }
        if self.remaining_inserts >= additional {
            return Ok(());
        }
        let needed = self.num_entries.saturating_add(additional);
        let mut capacity = self.buckets.len();
        while needed.saturating_mul(100) >= capacity.saturating_mul(self.config.grow_load_percent)
        {
            match capacity.checked_mul(2) {
                Some(doubled) => capacity = doubled,
                // Cannot be allocated; let the allocator report it.
                None => break,
            }
        }
        self.resize(capacity)
    }

    fn grow_limit(&self, capacity: usize) -> usize {
        capacity / 100 * self.config.grow_load_percent
            + capacity % 100 * self.config.grow_load_percent / 100
    }

    /// Rebuild the bucket array with `capacity` buckets, re-placing every node by its cached
    /// hash. Tombstones are dropped. On allocation failure the table is unchanged.
    fn resize(&mut self, capacity: usize) -> Result<()> {
        let mut buckets: Vec<Bucket<K::Digits>> = Vec::new();
        buckets
            .try_reserve_exact(capacity)
            .map_err(|e| Error::alloc("trie node buckets", capacity, e))?;
        buckets.resize_with(capacity, Default::default);
        debug_assert!(capacity.is_power_of_two());

        #[cfg(feature = "tracing")]
        let old_capacity = self.buckets.len();
        let mask = capacity - 1;
        let mut collisions = 0;
        for bucket in mem::take(&mut self.buckets) {
            let Bucket::Occupied(node) = bucket else {
                continue;
            };
            let mut idx = node.hash as usize & mask;
            while !matches!(buckets[idx], Bucket::Empty) {
                idx = (idx + 1) & mask;
                collisions += 1;
            }
            buckets[idx] = Bucket::Occupied(node);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            old_capacity,
            new_capacity = capacity,
            nodes = self.num_entries,
            purged_tombstones = self.num_tombstones,
            keys = self.num_final_entries,
            collisions,
            "node store rebuilt"
        );

        self.buckets = buckets;
        self.num_tombstones = 0;
        self.num_collisions += collisions;
        self.remaining_inserts = self.grow_limit(capacity).saturating_sub(self.num_entries);
        Ok(())
    }

    fn maybe_shrink(&mut self) {
        let capacity = self.buckets.len();
        if capacity <= self.config.initial_capacity
            || self.num_entries.saturating_mul(100)
                >= capacity.saturating_mul(self.config.shrink_load_percent)
        {
            return;
        }
        if let Err(err) = self.resize(capacity / 2) {
            #[cfg(feature = "tracing")]
            tracing::warn!(%err, capacity, "could not shrink node store, keeping it as is");
            #[cfg(not(feature = "tracing"))]
            let _ = err;
        }
    }

    /// Remove the entry under `cursor` and return a cursor at the next entry.
    ///
    /// # Panics
    ///
    /// On the end cursor, or a cursor whose entry is no longer in this table.
    pub fn erase(&mut self, cursor: Cursor<K>) -> Cursor<K> {
        self.take(cursor).0
    }

    /// Remove the entry under `cursor`, handing back the next cursor and the stored pair.
    pub(crate) fn take(&mut self, cursor: Cursor<K>) -> (Cursor<K>, (K, V)) {
        assert!(!cursor.is_end(), "cannot erase the end cursor");
        let Some((idx, _)) = self.relocate(&cursor) else {
            panic!("cursor does not point at a live entry of this table: {cursor:?}");
        };

        let mut next = cursor.clone();
        self.advance(&mut next);

        let slot = self.buckets[idx].node_mut().and_then(|node| node.payload.take());
        let Some(slot) = slot else {
            unreachable!("relocate returned a node without a payload");
        };
        self.release(idx);
        self.num_final_entries -= 1;
        let entry = self.arena.free(slot);

        // Every ancestor loses one live key.
        let mut depth = cursor.depth;
        let mut prefix = cursor.prefix;
        while depth > 1 {
            let (ordinal, parent) = prefix.peel();
            depth -= 1;
            let hash = node_hash(depth, &parent, ordinal);
            let Some((idx, _)) = self.probe(hash, Tag::new(depth, ordinal), &parent) else {
                panic!("trie node at depth {depth} missing on the path of a stored key");
            };
            self.release(idx);
            prefix = parent;
        }

        self.maybe_shrink();
        (next, entry)
    }

    /// Drop one live reference from the node in `idx`, tombstoning it at zero.
    fn release(&mut self, idx: usize) {
        let Bucket::Occupied(node) = &mut self.buckets[idx] else {
            panic!("bucket {idx} was expected to hold a trie node");
        };
        if node.dec_live() == 0 {
            self.buckets[idx] = Bucket::Tombstone;
            self.num_entries -= 1;
            self.num_tombstones += 1;
        }
    }

    /// Remove `key` if stored and return its payload.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        let cursor = self.find(key);
        if cursor.is_end() {
            return None;
        }
        Some(self.take(cursor).1.1)
    }

    /// Remove `key`, returning how many entries were removed (0 or 1).
    pub fn erase_key<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.remove(key).map_or(0, |_| 1)
    }

    /// Remove every entry from `first` up to, not including, `last`. Returns `last`.
    ///
    /// # Panics
    ///
    /// If `last` is not reachable from `first`.
    pub fn erase_range(&mut self, first: Cursor<K>, last: Cursor<K>) -> Cursor<K> {
        let mut cursor = first;
        while cursor != last {
            cursor = self.erase(cursor);
        }
        cursor
    }

    /// The bucket holding the node `(hash, tag, prefix)` and its probe offset.
    pub(crate) fn probe(&self, hash: u64, tag: Tag, prefix: &K::Digits) -> Option<(usize, usize)> {
        if self.buckets.is_empty() {
            return None;
        }
        let mask = self.buckets.len() - 1;
        let mut offset = 0;
        while offset <= mask {
            let idx = (hash as usize).wrapping_add(offset) & mask;
            match &self.buckets[idx] {
                Bucket::Empty => return None,
                Bucket::Occupied(node) if node.matches(hash, tag, prefix) => {
                    return Some((idx, offset));
                }
                _ => offset += 1,
            }
        }
        None
    }
}

impl<K: TrieKey, V> TableStatsTrait for Table<K, V> {
    fn get_table_stats(&self) -> TableStats {
        let capacity = self.buckets.len();
        let mut stats = TableStats {
            capacity,
            num_nodes: self.num_entries,
            num_tombstones: self.num_tombstones,
            num_keys: self.num_final_entries,
            num_inserts: self.num_inserts,
            num_collisions: self.num_collisions,
            arena_pages: self.arena.num_pages(),
            arena_free_slots: self.arena.num_free(),
            ..Default::default()
        };
        stats.num_internal_nodes = self
            .buckets
            .iter()
            .filter_map(Bucket::node)
            .filter(|node| !node.is_final())
            .count();
        if capacity > 0 {
            stats.load_factor = self.num_entries as f64 / capacity as f64;
        }
        stats
    }
}

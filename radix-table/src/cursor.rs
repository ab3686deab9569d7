//! Positions in a [`Table`] and the ordered walk over its implicit trie.
//!
//! A [`Cursor`] names one stored key by the coordinates of its trie node plus the arena handle
//! of its payload. It does not borrow the table, so it stays usable while the table is mutated:
//! inserts may resize the node store and move every node, but the payload handle never changes,
//! and the table re-locates the node by that handle the next time the cursor is used.
//!
//! Stepping forward is a depth-first, leftmost-first walk that never follows a pointer. From a
//! node the walk either descends (the node has longer keys below it) or moves to the next
//! ordinal; each candidate child is found by hashing `(depth, prefix, ordinal)` and probing.
//! Internal-only nodes are passed through without being emitted, and a level whose ordinals are
//! exhausted is left by peeling the last digit off the prefix.

use std::borrow::Borrow;
use std::fmt;

use crate::keys::{Digits, TrieKey};
use crate::node::{Bucket, Node, Tag};
use crate::table::{Table, node_hash};
use crate::utils::arena::SlotId;
use crate::utils::murmur::{identity_hash, slot_hash};

/// A position in a table: either one stored entry, or the end.
///
/// Cursors are obtained from `find`, `insert`, `begin`, `upper_bound` and friends and are moved
/// with `advance`. They survive inserts (including ones that resize the table) and erasure of
/// other entries. A cursor whose own entry has been erased, or that belongs to another table,
/// must not be used again; doing so panics or yields an unrelated entry.
pub struct Cursor<K: TrieKey> {
    pub(crate) payload: Option<SlotId>,
    pub(crate) depth: usize,
    pub(crate) prefix: K::Digits,
    pub(crate) ordinal: u8,
    /// Probe offset from `hash` at which the node was last seen. Only a hint.
    pub(crate) offset: usize,
    pub(crate) hash: u64,
}

impl<K: TrieKey> Cursor<K> {
    pub(crate) fn end() -> Self {
        Self {
            payload: None,
            depth: 0,
            prefix: K::Digits::default(),
            ordinal: 0,
            offset: 0,
            hash: 0,
        }
    }

    pub fn is_end(&self) -> bool {
        self.payload.is_none()
    }

    /// Number of digits of the key under the cursor.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<K: TrieKey> Clone for Cursor<K> {
    fn clone(&self) -> Self {
        Self {
            payload: self.payload,
            depth: self.depth,
            prefix: self.prefix.clone(),
            ordinal: self.ordinal,
            offset: self.offset,
            hash: self.hash,
        }
    }
}

/// Two cursors are equal when they point at the same entry, or are both at the end.
impl<K: TrieKey> PartialEq for Cursor<K> {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl<K: TrieKey> Eq for Cursor<K> {}

impl<K: TrieKey> fmt::Debug for Cursor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end() {
            return f.write_str("Cursor(end)");
        }
        f.debug_struct("Cursor")
            .field("depth", &self.depth)
            .field("prefix", &self.prefix)
            .field("ordinal", &self.ordinal)
            .field("offset", &self.offset)
            .finish()
    }
}

/// A node found by [`Table::scan`].
struct Found {
    ordinal: u8,
    offset: usize,
    hash: u64,
    idx: usize,
}

impl<K: TrieKey, V> Table<K, V> {
    /// Cursor at the smallest stored key, or the end cursor if the table is empty.
    pub fn begin(&self) -> Cursor<K> {
        let mut cursor = Cursor::end();
        if self.num_final_entries == 0 {
            return cursor;
        }

        // The empty key sorts before everything and lives alone at depth 0.
        let empty = K::Digits::default();
        let hash = node_hash(0, &empty, 0);
        if let Some((idx, offset)) = self.probe(hash, Tag::new(0, 0), &empty) {
            if let Some(slot) = self.node_at(idx).payload {
                cursor.payload = Some(slot);
                cursor.offset = offset;
                cursor.hash = hash;
                return cursor;
            }
        }

        self.seek(&mut cursor, 1, empty, 0, true);
        cursor
    }

    pub fn end(&self) -> Cursor<K> {
        Cursor::end()
    }

    /// Move `cursor` to the next stored key in ascending order. An end cursor stays at the end.
    ///
    /// # Panics
    ///
    /// If the cursor's entry is no longer in this table.
    pub fn advance(&self, cursor: &mut Cursor<K>) {
        if cursor.is_end() {
            return;
        }
        let Some((idx, offset)) = self.relocate(cursor) else {
            panic!("cursor does not point at a live entry of this table: {cursor:?}");
        };
        cursor.offset = offset;
        let descend = self.node_at(idx).has_descendants();
        let (depth, prefix, ordinal) = (cursor.depth, cursor.prefix.clone(), cursor.ordinal);
        self.step_past(cursor, depth, prefix, ordinal, descend);
    }

    /// Cursor at the smallest stored key strictly greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<K>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        let mut cursor = Cursor::end();
        if self.num_final_entries == 0 {
            return cursor;
        }

        let digits = key.to_digits();
        let len = digits.digit_count();
        let mut ordinals = Vec::with_capacity(len);
        let mut prefix = digits;
        for _ in 0..len {
            let (ordinal, shorter) = prefix.peel();
            ordinals.push(ordinal);
            prefix = shorter;
        }
        if len == 0 {
            self.step_past(&mut cursor, 0, prefix, 0, false);
            return cursor;
        }

        // Follow the key's path for as long as its nodes exist.
        let mut depth = 1;
        while let Some(ordinal) = ordinals.pop() {
            let hash = node_hash(depth, &prefix, ordinal);
            match self.probe(hash, Tag::new(depth, ordinal), &prefix) {
                Some((idx, _)) if ordinals.is_empty() => {
                    // The whole key has a node, final or not: everything after it qualifies.
                    let descend = self.node_at(idx).has_descendants();
                    self.step_past(&mut cursor, depth, prefix, ordinal, descend);
                    return cursor;
                }
                Some(_) => {
                    prefix = prefix.attach(ordinal);
                    depth += 1;
                }
                None => {
                    // Nothing stored below this digit; the answer is a later sibling or beyond.
                    self.seek(&mut cursor, depth, prefix, ordinal as usize + 1, false);
                    return cursor;
                }
            }
        }
        cursor
    }

    /// Cursor at the smallest stored key greater than or equal to `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<K>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        let cursor = self.find(key);
        if cursor.is_end() {
            self.upper_bound(key)
        } else {
            cursor
        }
    }

    /// Find the bucket currently holding the cursor's node. Tries the cached offset first, then
    /// re-probes from the cached slot hash comparing arena handles, which a resize does not
    /// change.
    pub(crate) fn relocate(&self, cursor: &Cursor<K>) -> Option<(usize, usize)> {
        let slot = cursor.payload?;
        if self.buckets.is_empty() {
            return None;
        }
        let mask = self.buckets.len() - 1;
        let holds = |bucket: &Bucket<K::Digits>| {
            bucket
                .node()
                .is_some_and(|n| n.payload == Some(slot) && n.hash == cursor.hash)
        };

        let cached = (cursor.hash as usize).wrapping_add(cursor.offset) & mask;
        if holds(&self.buckets[cached]) {
            return Some((cached, cursor.offset));
        }

        let mut offset = 0;
        while offset <= mask {
            let idx = (cursor.hash as usize).wrapping_add(offset) & mask;
            match &self.buckets[idx] {
                Bucket::Empty => return None,
                bucket if holds(bucket) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(
                        depth = cursor.depth,
                        old_offset = cursor.offset,
                        new_offset = offset,
                        "cursor repaired"
                    );
                    return Some((idx, offset));
                }
                _ => offset += 1,
            }
        }
        None
    }

    /// Position `cursor` at the first stored key after the node `(depth, prefix, ordinal)`,
    /// descending into it first when `descend` is set.
    fn step_past(
        &self,
        cursor: &mut Cursor<K>,
        depth: usize,
        prefix: K::Digits,
        ordinal: u8,
        descend: bool,
    ) {
        if depth == 0 {
            self.seek(cursor, 1, prefix, 0, false);
        } else if descend {
            self.seek(cursor, depth + 1, prefix.attach(ordinal), 0, true);
        } else {
            self.seek(cursor, depth, prefix, ordinal as usize + 1, false);
        }
    }

    /// Position `cursor` at the first stored key whose node is a child `(depth, prefix, o)` with
    /// `o >= start`, or that lies anywhere after that sibling range. `must_find` asserts that the
    /// level has a child: it is set whenever the walk enters a node whose live count promises one.
    fn seek(
        &self,
        cursor: &mut Cursor<K>,
        mut depth: usize,
        mut prefix: K::Digits,
        mut start: usize,
        mut must_find: bool,
    ) {
        loop {
            match self.scan(depth, &prefix, start) {
                Some(found) => {
                    let node = self.node_at(found.idx);
                    debug_assert_eq!(node.tag.ordinal(), found.ordinal);
                    if let Some(slot) = node.payload {
                        *cursor = Cursor {
                            payload: Some(slot),
                            depth,
                            prefix,
                            ordinal: found.ordinal,
                            offset: found.offset,
                            hash: found.hash,
                        };
                        return;
                    }
                    // Internal only; its subtree holds the next key.
                    prefix = prefix.attach(found.ordinal);
                    depth += 1;
                    start = 0;
                    must_find = true;
                }
                None => {
                    assert!(
                        !must_find,
                        "trie node at depth {} has a live count but no children",
                        depth - 1
                    );
                    if depth <= 1 {
                        *cursor = Cursor::end();
                        return;
                    }
                    let (ordinal, parent) = prefix.peel();
                    prefix = parent;
                    depth -= 1;
                    start = ordinal as usize + 1;
                }
            }
        }
    }

    /// First child `(depth, prefix, o)` with `o >= start` that has a node.
    fn scan(&self, depth: usize, prefix: &K::Digits, start: usize) -> Option<Found> {
        if self.buckets.is_empty() {
            return None;
        }
        let identity = identity_hash(depth, prefix.fingerprint());
        (start..256).find_map(|ordinal| {
            let ordinal = ordinal as u8;
            let hash = slot_hash(identity, ordinal);
            self.probe(hash, Tag::new(depth, ordinal), prefix)
                .map(|(idx, offset)| Found {
                    ordinal,
                    offset,
                    hash,
                    idx,
                })
        })
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Node<K::Digits> {
        match &self.buckets[idx] {
            Bucket::Occupied(node) => node,
            _ => panic!("bucket {idx} was expected to hold a trie node"),
        }
    }
}

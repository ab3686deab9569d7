use std::borrow::Borrow;
use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};

use crate::cursor::Cursor;
use crate::keys::TrieKey;
use crate::table::Table;
use crate::utils::arena::SlotId;

/// Ascending iterator over the entries between two bounds.
///
/// Both bounds are resolved to cursors up front (`lower_bound`/`upper_bound`), so iteration is
/// a plain cursor walk that stops at the first entry past the end bound; no keys are compared
/// while stepping.
pub struct Range<'a, K: TrieKey, V> {
    table: &'a Table<K, V>,
    cursor: Cursor<K>,
    /// Payload of the first entry not to yield; `None` runs to the end.
    stop: Option<SlotId>,
}

impl<'a, K: TrieKey, V> Range<'a, K, V> {
    pub(crate) fn new<Q, R>(table: &'a Table<K, V>, range: R) -> Self
    where
        R: RangeBounds<Q>,
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        if is_empty_span(range.start_bound(), range.end_bound()) {
            return Self::empty(table);
        }
        let cursor = match range.start_bound() {
            Bound::Included(key) => table.lower_bound(key),
            Bound::Excluded(key) => table.upper_bound(key),
            Bound::Unbounded => table.begin(),
        };
        let stop = match range.end_bound() {
            Bound::Included(key) => table.upper_bound(key).payload,
            Bound::Excluded(key) => table.lower_bound(key).payload,
            Bound::Unbounded => None,
        };
        Self {
            table,
            cursor,
            stop,
        }
    }

    /// Everything from `cursor` to the end.
    pub(crate) fn from_cursor(table: &'a Table<K, V>, cursor: Cursor<K>) -> Self {
        Self {
            table,
            cursor,
            stop: None,
        }
    }

    pub(crate) fn empty(table: &'a Table<K, V>) -> Self {
        Self::from_cursor(table, Cursor::end())
    }
}

/// Whether the bounds admit no key at all, e.g. `5..3` or `5..5`.
fn is_empty_span<Q>(start: Bound<&Q>, end: Bound<&Q>) -> bool
where
    Q: TrieKey + ?Sized,
{
    let (start, start_included) = match start {
        Bound::Included(key) => (key, true),
        Bound::Excluded(key) => (key, false),
        Bound::Unbounded => return false,
    };
    let (end, end_included) = match end {
        Bound::Included(key) => (key, true),
        Bound::Excluded(key) => (key, false),
        Bound::Unbounded => return false,
    };
    match start.to_digits().cmp(&end.to_digits()) {
        Ordering::Less => false,
        Ordering::Equal => !(start_included && end_included),
        Ordering::Greater => true,
    }
}

impl<'a, K: TrieKey, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.payload == self.stop {
            return None;
        }
        let slot = self.cursor.payload?;
        let (k, v) = &self.table.arena[slot];
        self.table.advance(&mut self.cursor);
        Some((k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.cursor.payload.is_none() || self.cursor.payload == self.stop {
            (0, Some(0))
        } else {
            (1, Some(self.table.len()))
        }
    }
}

impl<K: TrieKey, V> FusedIterator for Range<'_, K, V> {}

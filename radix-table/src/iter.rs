use std::iter::FusedIterator;

use crate::cursor::Cursor;
use crate::keys::TrieKey;
use crate::table::Table;

/// Ascending iterator over the entries of a table, driven by a [`Cursor`].
///
/// The table is borrowed for the iterator's lifetime, so payloads are read straight out of the
/// arena without re-locating the cursor's node.
pub struct Iter<'a, K: TrieKey, V> {
    table: &'a Table<K, V>,
    cursor: Cursor<K>,
    remaining: usize,
}

impl<'a, K: TrieKey, V> Iter<'a, K, V> {
    pub(crate) fn new(table: &'a Table<K, V>) -> Self {
        Self {
            table,
            cursor: table.begin(),
            remaining: table.len(),
        }
    }
}

impl<'a, K: TrieKey, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor.payload?;
        let (k, v) = &self.table.arena[slot];
        self.table.advance(&mut self.cursor);
        self.remaining -= 1;
        Some((k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: TrieKey, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K: TrieKey, V> FusedIterator for Iter<'_, K, V> {}

impl<K: TrieKey, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            cursor: self.cursor.clone(),
            remaining: self.remaining,
        }
    }
}

pub struct Keys<'a, K: TrieKey, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K: TrieKey, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K: TrieKey, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: TrieKey, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K: TrieKey, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K: TrieKey, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K: TrieKey, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K: TrieKey, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: TrieKey, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K: TrieKey, V> FusedIterator for Values<'_, K, V> {}

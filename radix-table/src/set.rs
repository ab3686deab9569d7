use std::borrow::Borrow;
use std::fmt;
use std::ops::RangeBounds;

use crate::config::TableConfig;
use crate::cursor::Cursor;
use crate::error::Result;
use crate::iter::{Iter, Keys};
use crate::keys::TrieKey;
use crate::range::Range;
use crate::stats::{TableStats, TableStatsTrait};
use crate::table::Table;

/// Ascending iterator over a [`RadixSet`].
pub type SetIter<'a, K> = Keys<'a, K, ()>;

/// An ordered set backed by a hash-addressed radix trie. See [`RadixMap`](crate::RadixMap) for
/// the cost model and cursor semantics.
///
/// ```rust
/// use radix_table::RadixSet;
///
/// let mut set = RadixSet::new();
/// for k in [1_000_000_000u64, 10, 0, 10_000, 1000] {
///     set.insert(k)?;
/// }
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [0, 10, 1000, 10_000, 1_000_000_000]);
///
/// let cursor = set.upper_bound(&10);
/// assert_eq!(set.get(&cursor), Some(&1000));
/// # Ok::<(), radix_table::Error>(())
/// ```
pub struct RadixSet<K: TrieKey> {
    table: Table<K, ()>,
}

impl<K: TrieKey> Default for RadixSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TrieKey> RadixSet<K> {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Ok(Self {
            table: Table::with_config(config)?,
        })
    }

    /// Returns a cursor at `key` and whether it was newly inserted.
    pub fn insert(&mut self, key: K) -> Result<(Cursor<K>, bool)> {
        self.table.insert(key, ())
    }

    /// Insert a key built from `source`.
    pub fn emplace(&mut self, source: impl Into<K>) -> Result<(Cursor<K>, bool)> {
        self.table.insert(source.into(), ())
    }

    pub fn insert_iter<I>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
    {
        for key in keys {
            self.table.insert(key, ())?;
        }
        Ok(())
    }

    pub fn find<Q>(&self, key: &Q) -> Cursor<K>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.find(key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.contains(key)
    }

    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.contains(key) as usize
    }

    /// The key under `cursor`; `None` at the end.
    ///
    /// # Panics
    ///
    /// If the cursor's key has been erased.
    pub fn get(&self, cursor: &Cursor<K>) -> Option<&K> {
        self.table.get(cursor).map(|(k, _)| k)
    }

    pub fn begin(&self) -> Cursor<K> {
        self.table.begin()
    }

    pub fn end(&self) -> Cursor<K> {
        self.table.end()
    }

    pub fn advance(&self, cursor: &mut Cursor<K>) {
        self.table.advance(cursor)
    }

    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor<K>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.upper_bound(key)
    }

    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<K>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.lower_bound(key)
    }

    /// Remove the key under `cursor`, returning a cursor at the following key.
    ///
    /// # Panics
    ///
    /// On the end cursor or a cursor whose key was already erased.
    pub fn erase(&mut self, cursor: Cursor<K>) -> Cursor<K> {
        self.table.erase(cursor)
    }

    pub fn erase_key<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.erase_key(key)
    }

    pub fn erase_range(&mut self, first: Cursor<K>, last: Cursor<K>) -> Cursor<K> {
        self.table.erase_range(first, last)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn num_inserts(&self) -> u64 {
        self.table.num_inserts()
    }

    pub fn num_collisions(&self) -> u64 {
        self.table.num_collisions()
    }

    pub fn iter(&self) -> SetIter<'_, K> {
        Keys::new(Iter::new(&self.table))
    }

    pub fn iter_from(&self, cursor: Cursor<K>) -> impl Iterator<Item = &K> + '_ {
        Range::from_cursor(&self.table, cursor).map(|(k, _)| k)
    }

    pub fn range<Q, R>(&self, range: R) -> impl Iterator<Item = &K> + '_
    where
        R: RangeBounds<Q>,
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        Range::new(&self.table, range).map(|(k, _)| k)
    }
}

impl<K: TrieKey> TableStatsTrait for RadixSet<K> {
    fn get_table_stats(&self) -> TableStats {
        self.table.get_table_stats()
    }
}

impl<'a, K: TrieKey> IntoIterator for &'a RadixSet<K> {
    type Item = &'a K;
    type IntoIter = SetIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: TrieKey + fmt::Debug> fmt::Debug for RadixSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: TrieKey> FromIterator<K> for RadixSet<K> {
    /// # Panics
    ///
    /// If memory for the set cannot be allocated, like the standard collections.
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        if let Err(err) = set.insert_iter(iter) {
            panic!("{err}");
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::seq::SliceRandom;
    use rand::{Rng, rng};

    use super::*;

    #[test]
    fn shared_prefix_strings() {
        let set: RadixSet<String> = ["abc", "", "a", "@", "ab"].map(String::from).into_iter().collect();
        let keys: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(keys, vec!["", "@", "a", "ab", "abc"]);
    }

    #[test]
    fn emplace_converts() {
        let mut set = RadixSet::<String>::new();
        assert!(set.emplace("hello").unwrap().1);
        assert!(!set.emplace(String::from("hello")).unwrap().1);
        assert_eq!(set.count("hello"), 1);
        assert_eq!(set.count("help"), 0);
    }

    #[test]
    fn remove_reports_presence() {
        let mut set = RadixSet::new();
        set.insert(3i8).unwrap();
        assert!(set.remove(&3));
        assert!(!set.remove(&3));
    }

    #[test]
    fn range_matches_btreeset() {
        let mut keys: Vec<u32> = (0..2000).map(|_| rng().random_range(0..100_000)).collect();
        keys.shuffle(&mut rng());
        let set: RadixSet<u32> = keys.iter().copied().collect();
        let model: BTreeSet<u32> = keys.into_iter().collect();
        let mut rng = rng();
        for _ in 0..200 {
            let a = rng.random_range(0..100_000);
            let b = rng.random_range(a..=100_000);
            assert!(set.range(a..b).copied().eq(model.range(a..b).copied()));
            assert!(set.range(a..=b).copied().eq(model.range(a..=b).copied()));
            assert!(set.range(a..).copied().eq(model.range(a..).copied()));
        }
    }

    #[test]
    fn debug_and_into_iter() {
        let set: RadixSet<u8> = [3, 1, 2].into_iter().collect();
        assert_eq!(format!("{set:?}"), "{1, 2, 3}");
        assert_eq!((&set).into_iter().count(), 3);
        let tail: Vec<u8> = set.iter_from(set.find(&2)).copied().collect();
        assert_eq!(tail, vec![2, 3]);
    }
}

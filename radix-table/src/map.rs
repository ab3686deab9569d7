use std::borrow::Borrow;
use std::fmt;
use std::ops::RangeBounds;

use crate::config::TableConfig;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::iter::{Iter, Keys, Values};
use crate::keys::TrieKey;
use crate::range::Range;
use crate::stats::{TableStats, TableStatsTrait};
use crate::table::Table;

/// An ordered map backed by a hash-addressed radix trie.
///
/// Point lookups, inserts and erases cost one hash probe per key digit. Iteration is in
/// ascending key order, for integers by value, for floats by IEEE total order and for strings
/// and byte strings lexicographically.
///
/// Entries are addressed by [`Cursor`]s, which are plain values: they stay valid while the map
/// is modified, including when it resizes, as long as their own entry is not erased.
///
/// ```rust
/// use std::ops::Bound;
///
/// use radix_table::RadixMap;
///
/// let mut map = RadixMap::new();
/// map.insert("apple".to_string(), 3)?;
/// map.insert("apricot".to_string(), 5)?;
/// map.insert("banana".to_string(), 7)?;
///
/// assert_eq!(map.get_value("apricot"), Some(&5));
/// let cursor = map.upper_bound("apple");
/// assert_eq!(map.get(&cursor), Some((&"apricot".to_string(), &5)));
///
/// // Borrowed `str` bounds go through the tuple form; `"a".."b"` only works for sized types.
/// let a_words: Vec<_> = map
///     .range::<str, _>((Bound::Included("a"), Bound::Excluded("b")))
///     .map(|(k, _)| k.as_str())
///     .collect();
/// assert_eq!(a_words, ["apple", "apricot"]);
/// # Ok::<(), radix_table::Error>(())
/// ```
pub struct RadixMap<K: TrieKey, V> {
    table: Table<K, V>,
}

impl<K: TrieKey, V> Default for RadixMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TrieKey, V> RadixMap<K, V> {
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

    /// Insert `key` with `value` unless the key is already present. Existing values are never
    /// overwritten; see [`RadixMap::insert_or_assign`].
    ///
    /// Returns a cursor at the key's entry and whether it was newly inserted.
    pub fn insert(&mut self, key: K, value: V) -> Result<(Cursor<K>, bool)> {
        self.table.insert(key, value)
    }

    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<(Cursor<K>, bool)> {
        self.table.insert_or_assign(key, value)
    }

    /// Insert `key` with the value built by `make`, which only runs if the key is absent.
    pub fn emplace<F>(&mut self, key: K, make: F) -> Result<(Cursor<K>, bool)>
    where
        F: FnOnce() -> V,
    {
        self.table.emplace(key, make)
    }

    /// Insert every pair, keeping existing values. Stops at the first allocation failure.
    pub fn insert_iter<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.table.insert(key, value)?;
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

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.contains(key)
    }

    /// 1 if `key` is stored, else 0.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.contains(key) as usize
    }

    pub fn get_value<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.get_value(key)
    }

    pub fn get_value_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.get_value_mut(key)
    }

    /// The value for `key`, or [`Error::KeyNotFound`].
    pub fn at<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.get_value(key).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.get_value_mut(key).ok_or(Error::KeyNotFound)
    }

    /// The value for `key`, inserting `V::default()` first if the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> Result<&mut V>
    where
        V: Default,
    {
        let (cursor, _) = self.table.emplace(key, V::default)?;
        match self.table.get_mut(&cursor) {
            Some((_, value)) => Ok(value),
            None => unreachable!("emplace returned the end cursor"),
        }
    }

    /// The entry under `cursor`; `None` at the end.
    ///
    /// # Panics
    ///
    /// If the cursor's entry has been erased.
    pub fn get(&self, cursor: &Cursor<K>) -> Option<(&K, &V)> {
        self.table.get(cursor)
    }

    pub fn get_mut(&mut self, cursor: &Cursor<K>) -> Option<(&K, &mut V)> {
        self.table.get_mut(cursor)
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

    /// Remove the entry under `cursor`, returning a cursor at the following entry.
    ///
    /// # Panics
    ///
    /// On the end cursor or a cursor whose entry was already erased.
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

    /// Remove the entries in `[first, last)` and return `last`.
    pub fn erase_range(&mut self, first: Cursor<K>, last: Cursor<K>) -> Cursor<K> {
        self.table.erase_range(first, last)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        self.table.remove(key)
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

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.table)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Entries from `cursor` to the end.
    pub fn iter_from(&self, cursor: Cursor<K>) -> Range<'_, K, V> {
        Range::from_cursor(&self.table, cursor)
    }

    /// Entries with keys inside `range`, ascending. An empty or inverted range yields nothing.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        R: RangeBounds<Q>,
        K: Borrow<Q>,
        Q: TrieKey<Digits = K::Digits> + ?Sized,
    {
        Range::new(&self.table, range)
    }
}

impl<K: TrieKey, V> TableStatsTrait for RadixMap<K, V> {
    fn get_table_stats(&self) -> TableStats {
        self.table.get_table_stats()
    }
}

impl<'a, K: TrieKey, V> IntoIterator for &'a RadixMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: TrieKey + fmt::Debug, V: fmt::Debug> fmt::Debug for RadixMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::{Rng, rng};

    use super::*;

    #[test]
    fn insert_never_overwrites() {
        let mut map = RadixMap::new();
        assert!(map.insert(1u32, "one").unwrap().1);
        assert!(!map.insert(1, "uno").unwrap().1);
        assert_eq!(map.at(&1), Ok(&"one"));
        assert!(!map.insert_or_assign(1, "uno").unwrap().1);
        assert_eq!(map.at(&1), Ok(&"uno"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn at_reports_missing_keys() {
        let mut map = RadixMap::<String, i32>::new();
        assert_eq!(map.at("nope"), Err(Error::KeyNotFound));
        assert_eq!(map.at_mut("nope"), Err(Error::KeyNotFound));
        map.insert("yes".into(), 1).unwrap();
        *map.at_mut("yes").unwrap() += 1;
        assert_eq!(map.at("yes"), Ok(&2));
    }

    #[test]
    fn get_or_insert_default_counts_words() {
        let mut map = RadixMap::<String, usize>::new();
        for word in "the cat and the hat and the bat".split(' ') {
            *map.get_or_insert_default(word.to_string()).unwrap() += 1;
        }
        let counts: Vec<(&str, usize)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(
            counts,
            vec![("and", 2), ("bat", 1), ("cat", 1), ("hat", 1), ("the", 3)]
        );
    }

    #[test]
    fn emplace_builds_value_once() {
        let mut map = RadixMap::new();
        let mut built = 0;
        for _ in 0..3 {
            map.emplace(9i64, || {
                built += 1;
                vec![1, 2, 3]
            })
            .unwrap();
        }
        assert_eq!(built, 1);
        assert_eq!(map.get_value(&9), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn get_mut_through_cursor() {
        let mut map = RadixMap::new();
        let (cursor, _) = map.insert(4u16, 40).unwrap();
        if let Some((_, v)) = map.get_mut(&cursor) {
            *v += 2;
        }
        assert_eq!(map.get_value(&4), Some(&42));
        assert_eq!(map.get(&map.end()), None);
    }

    #[test]
    fn remove_returns_value() {
        let mut map = RadixMap::new();
        map.insert(b"key".to_vec(), 5).unwrap();
        assert_eq!(map.remove(&b"key"[..]), Some(5));
        assert_eq!(map.remove(&b"key"[..]), None);
        assert!(map.is_empty());
    }

    #[test]
    fn matches_btreemap_under_random_ops() {
        let mut map = RadixMap::new();
        let mut model = BTreeMap::new();
        let mut rng = rng();
        for _ in 0..20_000 {
            let key: i32 = rng.random_range(-500..500);
            match rng.random_range(0..4) {
                0 | 1 => {
                    let value = rng.random::<u16>();
                    map.insert_or_assign(key, value).unwrap();
                    model.insert(key, value);
                }
                2 => assert_eq!(map.remove(&key), model.remove(&key)),
                _ => assert_eq!(map.get_value(&key), model.get(&key)),
            }
        }
        assert_eq!(map.len(), model.len());
        assert!(map.iter().map(|(k, v)| (*k, *v)).eq(model.into_iter()));
    }

    #[test]
    fn debug_lists_entries_in_order() {
        let mut map = RadixMap::new();
        map.insert_iter([(2u8, 'b'), (1, 'a')]).unwrap();
        assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b'}");
    }

    #[test]
    fn iter_from_cursor() {
        let mut map = RadixMap::new();
        map.insert_iter((0..10u32).map(|k| (k, k))).unwrap();
        let start = map.lower_bound(&7);
        let tail: Vec<u32> = map.iter_from(start).map(|(k, _)| *k).collect();
        assert_eq!(tail, vec![7, 8, 9]);
        assert_eq!(map.keys().count(), 10);
        assert_eq!(map.values().sum::<u32>(), 45);
        assert_eq!((&map).into_iter().len(), 10);
    }
}

use radix_table::{Error, RadixMap};

#[test]
fn empty_map() {
    let map = RadixMap::<String, i32>::new();
    assert_eq!(map.begin(), map.end());
    assert_eq!(map.find("anything"), map.end());
    assert!(map.iter().next().is_none());
}

#[test]
fn update_through_cursor() {
    let mut map = RadixMap::<String, i32>::new();
    map.insert("A".into(), 1).unwrap();
    let cursor = map.find("A");
    let (_, value) = map.get_mut(&cursor).unwrap();
    assert_eq!(*value, 1);
    *value = 2;
    assert_eq!(*map.get_or_insert_default("A".into()).unwrap(), 2);
}

#[test]
fn update_through_insert_cursor() {
    let mut map = RadixMap::<String, i32>::new();
    let (cursor, _) = map.insert("Hello".into(), 10).unwrap();
    assert_eq!(map.at("Hello"), Ok(&10));
    *map.get_mut(&cursor).unwrap().1 += 1;
    assert_eq!(map.at("Hello"), Ok(&11));
}

#[test]
fn default_insert_then_assign() {
    let mut map = RadixMap::<String, bool>::new();
    *map.get_or_insert_default("Hello".into()).unwrap() = true;
    assert_eq!(map.get_value("Hello"), Some(&true));
    assert_eq!(map.len(), 1);
}

#[test]
fn insert_keeps_first_value() {
    let mut map = RadixMap::<String, i32>::new();
    let (c1, inserted1) = map.insert("k1".into(), 1).unwrap();
    let (c2, inserted2) = map.insert("k2".into(), 1).unwrap();
    let (c3, inserted3) = map.insert("k1".into(), 2).unwrap();
    assert!(inserted1 && inserted2 && !inserted3);
    assert_eq!(c1, c3);
    assert_ne!(c1, c2);
    assert_eq!(map.get(&c3).map(|(_, v)| *v), Some(1));
    assert_eq!(map.len(), 2);
}

#[test]
fn emplace_into_map() {
    let mut map = RadixMap::<String, bool>::new();
    map.emplace("a string".into(), || true).unwrap();
    map.emplace("another string".into(), || true).unwrap();
    assert_eq!(map.at("a string"), Ok(&true));
    assert_eq!(map.at("another string"), Ok(&true));
}

#[test]
fn at_missing_key() {
    let mut map = RadixMap::<String, i32>::new();
    map.insert("s1".into(), 1).unwrap();
    assert_eq!(map.at("s1"), Ok(&1));
    assert_eq!(map.at("s2"), Err(Error::KeyNotFound));
}

#[test]
fn insert_or_assign_overwrites() {
    let mut map = RadixMap::<String, i32>::new();
    map.insert_or_assign("key".into(), 1).unwrap();
    assert_eq!(map.get_value("key"), Some(&1));
    map.insert_or_assign("key".into(), 2).unwrap();
    assert_eq!(map.get_value("key"), Some(&2));
    assert_eq!(map.num_inserts(), 2);
}

#[test]
fn byte_string_keys_with_zero_bytes() {
    let mut map = RadixMap::<Vec<u8>, usize>::new();
    let keys: [&[u8]; 6] = [b"", b"\0", b"\0\0", b"\0\x01", b"\x01", b"\xff\0"];
    for (i, k) in keys.iter().enumerate().rev() {
        map.insert(k.to_vec(), i).unwrap();
    }
    let order: Vec<usize> = map.values().copied().collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(map.get_value(&b"\0"[..]), Some(&1));
    assert_eq!(
        map.get(&map.upper_bound(&b"\0\0"[..])).map(|(_, v)| *v),
        Some(3)
    );
}

#[test]
fn cursors_survive_erasing_other_entries() {
    let mut map = RadixMap::new();
    map.insert_iter((0..5000u32).map(|k| (k, k * 10))).unwrap();
    let keep = map.find(&4321);
    for k in (0..5000u32).filter(|k| k % 7 != 0 && *k != 4321) {
        map.erase_key(&k);
    }
    assert_eq!(map.get(&keep), Some((&4321, &43_210)));
    let mut next = keep.clone();
    map.advance(&mut next);
    assert_eq!(map.get(&next).map(|(k, _)| *k), Some(4326));
}

#[test]
fn char_keys_follow_code_points() {
    let mut map = RadixMap::new();
    for (i, c) in "zébra".chars().enumerate() {
        map.insert(c, i).unwrap();
    }
    let keys: String = map.keys().collect();
    assert_eq!(keys, "abrzé");
}

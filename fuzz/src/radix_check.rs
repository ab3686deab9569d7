#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use radix_table::{RadixMap, TableConfig};

#[derive(Arbitrary, Debug)]
enum MapMethod {
    Get { key: Vec<u8> },
    Insert { key: Vec<u8>, val: usize },
    Assign { key: Vec<u8>, val: usize },
    Update { key: Vec<u8>, val: usize },
    Delete { key: Vec<u8> },
    EraseNext { key: Vec<u8> },
    Clear,
}

fuzz_target!(|methods: Vec<MapMethod>| {
    let config = TableConfig::default().with_initial_capacity(8);
    let Ok(mut map) = RadixMap::<Vec<u8>, usize>::with_config(config) else {
        return;
    };
    let mut bt_map = BTreeMap::<Vec<u8>, usize>::new();

    for m in methods {
        match m {
            MapMethod::Get { key } => {
                assert_eq!(map.get_value(&key[..]), bt_map.get(&key));
            }
            MapMethod::Insert { key, val } => {
                let (cursor, inserted) = map.insert(key.clone(), val).unwrap();
                assert_eq!(inserted, !bt_map.contains_key(&key));
                let expected = *bt_map.entry(key).or_insert(val);
                assert_eq!(map.get(&cursor).map(|(_, v)| *v), Some(expected));
            }
            MapMethod::Assign { key, val } => {
                let (_, inserted) = map.insert_or_assign(key.clone(), val).unwrap();
                assert_eq!(inserted, bt_map.insert(key, val).is_none());
            }
            MapMethod::Update { key, val } => {
                let old_bt = bt_map.get_mut(&key);
                let old_map = map.get_value_mut(&key[..]);
                assert_eq!(old_map, old_bt);
                if let (Some(a), Some(b)) = (old_map, old_bt) {
                    *a = val;
                    *b = val;
                }
            }
            MapMethod::Delete { key } => {
                assert_eq!(map.remove(&key[..]), bt_map.remove(&key));
            }
            MapMethod::EraseNext { key } => {
                // Erase the first key above `key`, checking the successor handed back.
                let cursor = map.upper_bound(&key[..]);
                let expected: Vec<Vec<u8>> = bt_map
                    .range::<Vec<u8>, _>((std::ops::Bound::Excluded(&key), std::ops::Bound::Unbounded))
                    .take(2)
                    .map(|(k, _)| k.clone())
                    .collect();
                if cursor.is_end() {
                    assert!(expected.is_empty());
                    continue;
                }
                let next = map.erase(cursor);
                bt_map.remove(&expected[0]);
                assert_eq!(map.get(&next).map(|(k, _)| k), expected.get(1));
            }
            MapMethod::Clear => {
                map.clear();
                bt_map.clear();
            }
        }
        assert_eq!(map.len(), bt_map.len());
    }

    assert!(map.iter().eq(bt_map.iter()));
});

#![no_main]

use std::collections::BTreeMap;
use std::ops::Bound;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use radix_table::RadixMap;

#[derive(Arbitrary, Debug)]
enum SetupAction {
    Insert { key: u64, val: usize },
    Remove { key: u64 },
}

#[derive(Arbitrary, Debug)]
enum IterRangeAction {
    IterateAll,
    RangeFrom { start: u64 },
    RangeTo { end: u64 },
    RangeToInclusive { end: u64 },
    Range { start: u64, end: u64 },
    RangeInclusive { start: u64, end: u64 },
    RangeExcludedStart { start: u64, end: u64 },
    UpperBound { key: u64 },
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    setup_actions: Vec<SetupAction>,
    iter_range_actions: Vec<IterRangeAction>,
}

fn ordered(start: u64, end: u64) -> (u64, u64) {
    (start.min(end), start.max(end))
}

fuzz_target!(|input: FuzzInput| {
    let mut map = RadixMap::<u64, usize>::new();
    let mut btree = BTreeMap::<u64, usize>::new();

    for action in input.setup_actions {
        match action {
            SetupAction::Insert { key, val } => {
                map.insert(key, val).unwrap();
                btree.entry(key).or_insert(val);
            }
            SetupAction::Remove { key } => {
                assert_eq!(map.remove(&key), btree.remove(&key));
            }
        }
    }

    for action in input.iter_range_actions {
        match action {
            IterRangeAction::IterateAll => {
                assert!(map.iter().eq(btree.iter()));
                assert_eq!(map.iter().len(), btree.len());
            }
            IterRangeAction::RangeFrom { start } => {
                assert!(map.range(start..).eq(btree.range(start..)));
            }
            IterRangeAction::RangeTo { end } => {
                assert!(map.range(..end).eq(btree.range(..end)));
            }
            IterRangeAction::RangeToInclusive { end } => {
                assert!(map.range(..=end).eq(btree.range(..=end)));
            }
            IterRangeAction::Range { start, end } => {
                let (start, end) = ordered(start, end);
                assert!(map.range(start..end).eq(btree.range(start..end)));
            }
            IterRangeAction::RangeInclusive { start, end } => {
                let (start, end) = ordered(start, end);
                assert!(map.range(start..=end).eq(btree.range(start..=end)));
            }
            IterRangeAction::RangeExcludedStart { start, end } => {
                let (start, end) = ordered(start, end);
                if start == end {
                    continue;
                }
                let bounds = (Bound::Excluded(start), Bound::Included(end));
                assert!(map.range(bounds).eq(btree.range(bounds)));
            }
            IterRangeAction::UpperBound { key } => {
                let cursor = map.upper_bound(&key);
                let expected = btree.range((Bound::Excluded(key), Bound::Unbounded)).next();
                assert_eq!(map.get(&cursor), expected);
            }
        }
    }
});

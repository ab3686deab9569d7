//! Sorted sets and maps stored as an implicit radix trie inside a single open-addressed hash
//! table.
//!
//! Keys are split into base-256 digits ([`keys`]). Every prefix of a stored key is a trie node,
//! and a node is found by hashing its `(depth, prefix, ordinal)` identity rather than by
//! following a pointer from its parent. That gives hash-table style `O(L)` point operations for
//! `L`-digit keys, while an ordered walk (probing ordinals `0..=255` level by level) still yields
//! keys in ascending order.
//!
//! ```rust
//! use radix_table::{RadixMap, RadixSet};
//!
//! let mut set = RadixSet::new();
//! set.insert_iter([-3i32, 100, 7, -200])?;
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [-200, -3, 7, 100]);
//!
//! let mut map = RadixMap::new();
//! map.insert(2.5f64, "two and a half")?;
//! map.insert(-1.0, "minus one")?;
//! let first = map.begin();
//! assert_eq!(map.get(&first), Some((&-1.0, &"minus one")));
//! # Ok::<(), radix_table::Error>(())
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod iter;
pub mod keys;
pub mod map;
mod node;
pub mod range;
pub mod set;
pub mod stats;
pub mod table;
pub mod utils;

pub use config::TableConfig;
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use keys::{Digits, TrieKey};
pub use map::RadixMap;
pub use set::RadixSet;
pub use stats::{TableStats, TableStatsTrait};

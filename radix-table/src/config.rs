//! Tuning knobs for a [`Table`](crate::table::Table).
//!
//! The defaults reproduce the classic behaviour: a 256 bucket starting array, doubling once 60%
//! of the buckets hold live nodes, halving once fewer than 15% do, and 1024 payloads per arena
//! page.

use crate::error::{Error, Result};

pub const DEFAULT_INITIAL_CAPACITY: usize = 256;
pub const DEFAULT_GROW_LOAD_PERCENT: usize = 60;
pub const DEFAULT_SHRINK_LOAD_PERCENT: usize = 15;
pub const DEFAULT_ARENA_PAGE_SIZE: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableConfig {
    /// Bucket count allocated on first insert, and the floor for shrinking. Rounded up to a
    /// power of two.
    pub initial_capacity: usize,
    /// The bucket array doubles when live nodes would reach this share of the buckets.
    pub grow_load_percent: usize,
    /// The bucket array halves after an erase leaves fewer live nodes than this share.
    pub shrink_load_percent: usize,
    /// Payload slots per arena page.
    pub arena_page_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            grow_load_percent: DEFAULT_GROW_LOAD_PERCENT,
            shrink_load_percent: DEFAULT_SHRINK_LOAD_PERCENT,
            arena_page_size: DEFAULT_ARENA_PAGE_SIZE,
        }
    }
}

impl TableConfig {
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_grow_load_percent(mut self, percent: usize) -> Self {
        self.grow_load_percent = percent;
        self
    }

    pub fn with_shrink_load_percent(mut self, percent: usize) -> Self {
        self.shrink_load_percent = percent;
        self
    }

    pub fn with_arena_page_size(mut self, slots: usize) -> Self {
        self.arena_page_size = slots;
        self
    }

    /// Checks the knobs and normalizes the initial capacity to a power of two.
    pub fn validate(self) -> Result<Self> {
        if self.initial_capacity < 2 {
            return Err(Error::InvalidConfig("initial_capacity must be at least 2"));
        }
        let Some(initial_capacity) = self.initial_capacity.checked_next_power_of_two() else {
            return Err(Error::InvalidConfig("initial_capacity is too large"));
        };
        if self.grow_load_percent == 0 || self.grow_load_percent >= 100 {
            return Err(Error::InvalidConfig(
                "grow_load_percent must be between 1 and 99",
            ));
        }
        // Halving must land strictly below the grow threshold or the table would thrash.
        if self.shrink_load_percent * 2 >= self.grow_load_percent {
            return Err(Error::InvalidConfig(
                "shrink_load_percent must be less than half of grow_load_percent",
            ));
        }
        if self.arena_page_size == 0 {
            return Err(Error::InvalidConfig("arena_page_size must be non-zero"));
        }
        Ok(Self {
            initial_capacity,
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = TableConfig::default().validate().unwrap();
        assert_eq!(config, TableConfig::default());
    }

    #[test]
    fn capacity_rounds_up() {
        let config = TableConfig::default()
            .with_initial_capacity(100)
            .validate()
            .unwrap();
        assert_eq!(config.initial_capacity, 128);
    }

    #[test]
    fn rejects_bad_thresholds() {
        assert!(matches!(
            TableConfig::default().with_grow_load_percent(100).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            TableConfig::default()
                .with_grow_load_percent(50)
                .with_shrink_load_percent(25)
                .validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            TableConfig::default().with_initial_capacity(1).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            TableConfig::default().with_arena_page_size(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }
}

//! Sorted key-value store over paired index columns.
//!
//! A store is two index files of equal length: `keys`, sorted ascending, and
//! `values`, where `values[i]` belongs to `keys[i]`. Keys may repeat; all
//! entries for one key are contiguous and keep their on-disk order.

use std::ops::Range;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{FuzzdexError, Result};
use crate::storage::column::{IndexColumn, LoadOptions};

/// Value reported by [`SortedKeyValueStore::lookup`] when a key is absent.
pub const NOT_FOUND: i32 = -1;

/// Read-only key-value store answering lookups by binary search.
#[derive(Debug)]
pub struct SortedKeyValueStore {
    keys: IndexColumn,
    values: IndexColumn,
    values2: Option<IndexColumn>,
}

impl SortedKeyValueStore {
    /// Open a store from a keys file and a values file.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(keys_path: P, values_path: Q) -> Result<Self> {
        Self::open_with(keys_path, values_path, &LoadOptions::default())
    }

    /// Open a store with explicit load options.
    pub fn open_with<P: AsRef<Path>, Q: AsRef<Path>>(
        keys_path: P,
        values_path: Q,
        options: &LoadOptions,
    ) -> Result<Self> {
        let keys = IndexColumn::load_with(keys_path.as_ref(), options)?;
        let values = IndexColumn::load_with(values_path.as_ref(), options)?;
        let store = Self::build(keys, values, options.verify_sorted)?;
        debug!(
            keys = %keys_path.as_ref().display(),
            values = %values_path.as_ref().display(),
            len = store.len(),
            "opened key-value store"
        );
        Ok(store)
    }

    /// Build a store from already loaded columns, validating both invariants.
    pub fn from_columns(keys: IndexColumn, values: IndexColumn) -> Result<Self> {
        Self::build(keys, values, true)
    }

    fn build(keys: IndexColumn, values: IndexColumn, verify_sorted: bool) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(FuzzdexError::format(format!(
                "keys have {} elements but values have {}",
                keys.len(),
                values.len()
            )));
        }
        if verify_sorted {
            if let Some(pos) = keys.first_unsorted() {
                return Err(FuzzdexError::precondition(format!(
                    "keys are not sorted ascending at position {pos}"
                )));
            }
        }
        Ok(SortedKeyValueStore {
            keys,
            values,
            values2: None,
        })
    }

    /// Attach a secondary value column paired with the same keys.
    pub fn with_secondary(mut self, values2: IndexColumn) -> Result<Self> {
        if values2.len() != self.keys.len() {
            return Err(FuzzdexError::format(format!(
                "keys have {} elements but secondary values have {}",
                self.keys.len(),
                values2.len()
            )));
        }
        self.values2 = Some(values2);
        Ok(self)
    }

    /// Load and attach a secondary value column from disk.
    pub fn with_secondary_file<P: AsRef<Path>>(self, path: P, options: &LoadOptions) -> Result<Self> {
        let values2 = IndexColumn::load_with(path, options)?;
        self.with_secondary(values2)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &IndexColumn {
        &self.keys
    }

    pub fn values(&self) -> &IndexColumn {
        &self.values
    }

    pub fn secondary_values(&self) -> Option<&IndexColumn> {
        self.values2.as_ref()
    }

    /// Position of the first entry for `key`, if present.
    fn anchor(&self, key: i32) -> Option<usize> {
        let pos = self.keys.lower_bound(key);
        (pos < self.keys.len() && self.keys.at(pos) == key).then_some(pos)
    }

    /// Value paired with the first occurrence of `key`.
    pub fn get_value(&self, key: i32) -> Option<i32> {
        let value = self.anchor(key).map(|pos| self.values.at(pos));
        trace!(key, ?value, "get_value");
        value
    }

    /// Lookup in `(value, found)` form; `value` is [`NOT_FOUND`] when `found`
    /// is false and must not be interpreted on its own.
    pub fn lookup(&self, key: i32) -> (i32, bool) {
        match self.get_value(key) {
            Some(value) => (value, true),
            None => (NOT_FOUND, false),
        }
    }

    /// Secondary value paired with the first occurrence of `key`.
    pub fn get_value2(&self, key: i32) -> Option<i32> {
        let values2 = self.values2.as_ref()?;
        self.anchor(key).map(|pos| values2.at(pos))
    }

    /// Positions of every entry whose key equals `key`.
    pub fn key_range(&self, key: i32) -> Range<usize> {
        match self.anchor(key) {
            Some(pos) => self.expand(pos, key),
            None => 0..0,
        }
    }

    /// Grow a matching position into the full run of equal keys.
    fn expand(&self, anchor: usize, key: i32) -> Range<usize> {
        let mut start = anchor;
        while start > 0 && self.keys.at(start - 1) == key {
            start -= 1;
        }
        let mut end = anchor + 1;
        while end < self.keys.len() && self.keys.at(end) == key {
            end += 1;
        }
        start..end
    }

    /// All values paired with `key`, in stored order. Empty when absent.
    pub fn get_values(&self, key: i32) -> Vec<i32> {
        let range = self.key_range(key);
        trace!(key, hits = range.len(), "get_values");
        range.map(|pos| self.values.at(pos)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(keys: &[i32], values: &[i32]) -> SortedKeyValueStore {
        SortedKeyValueStore::from_columns(
            IndexColumn::from_values(keys),
            IndexColumn::from_values(values),
        )
        .unwrap()
    }

    #[test]
    fn test_get_value_unique_keys() {
        let store = store(&[1, 3, 5, 7], &[10, 30, 50, 70]);
        assert_eq!(store.get_value(5), Some(50));
        assert_eq!(store.get_value(1), Some(10));
        assert_eq!(store.get_value(7), Some(70));
        assert_eq!(store.get_value(4), None);
        assert_eq!(store.get_value(0), None);
        assert_eq!(store.get_value(8), None);
    }

    #[test]
    fn test_lookup_pair_form() {
        let store = store(&[1, 3, 5, 7], &[10, 30, 50, 70]);
        assert_eq!(store.lookup(5), (50, true));
        assert!(!store.lookup(4).1);
    }

    #[test]
    fn test_duplicate_keys() {
        let store = store(&[2, 2, 2, 5], &[10, 20, 30, 40]);
        assert_eq!(store.get_values(2), vec![10, 20, 30]);
        assert_eq!(store.get_values(5), vec![40]);
        assert!(store.get_values(9).is_empty());
        assert!(store.get_values(1).is_empty());
        assert_eq!(store.get_value(2), Some(10));
        assert_eq!(store.key_range(2), 0..3);
    }

    #[test]
    fn test_expand_from_interior_anchor() {
        let store = store(&[1, 4, 4, 4, 4, 6], &[0, 1, 2, 3, 4, 5]);
        assert_eq!(store.expand(3, 4), 1..5);
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let err = SortedKeyValueStore::from_columns(
            IndexColumn::from_values(&[1, 2, 3]),
            IndexColumn::from_values(&[1, 2]),
        )
        .unwrap_err();
        assert!(matches!(err, FuzzdexError::Format(_)));
    }

    #[test]
    fn test_rejects_unsorted_keys() {
        let err = SortedKeyValueStore::from_columns(
            IndexColumn::from_values(&[3, 1, 2]),
            IndexColumn::from_values(&[1, 2, 3]),
        )
        .unwrap_err();
        assert!(matches!(err, FuzzdexError::Precondition(_)));
    }

    #[test]
    fn test_secondary_values() {
        let store = store(&[1, 3, 5], &[10, 30, 50])
            .with_secondary(IndexColumn::from_values(&[100, 300, 500]))
            .unwrap();
        assert_eq!(store.get_value2(3), Some(300));
        assert_eq!(store.get_value2(4), None);

        let err = self::store(&[1, 3], &[10, 30])
            .with_secondary(IndexColumn::from_values(&[1]))
            .unwrap_err();
        assert!(matches!(err, FuzzdexError::Format(_)));
    }

    #[test]
    fn test_empty_store() {
        let store = store(&[], &[]);
        assert!(store.is_empty());
        assert_eq!(store.get_value(0), None);
        assert!(store.get_values(0).is_empty());
    }
}

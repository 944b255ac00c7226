//! In-memory key-value store.

use std::collections::BTreeMap;

use crate::error::DbError;
use crate::kv::{KeyValueStore, StoredValue};

/// A [`KeyValueStore`] held entirely in memory.
///
/// Flushing is a no-op that only counts calls, which lets tests assert that
/// callers flushed after mutating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
    flushes: u64,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            flushes: 0,
        }
    }

    /// Create a store pre-populated with `values`.
    pub const fn from_values(values: BTreeMap<String, StoredValue>) -> Self {
        Self { values, flushes: 0 }
    }

    /// All stored values, keyed by name.
    pub const fn values(&self) -> &BTreeMap<String, StoredValue> {
        &self.values
    }

    /// Number of times [`KeyValueStore::flush`] was called.
    pub const fn flush_count(&self) -> u64 {
        self.flushes
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(StoredValue::Int(v)) => *v,
            _ => default,
        }
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_owned(), StoredValue::Int(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.values.get(key) {
            Some(StoredValue::Text(v)) => Some(v.clone()),
            _ => None,
        }
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), StoredValue::Text(value));
    }

    fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn flush(&mut self) -> Result<(), DbError> {
        self.flushes = self.flushes.saturating_add(1);
        Ok(())
    }
}

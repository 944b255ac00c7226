//! The key-value port.
//!
//! Modeled on a game engine's player-preferences API: integers and strings
//! under flat string keys, with an explicit flush that makes prior writes
//! durable. Reads never fail; a missing key or a key holding the other
//! type reads as absent.

use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// A value held under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    /// An integer value.
    Int(i64),
    /// A string value (serialized blobs live here).
    Text(String),
}

/// A flat, synchronous key-value store.
pub trait KeyValueStore {
    /// Read an integer, or `default` if the key is missing or not an integer.
    fn get_int(&self, key: &str, default: i64) -> i64;

    /// Write an integer.
    fn set_int(&mut self, key: &str, value: i64);

    /// Read a string, or `None` if the key is missing or not a string.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Write a string.
    fn set_string(&mut self, key: &str, value: String);

    /// Whether any value is stored under `key`.
    fn has_key(&self, key: &str) -> bool;

    /// Make all prior writes durable.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backing medium cannot be written.
    fn flush(&mut self) -> Result<(), DbError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        (**self).get_int(key, default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        (**self).set_int(key, value);
    }

    fn get_string(&self, key: &str) -> Option<String> {
        (**self).get_string(key)
    }

    fn set_string(&mut self, key: &str, value: String) {
        (**self).set_string(key, value);
    }

    fn has_key(&self, key: &str) -> bool {
        (**self).has_key(key)
    }

    fn flush(&mut self) -> Result<(), DbError> {
        (**self).flush()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        (**self).get_int(key, default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        (**self).set_int(key, value);
    }

    fn get_string(&self, key: &str) -> Option<String> {
        (**self).get_string(key)
    }

    fn set_string(&mut self, key: &str, value: String) {
        (**self).set_string(key, value);
    }

    fn has_key(&self, key: &str) -> bool {
        (**self).has_key(key)
    }

    fn flush(&mut self) -> Result<(), DbError> {
        (**self).flush()
    }
}

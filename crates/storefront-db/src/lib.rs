//! Persistence layer for the Storefront in-game store.
//!
//! The store's durable state lives in a flat key-value substrate (the game
//! engine's preferences file, a save slot, or a test fake). This crate
//! defines that substrate as the [`KeyValueStore`] port and provides the
//! codec that maps the ledger balance and [`ProgressionState`] onto it.
//!
//! # Architecture
//!
//! ```text
//! CurrencyLedger.balance ---> balance key (integer)
//! ProgressionState
//!     |-- quantities -------> quantities key (parallel keys/values JSON)
//!     |-- levels -----------> levels key     (parallel keys/values JSON)
//!     |-- unlocked ---------> unlocked key   (JSON id array)
//!     +-- purchases --------> purchases key  (parallel keys/values JSON)
//! ```
//!
//! # Modules
//!
//! - [`kv`] -- The [`KeyValueStore`] port and its stored value type
//! - [`memory`] -- In-memory store for tests and ephemeral sessions
//! - [`file`] -- JSON-file-backed store with atomic flush
//! - [`keys`] -- Fixed key names, overridable by configuration
//! - [`codec`] -- Save/load of balance and progression
//! - [`error`] -- Shared error types
//!
//! [`ProgressionState`]: storefront_types::ProgressionState

pub mod codec;
pub mod error;
pub mod file;
pub mod keys;
pub mod kv;
pub mod memory;

// Re-export primary types for convenience.
pub use codec::{Field, LoadReport, StoreCodec};
pub use error::DbError;
pub use file::FileStore;
pub use keys::StoreKeys;
pub use kv::{KeyValueStore, StoredValue};
pub use memory::MemoryStore;

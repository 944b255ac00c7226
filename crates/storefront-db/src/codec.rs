//! Save codec for the ledger balance and [`ProgressionState`].
//!
//! Integer maps are written as two parallel sequences so that stores
//! without native record support can hold them:
//!
//! ```text
//! {"keys":["magnet","boots"],"values":[2,1]}
//! ```
//!
//! The unlocked set is written as an id array. Loading is lossy but safe:
//! a missing key leaves the field untouched, and a corrupt blob resets that
//! field to empty without affecting the others.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use storefront_types::{EntityId, ProgressionState};

use crate::error::DbError;
use crate::keys::StoreKeys;
use crate::kv::KeyValueStore;

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// An integer map flattened into parallel sequences.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ParallelMap {
    keys: Vec<String>,
    values: Vec<u32>,
}

impl ParallelMap {
    fn from_map(map: &BTreeMap<EntityId, u32>) -> Self {
        let (keys, values) = map
            .iter()
            .map(|(id, value)| (id.as_str().to_owned(), *value))
            .unzip();
        Self { keys, values }
    }

    /// Zip back into a map. `None` when the sequences differ in length.
    fn into_map(self) -> Option<BTreeMap<EntityId, u32>> {
        if self.keys.len() != self.values.len() {
            return None;
        }
        Some(
            self.keys
                .into_iter()
                .map(EntityId::from)
                .zip(self.values)
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Load report
// ---------------------------------------------------------------------------

/// A persisted progression field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Consumable quantities.
    Quantities,
    /// Upgrade levels.
    Levels,
    /// Owned unlockables.
    Unlocked,
    /// Purchase counters.
    Purchases,
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Quantities => "quantities",
            Self::Levels => "levels",
            Self::Unlocked => "unlocked",
            Self::Purchases => "purchases",
        })
    }
}

/// What happened to each field during [`StoreCodec::load`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Fields repopulated from the store.
    pub restored: Vec<Field>,
    /// Fields with no saved data; left untouched.
    pub missing: Vec<Field>,
    /// Fields whose saved data was unreadable; reset to empty.
    pub corrupt: Vec<Field>,
}

impl LoadReport {
    /// Whether every present field decoded cleanly.
    pub fn is_clean(&self) -> bool {
        self.corrupt.is_empty()
    }

    fn record(&mut self, field: Field, status: FieldStatus) {
        match status {
            FieldStatus::Restored => self.restored.push(field),
            FieldStatus::Missing => self.missing.push(field),
            FieldStatus::Corrupt => self.corrupt.push(field),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldStatus {
    Restored,
    Missing,
    Corrupt,
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Maps the balance and progression state onto a [`KeyValueStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCodec {
    keys: StoreKeys,
}

impl StoreCodec {
    /// Create a codec writing under `keys`.
    pub const fn new(keys: StoreKeys) -> Self {
        Self { keys }
    }

    /// The key names in use.
    pub const fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    // =========================================================================
    // Progression
    // =========================================================================

    /// Write every progression field and flush the store.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if a blob cannot be encoded.
    /// Returns any error raised by [`KeyValueStore::flush`].
    pub fn save<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        state: &ProgressionState,
    ) -> Result<(), DbError> {
        self.write_progression(store, state)?;
        store.flush()
    }

    /// Repopulate `state` from the store.
    ///
    /// Never fails: missing fields are left as they are and corrupt fields
    /// are cleared. The returned report says which happened to each field.
    pub fn load<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        state: &mut ProgressionState,
    ) -> LoadReport {
        let mut report = LoadReport::default();

        let status = load_map(store, &self.keys.quantities, state.quantities_mut());
        report.record(Field::Quantities, status);

        let status = load_map(store, &self.keys.levels, state.levels_mut());
        report.record(Field::Levels, status);

        let status = load_set(store, &self.keys.unlocked, state.unlocked_mut());
        report.record(Field::Unlocked, status);

        let status = load_map(store, &self.keys.purchases, state.purchases_mut());
        report.record(Field::Purchases, status);

        for field in &report.corrupt {
            warn!(%field, "Saved progression field was unreadable, reset to empty");
        }
        debug!(
            restored = report.restored.len(),
            missing = report.missing.len(),
            corrupt = report.corrupt.len(),
            "Loaded progression"
        );
        report
    }

    // =========================================================================
    // Balance
    // =========================================================================

    /// Write the balance and flush the store.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::OutOfRange`] if the balance exceeds `i64::MAX`.
    /// Returns any error raised by [`KeyValueStore::flush`].
    pub fn save_balance<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        balance: u64,
    ) -> Result<(), DbError> {
        self.write_balance(store, balance)?;
        store.flush()
    }

    /// Read the balance, or `default` when none was saved.
    ///
    /// A saved value that is negative or not an integer is corrupt and
    /// reads as zero.
    pub fn load_balance<S: KeyValueStore + ?Sized>(&self, store: &S, default: u64) -> u64 {
        if !store.has_key(&self.keys.balance) {
            return default;
        }

        let raw = store.get_int(&self.keys.balance, -1);
        u64::try_from(raw).unwrap_or_else(|_| {
            warn!(key = %self.keys.balance, raw, "Saved balance was unreadable, reset to zero");
            0
        })
    }

    // =========================================================================
    // Combined
    // =========================================================================

    /// Write the balance and every progression field with a single flush.
    ///
    /// # Errors
    ///
    /// See [`StoreCodec::save`] and [`StoreCodec::save_balance`].
    pub fn save_all<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        state: &ProgressionState,
        balance: u64,
    ) -> Result<(), DbError> {
        self.write_balance(store, balance)?;
        self.write_progression(store, state)?;
        store.flush()
    }

    fn write_balance<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        balance: u64,
    ) -> Result<(), DbError> {
        let Ok(value) = i64::try_from(balance) else {
            return Err(DbError::OutOfRange {
                key: self.keys.balance.clone(),
                value: balance,
            });
        };
        store.set_int(&self.keys.balance, value);
        Ok(())
    }

    fn write_progression<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        state: &ProgressionState,
    ) -> Result<(), DbError> {
        save_map(store, &self.keys.quantities, state.quantities())?;
        save_map(store, &self.keys.levels, state.levels())?;
        save_set(store, &self.keys.unlocked, state.unlocked())?;
        save_map(store, &self.keys.purchases, state.purchases())?;
        Ok(())
    }
}

fn save_map<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    map: &BTreeMap<EntityId, u32>,
) -> Result<(), DbError> {
    let json = serde_json::to_string(&ParallelMap::from_map(map))?;
    store.set_string(key, json);
    Ok(())
}

fn save_set<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    set: &BTreeSet<EntityId>,
) -> Result<(), DbError> {
    let json = serde_json::to_string(set)?;
    store.set_string(key, json);
    Ok(())
}

fn load_map<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    map: &mut BTreeMap<EntityId, u32>,
) -> FieldStatus {
    if !store.has_key(key) {
        return FieldStatus::Missing;
    }

    map.clear();
    let decoded = store
        .get_string(key)
        .and_then(|raw| serde_json::from_str::<ParallelMap>(&raw).ok())
        .and_then(ParallelMap::into_map);

    match decoded {
        Some(restored) => {
            *map = restored;
            FieldStatus::Restored
        }
        None => FieldStatus::Corrupt,
    }
}

fn load_set<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    set: &mut BTreeSet<EntityId>,
) -> FieldStatus {
    if !store.has_key(key) {
        return FieldStatus::Missing;
    }

    set.clear();
    let decoded = store
        .get_string(key)
        .and_then(|raw| serde_json::from_str::<BTreeSet<EntityId>>(&raw).ok());

    match decoded {
        Some(restored) => {
            *set = restored;
            FieldStatus::Restored
        }
        None => FieldStatus::Corrupt,
    }
}

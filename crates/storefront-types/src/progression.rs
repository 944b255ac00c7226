//! The player's progression through the store catalog.
//!
//! Absence from a map means the default (zero quantity, level zero, not
//! unlocked, never purchased). Every accessor and mutator is total: there is
//! no cross-field validation here, that belongs to the purchase service.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// Owned quantities, upgrade levels, unlocks, and purchase counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    quantities: BTreeMap<EntityId, u32>,
    levels: BTreeMap<EntityId, u32>,
    unlocked: BTreeSet<EntityId>,
    purchases: BTreeMap<EntityId, u32>,
}

impl ProgressionState {
    /// Create an empty state (fresh profile).
    pub const fn new() -> Self {
        Self {
            quantities: BTreeMap::new(),
            levels: BTreeMap::new(),
            unlocked: BTreeSet::new(),
            purchases: BTreeMap::new(),
        }
    }

    /// Whether nothing has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
            && self.levels.is_empty()
            && self.unlocked.is_empty()
            && self.purchases.is_empty()
    }

    // =========================================================================
    // Consumables
    // =========================================================================

    /// Owned quantity of a consumable.
    pub fn quantity(&self, id: &str) -> u32 {
        self.quantities.get(id).copied().unwrap_or(0)
    }

    /// Add `delta` to the owned quantity, returning the new quantity.
    ///
    /// Saturates at `u32::MAX`.
    pub fn add_quantity(&mut self, id: &EntityId, delta: u32) -> u32 {
        let quantity = self.quantities.entry(id.clone()).or_insert(0);
        *quantity = quantity.saturating_add(delta);
        *quantity
    }

    // =========================================================================
    // Upgrades
    // =========================================================================

    /// Current level of an upgrade.
    pub fn level(&self, id: &str) -> u32 {
        self.levels.get(id).copied().unwrap_or(0)
    }

    /// Raise the level by one, returning the new level.
    ///
    /// The caller checks the cap first.
    pub fn increment_level(&mut self, id: &EntityId) -> u32 {
        let level = self.levels.entry(id.clone()).or_insert(0);
        *level = level.saturating_add(1);
        *level
    }

    // =========================================================================
    // Unlockables
    // =========================================================================

    /// Whether an unlockable is owned.
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Mark an unlockable as owned. Returns `false` if it already was.
    pub fn unlock(&mut self, id: &EntityId) -> bool {
        self.unlocked.insert(id.clone())
    }

    // =========================================================================
    // Purchase counters
    // =========================================================================

    /// Number of successful purchases of `id`; the next purchase index.
    pub fn purchase_count(&self, id: &str) -> u32 {
        self.purchases.get(id).copied().unwrap_or(0)
    }

    /// Count one more successful purchase, returning the new count.
    pub fn record_purchase(&mut self, id: &EntityId) -> u32 {
        let count = self.purchases.entry(id.clone()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    // =========================================================================
    // Raw access for the persistence codec
    // =========================================================================

    /// All recorded consumable quantities.
    pub const fn quantities(&self) -> &BTreeMap<EntityId, u32> {
        &self.quantities
    }

    /// Mutable consumable quantities.
    pub const fn quantities_mut(&mut self) -> &mut BTreeMap<EntityId, u32> {
        &mut self.quantities
    }

    /// All recorded upgrade levels.
    pub const fn levels(&self) -> &BTreeMap<EntityId, u32> {
        &self.levels
    }

    /// Mutable upgrade levels.
    pub const fn levels_mut(&mut self) -> &mut BTreeMap<EntityId, u32> {
        &mut self.levels
    }

    /// All owned unlockables.
    pub const fn unlocked(&self) -> &BTreeSet<EntityId> {
        &self.unlocked
    }

    /// Mutable owned unlockables.
    pub const fn unlocked_mut(&mut self) -> &mut BTreeSet<EntityId> {
        &mut self.unlocked
    }

    /// All recorded purchase counters.
    pub const fn purchases(&self) -> &BTreeMap<EntityId, u32> {
        &self.purchases
    }

    /// Mutable purchase counters.
    pub const fn purchases_mut(&mut self) -> &mut BTreeMap<EntityId, u32> {
        &mut self.purchases
    }
}

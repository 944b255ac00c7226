//! Catalog descriptor structs.
//!
//! Descriptors are authored outside the core (YAML, embedded data, or a
//! remote fetch) and are read-only once loaded.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;
use crate::ids::EntityId;

// ---------------------------------------------------------------------------
// Entity descriptor
// ---------------------------------------------------------------------------

/// A purchasable entity as authored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Unique catalog identifier.
    pub id: EntityId,
    /// Purchase semantics.
    pub kind: EntityKind,
    /// Ordered price list. Consumables and unlockables use the first entry;
    /// upgrades index it by level. Should hold at least one entry.
    #[serde(default)]
    pub cost_schedule: Vec<u64>,
    /// Whether the last price repeats once the schedule is exhausted.
    /// Only the purchase-index pricing policy reads it.
    #[serde(default)]
    pub repeat_last_cost: bool,
    /// Level cap. Only meaningful for [`EntityKind::ProgressiveUpgrade`].
    #[serde(default)]
    pub max_level: u32,
}

impl EntityDescriptor {
    /// A consumable with a single fixed price.
    pub fn consumable(id: impl Into<EntityId>, cost: u64) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Consumable,
            cost_schedule: vec![cost],
            repeat_last_cost: false,
            max_level: 0,
        }
    }

    /// A progressive upgrade with a per-level price list.
    pub fn upgrade(id: impl Into<EntityId>, cost_schedule: Vec<u64>, max_level: u32) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::ProgressiveUpgrade,
            cost_schedule,
            repeat_last_cost: false,
            max_level,
        }
    }

    /// A one-time unlockable.
    pub fn unlockable(id: impl Into<EntityId>, cost: u64) -> Self {
        Self {
            id: id.into(),
            kind: EntityKind::Unlockable,
            cost_schedule: vec![cost],
            repeat_last_cost: false,
            max_level: 0,
        }
    }

    /// Replace the price list.
    #[must_use]
    pub fn with_cost_schedule(mut self, cost_schedule: Vec<u64>) -> Self {
        self.cost_schedule = cost_schedule;
        self
    }

    /// Set whether the last price repeats past the end of the schedule.
    #[must_use]
    pub const fn with_repeat_last_cost(mut self, repeat: bool) -> Self {
        self.repeat_last_cost = repeat;
        self
    }

    /// The first scheduled price, if any.
    pub fn first_cost(&self) -> Option<u64> {
        self.cost_schedule.first().copied()
    }

    /// The last scheduled price, if any.
    pub fn last_cost(&self) -> Option<u64> {
        self.cost_schedule.last().copied()
    }

    /// The price at `index`, if the schedule is that long.
    pub fn cost_at(&self, index: usize) -> Option<u64> {
        self.cost_schedule.get(index).copied()
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The ordered, read-only list of entities offered by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<EntityDescriptor>,
}

impl Catalog {
    /// Wrap an authored list of descriptors, keeping their order.
    pub const fn new(entries: Vec<EntityDescriptor>) -> Self {
        Self { entries }
    }

    /// Look up a descriptor by id.
    pub fn get(&self, id: &str) -> Option<&EntityDescriptor> {
        self.entries.iter().find(|d| d.id.as_str() == id)
    }

    /// Whether the catalog offers `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Iterate descriptors in authored order.
    pub fn iter(&self) -> core::slice::Iter<'_, EntityDescriptor> {
        self.entries.iter()
    }

    /// Number of descriptors.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids that appear more than once, each reported once, in first-seen order.
    pub fn duplicate_ids(&self) -> Vec<EntityId> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for descriptor in &self.entries {
            if !seen.insert(descriptor.id.as_str()) && !duplicates.contains(&descriptor.id) {
                duplicates.push(descriptor.id.clone());
            }
        }
        duplicates
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a EntityDescriptor;
    type IntoIter = core::slice::Iter<'a, EntityDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<EntityDescriptor> for Catalog {
    fn from_iter<I: IntoIterator<Item = EntityDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

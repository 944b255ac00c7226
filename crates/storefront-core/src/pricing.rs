//! Cost policies: how the price of the next purchase is picked from an
//! entity's cost schedule.
//!
//! Two pricing models exist in saved games and catalogs:
//!
//! | Policy | Consumable / Unlockable | Progressive upgrade |
//! |--------|-------------------------|---------------------|
//! | [`LevelDerivedPricing`] | `cost_schedule[0]` | `cost_schedule[min(level, len - 1)]` |
//! | [`PurchaseIndexPricing`] | `cost_schedule[count]` | `cost_schedule[count]` |
//!
//! Under purchase-index pricing, `count` is the number of successful
//! purchases of the entity. Once the schedule is exhausted the entity is
//! maxed unless `repeat_last_cost` is set, in which case the last price
//! repeats forever.
//!
//! Both policies treat an empty schedule as not purchasable.

use serde::{Deserialize, Serialize};
use storefront_types::{EntityDescriptor, EntityKind, ProgressionState};

/// Selects a [`CostPolicy`] from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostPolicyKind {
    /// Price derived from the current upgrade level.
    #[default]
    LevelDerived,
    /// Price indexed by the persisted purchase counter.
    PurchaseIndex,
}

impl CostPolicyKind {
    /// Build the policy this kind names.
    pub fn policy(self) -> Box<dyn CostPolicy + Send + Sync> {
        match self {
            Self::LevelDerived => Box::new(LevelDerivedPricing),
            Self::PurchaseIndex => Box::new(PurchaseIndexPricing),
        }
    }
}

/// Picks the price of the next purchase of an entity.
///
/// Implementations only price; cap and ownership checks live in
/// [`PurchaseService`](crate::purchase::PurchaseService).
pub trait CostPolicy: core::fmt::Debug {
    /// The cost of the next purchase, or `None` when no price applies
    /// (empty or exhausted schedule).
    fn next_cost(&self, descriptor: &EntityDescriptor, state: &ProgressionState) -> Option<u64>;

    /// The configuration value that selects this policy.
    fn kind(&self) -> CostPolicyKind;
}

// ---------------------------------------------------------------------------
// Level-derived
// ---------------------------------------------------------------------------

/// Prices upgrades by current level, everything else by the first entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelDerivedPricing;

impl CostPolicy for LevelDerivedPricing {
    fn next_cost(&self, descriptor: &EntityDescriptor, state: &ProgressionState) -> Option<u64> {
        match descriptor.kind {
            EntityKind::Consumable | EntityKind::Unlockable => descriptor.first_cost(),
            EntityKind::ProgressiveUpgrade => {
                let level = usize::try_from(state.level(descriptor.id.as_str())).unwrap_or(usize::MAX);
                let last = descriptor.cost_schedule.len().checked_sub(1)?;
                descriptor.cost_at(level.min(last))
            }
        }
    }

    fn kind(&self) -> CostPolicyKind {
        CostPolicyKind::LevelDerived
    }
}

// ---------------------------------------------------------------------------
// Purchase-index
// ---------------------------------------------------------------------------

/// Prices every kind by how many times the entity has been bought.
#[derive(Debug, Clone, Copy, Default)]
pub struct PurchaseIndexPricing;

impl CostPolicy for PurchaseIndexPricing {
    fn next_cost(&self, descriptor: &EntityDescriptor, state: &ProgressionState) -> Option<u64> {
        let count = state.purchase_count(descriptor.id.as_str());
        let index = usize::try_from(count).unwrap_or(usize::MAX);
        descriptor.cost_at(index).or_else(|| {
            if descriptor.repeat_last_cost {
                descriptor.last_cost()
            } else {
                None
            }
        })
    }

    fn kind(&self) -> CostPolicyKind {
        CostPolicyKind::PurchaseIndex
    }
}

//! Purchase resolution: one resolver per entity kind.
//!
//! Every resolver follows the same shape:
//!
//! 1. Terminal check (upgrade level cap, unlockable already owned).
//! 2. Price lookup through the configured [`CostPolicy`].
//! 3. Afford check against the [`CurrencyLedger`].
//! 4. Spend, then apply the kind-specific state mutation.
//! 5. Bump the entity's purchase counter.
//!
//! Steps 3 to 5 run under a single `&mut` borrow of both the ledger and the
//! progression state, so a spend is never observed without its mutation.

use storefront_ledger::CurrencyLedger;
use storefront_types::{EntityDescriptor, EntityKind, PriceTag, ProgressionState, PurchaseResult};
use tracing::debug;

use crate::pricing::{CostPolicy, CostPolicyKind};

/// Validates and applies purchases against a ledger and progression state.
#[derive(Debug)]
pub struct PurchaseService {
    policy: Box<dyn CostPolicy + Send + Sync>,
}

impl Default for PurchaseService {
    fn default() -> Self {
        Self::from_kind(CostPolicyKind::default())
    }
}

impl PurchaseService {
    /// Create a service that prices through `policy`.
    pub const fn new(policy: Box<dyn CostPolicy + Send + Sync>) -> Self {
        Self { policy }
    }

    /// Create a service using the policy a configuration value names.
    pub fn from_kind(kind: CostPolicyKind) -> Self {
        Self::new(kind.policy())
    }

    /// The active pricing policy.
    pub fn policy(&self) -> &(dyn CostPolicy + Send + Sync) {
        self.policy.as_ref()
    }

    /// Attempt to buy one unit (or one level) of `descriptor`.
    ///
    /// On anything other than [`PurchaseResult::Success`] neither `ledger`
    /// nor `state` is modified.
    pub fn try_purchase(
        &self,
        descriptor: &EntityDescriptor,
        ledger: &mut CurrencyLedger,
        state: &mut ProgressionState,
    ) -> PurchaseResult {
        let result = match descriptor.kind {
            EntityKind::Consumable => self.resolve_consumable(descriptor, ledger, state),
            EntityKind::ProgressiveUpgrade => self.resolve_upgrade(descriptor, ledger, state),
            EntityKind::Unlockable => self.resolve_unlockable(descriptor, ledger, state),
        };
        debug!(
            entity = %descriptor.id,
            kind = ?descriptor.kind,
            ?result,
            balance = ledger.balance(),
            "Purchase resolved"
        );
        result
    }

    /// The price the next [`try_purchase`](Self::try_purchase) would charge.
    ///
    /// [`PriceTag::Maxed`] for a capped upgrade, an owned unlockable, or an
    /// exhausted schedule.
    pub fn quote(&self, descriptor: &EntityDescriptor, state: &ProgressionState) -> PriceTag {
        if is_terminal(descriptor, state) {
            return PriceTag::Maxed;
        }
        self.policy
            .next_cost(descriptor, state)
            .map_or(PriceTag::Maxed, PriceTag::Price)
    }

    // =========================================================================
    // Per-kind resolvers
    // =========================================================================

    fn resolve_consumable(
        &self,
        descriptor: &EntityDescriptor,
        ledger: &mut CurrencyLedger,
        state: &mut ProgressionState,
    ) -> PurchaseResult {
        if let Err(result) = self.charge(descriptor, ledger, state) {
            return result;
        }
        state.add_quantity(&descriptor.id, 1);
        state.record_purchase(&descriptor.id);
        PurchaseResult::Success
    }

    fn resolve_upgrade(
        &self,
        descriptor: &EntityDescriptor,
        ledger: &mut CurrencyLedger,
        state: &mut ProgressionState,
    ) -> PurchaseResult {
        if state.level(descriptor.id.as_str()) >= descriptor.max_level {
            return PurchaseResult::Maxed;
        }
        if let Err(result) = self.charge(descriptor, ledger, state) {
            return result;
        }
        state.increment_level(&descriptor.id);
        state.record_purchase(&descriptor.id);
        PurchaseResult::Success
    }

    fn resolve_unlockable(
        &self,
        descriptor: &EntityDescriptor,
        ledger: &mut CurrencyLedger,
        state: &mut ProgressionState,
    ) -> PurchaseResult {
        if state.is_unlocked(descriptor.id.as_str()) {
            return PurchaseResult::Maxed;
        }
        if let Err(result) = self.charge(descriptor, ledger, state) {
            return result;
        }
        state.unlock(&descriptor.id);
        state.record_purchase(&descriptor.id);
        PurchaseResult::Success
    }

    /// Price, afford-check, and spend. `Err` carries the non-success result.
    fn charge(
        &self,
        descriptor: &EntityDescriptor,
        ledger: &mut CurrencyLedger,
        state: &ProgressionState,
    ) -> Result<(), PurchaseResult> {
        let Some(cost) = self.policy.next_cost(descriptor, state) else {
            return Err(PurchaseResult::Maxed);
        };
        if !ledger.can_afford(cost) {
            return Err(PurchaseResult::InsufficientFunds);
        }
        let reason = format!("purchase:{}", descriptor.id);
        if ledger.spend(cost, reason).is_err() {
            return Err(PurchaseResult::InsufficientFunds);
        }
        Ok(())
    }
}

fn is_terminal(descriptor: &EntityDescriptor, state: &ProgressionState) -> bool {
    match descriptor.kind {
        EntityKind::Consumable => false,
        EntityKind::ProgressiveUpgrade => state.level(descriptor.id.as_str()) >= descriptor.max_level,
        EntityKind::Unlockable => state.is_unlocked(descriptor.id.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use storefront_types::EntityId;

    use super::*;

    fn level_to(state: &mut ProgressionState, id: &str, level: u32) {
        for _ in 0..level {
            state.increment_level(&EntityId::from(id));
        }
    }

    // -------------------------------------------------------------------------
    // Consumables
    // -------------------------------------------------------------------------

    #[test]
    fn consumable_success_spends_and_stacks() {
        let service = PurchaseService::default();
        let potion = EntityDescriptor::consumable("potion", 20);
        let mut ledger = CurrencyLedger::with_balance(100);
        let mut state = ProgressionState::new();

        let result = service.try_purchase(&potion, &mut ledger, &mut state);

        assert_eq!(result, PurchaseResult::Success);
        assert_eq!(ledger.balance(), 80);
        assert_eq!(state.quantity("potion"), 1);
        assert_eq!(state.purchase_count("potion"), 1);
    }

    #[test]
    fn consumable_unaffordable_leaves_everything_alone() {
        let service = PurchaseService::default();
        let potion = EntityDescriptor::consumable("potion", 20);
        let mut ledger = CurrencyLedger::with_balance(5);
        let mut state = ProgressionState::new();

        let result = service.try_purchase(&potion, &mut ledger, &mut state);

        assert_eq!(result, PurchaseResult::InsufficientFunds);
        assert_eq!(ledger.balance(), 5);
        assert!(state.is_empty());
    }

    #[test]
    fn zero_cost_consumable_is_free() {
        let service = PurchaseService::default();
        let gift = EntityDescriptor::consumable("gift", 0);
        let mut ledger = CurrencyLedger::new();
        let mut state = ProgressionState::new();

        assert!(service.try_purchase(&gift, &mut ledger, &mut state).is_success());
        assert_eq!(state.quantity("gift"), 1);
    }

    // -------------------------------------------------------------------------
    // Upgrades
    // -------------------------------------------------------------------------

    #[test]
    fn upgrade_final_level_then_maxed() {
        let service = PurchaseService::default();
        let magnet = EntityDescriptor::upgrade("magnet", vec![10, 20, 30], 3);
        let mut ledger = CurrencyLedger::with_balance(30);
        let mut state = ProgressionState::new();
        level_to(&mut state, "magnet", 2);

        assert_eq!(service.try_purchase(&magnet, &mut ledger, &mut state), PurchaseResult::Success);
        assert_eq!(state.level("magnet"), 3);
        assert_eq!(ledger.balance(), 0);

        assert_eq!(service.try_purchase(&magnet, &mut ledger, &mut state), PurchaseResult::Maxed);
        assert_eq!(state.level("magnet"), 3);
    }

    #[test]
    fn capped_upgrade_never_charges() {
        let service = PurchaseService::default();
        let magnet = EntityDescriptor::upgrade("magnet", vec![10], 1);
        let mut ledger = CurrencyLedger::with_balance(1_000);
        let mut state = ProgressionState::new();
        level_to(&mut state, "magnet", 1);

        for _ in 0..5 {
            assert_eq!(service.try_purchase(&magnet, &mut ledger, &mut state), PurchaseResult::Maxed);
        }
        assert_eq!(ledger.balance(), 1_000);
        assert_eq!(state.level("magnet"), 1);
    }

    #[test]
    fn empty_schedule_is_maxed_for_every_kind() {
        let service = PurchaseService::default();
        let mut ledger = CurrencyLedger::with_balance(100);
        let mut state = ProgressionState::new();
        let broken = [
            EntityDescriptor::consumable("a", 1).with_cost_schedule(Vec::new()),
            EntityDescriptor::upgrade("b", Vec::new(), 3),
            EntityDescriptor::unlockable("c", 1).with_cost_schedule(Vec::new()),
        ];

        for descriptor in &broken {
            assert_eq!(service.try_purchase(descriptor, &mut ledger, &mut state), PurchaseResult::Maxed);
            assert_eq!(service.quote(descriptor, &state), PriceTag::Maxed);
        }
        assert_eq!(ledger.balance(), 100);
        assert!(state.is_empty());
    }

    // -------------------------------------------------------------------------
    // Unlockables
    // -------------------------------------------------------------------------

    #[test]
    fn unlockable_once_then_maxed() {
        let service = PurchaseService::default();
        let hat = EntityDescriptor::unlockable("hat", 50);
        let mut ledger = CurrencyLedger::with_balance(50);
        let mut state = ProgressionState::new();

        assert_eq!(service.try_purchase(&hat, &mut ledger, &mut state), PurchaseResult::Success);
        assert_eq!(ledger.balance(), 0);
        assert!(state.is_unlocked("hat"));

        assert!(ledger.earn(50, "test").is_ok());
        assert_eq!(service.try_purchase(&hat, &mut ledger, &mut state), PurchaseResult::Maxed);
        assert_eq!(ledger.balance(), 50);
    }

    // -------------------------------------------------------------------------
    // Purchase-index pricing
    // -------------------------------------------------------------------------

    #[test]
    fn purchase_index_caps_consumable_when_schedule_runs_out() {
        let service = PurchaseService::from_kind(CostPolicyKind::PurchaseIndex);
        let crate_item = EntityDescriptor::consumable("crate", 10).with_cost_schedule(vec![10, 25]);
        let mut ledger = CurrencyLedger::with_balance(100);
        let mut state = ProgressionState::new();

        assert_eq!(service.quote(&crate_item, &state), PriceTag::Price(10));
        assert!(service.try_purchase(&crate_item, &mut ledger, &mut state).is_success());
        assert_eq!(service.quote(&crate_item, &state), PriceTag::Price(25));
        assert!(service.try_purchase(&crate_item, &mut ledger, &mut state).is_success());
        assert_eq!(service.try_purchase(&crate_item, &mut ledger, &mut state), PurchaseResult::Maxed);
        assert_eq!(ledger.balance(), 65);
        assert_eq!(state.quantity("crate"), 2);
    }

    #[test]
    fn purchase_index_repeat_last_cost_keeps_selling() {
        let service = PurchaseService::from_kind(CostPolicyKind::PurchaseIndex);
        let crate_item = EntityDescriptor::consumable("crate", 10)
            .with_cost_schedule(vec![10, 25])
            .with_repeat_last_cost(true);
        let mut ledger = CurrencyLedger::with_balance(100);
        let mut state = ProgressionState::new();

        for _ in 0..3 {
            assert!(service.try_purchase(&crate_item, &mut ledger, &mut state).is_success());
        }
        assert_eq!(ledger.balance(), 40);
        assert_eq!(service.quote(&crate_item, &state), PriceTag::Price(25));
    }

    #[test]
    fn policies_diverge_past_schedule_end() {
        // Level-derived reuses the last price; purchase-index without the
        // repeat flag refuses.
        let magnet = EntityDescriptor::upgrade("magnet", vec![10, 20], 4);
        let mut state = ProgressionState::new();
        for _ in 0..2 {
            state.increment_level(&magnet.id);
            state.record_purchase(&magnet.id);
        }

        let level = PurchaseService::from_kind(CostPolicyKind::LevelDerived);
        let index = PurchaseService::from_kind(CostPolicyKind::PurchaseIndex);
        assert_eq!(level.quote(&magnet, &state), PriceTag::Price(20));
        assert_eq!(index.quote(&magnet, &state), PriceTag::Maxed);
    }

    #[test]
    fn quote_reports_terminal_states() {
        let service = PurchaseService::default();
        let hat = EntityDescriptor::unlockable("hat", 50);
        let mut state = ProgressionState::new();
        assert_eq!(service.quote(&hat, &state), PriceTag::Price(50));
        state.unlock(&hat.id);
        assert_eq!(service.quote(&hat, &state), PriceTag::Maxed);
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    proptest! {
        #[test]
        fn upgrade_level_stays_within_cap(
            schedule in prop::collection::vec(0_u64..50, 1..5),
            max_level in 0_u32..6,
            start in 0_u64..300,
            attempts in 0_usize..20,
            index_pricing in any::<bool>(),
        ) {
            let kind = if index_pricing { CostPolicyKind::PurchaseIndex } else { CostPolicyKind::LevelDerived };
            let service = PurchaseService::from_kind(kind);
            let magnet = EntityDescriptor::upgrade("magnet", schedule, max_level);
            let mut ledger = CurrencyLedger::with_balance(start);
            let mut state = ProgressionState::new();

            for _ in 0..attempts {
                let before = ledger.balance();
                let result = service.try_purchase(&magnet, &mut ledger, &mut state);
                prop_assert!(state.level("magnet") <= max_level);
                prop_assert!(ledger.balance() <= before);
                if !result.is_success() {
                    prop_assert_eq!(ledger.balance(), before);
                }
            }
            prop_assert_eq!(state.purchase_count("magnet"), state.level("magnet"));
        }
    }
}

//! The store session: the single entry point the UI layer talks to.
//!
//! A [`StoreSession`] owns the catalog, the currency ledger, the
//! progression state, the selection controller, and the persistent store.
//! It is built when the store screen opens and consumed by
//! [`StoreSession::close`] when it tears down.
//!
//! Every operation that changes the balance or progression writes the save
//! data before returning, whether or not a purchase went through.
//!
//! All mutating methods take `&mut self`, so one purchase always completes
//! (price, spend, mutation, save) before the next can start. Callers that
//! share a session across threads wrap it in a `Mutex`.

use storefront_db::{KeyValueStore, LoadReport, StoreCodec};
use storefront_ledger::CurrencyLedger;
use storefront_types::{Catalog, EntityId, EntityKind, PriceTag, ProgressionState, PurchaseResult};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::SessionError;
use crate::purchase::PurchaseService;
use crate::selection::{SelectionController, SelectionTransition};

/// What a "buy" click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuyOutcome {
    /// The entity was not selected yet; it is now, and nothing was bought.
    Selected(SelectionTransition),
    /// The entity was already selected; a purchase was attempted.
    Purchased(PurchaseResult),
}

/// Level progress of a progressive upgrade, for "level / max" displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeProgress {
    /// Current level.
    pub level: u32,
    /// Level cap.
    pub max_level: u32,
}

impl UpgradeProgress {
    /// Whether no further level can be bought.
    pub const fn is_maxed(self) -> bool {
        self.level >= self.max_level
    }

    /// Levels left to buy.
    pub const fn remaining(self) -> u32 {
        self.max_level.saturating_sub(self.level)
    }
}

/// An open store screen bound to a persistent store.
#[derive(Debug)]
pub struct StoreSession<S: KeyValueStore> {
    catalog: Catalog,
    codec: StoreCodec,
    store: S,
    ledger: CurrencyLedger,
    state: ProgressionState,
    selection: SelectionController,
    service: PurchaseService,
    load_report: LoadReport,
}

impl<S: KeyValueStore> StoreSession<S> {
    /// Open a session, restoring balance and progression from `store`.
    ///
    /// A missing balance starts at `config.starting_balance`. Unreadable
    /// saved fields are reset to empty and listed in
    /// [`load_report`](Self::load_report).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if [`StoreConfig::validate`] rejects
    /// the configuration.
    pub fn open(config: StoreConfig, store: S) -> Result<Self, SessionError> {
        config.validate()?;

        let codec = StoreCodec::new(config.keys);
        let balance = codec.load_balance(&store, config.starting_balance);
        let mut state = ProgressionState::new();
        let load_report = codec.load(&store, &mut state);

        info!(
            entities = config.catalog.len(),
            balance,
            policy = ?config.cost_policy,
            clean = load_report.is_clean(),
            "Store session opened"
        );

        Ok(Self {
            catalog: config.catalog,
            codec,
            store,
            ledger: CurrencyLedger::with_balance(balance),
            state,
            selection: SelectionController::new(),
            service: PurchaseService::from_kind(config.cost_policy),
            load_report,
        })
    }

    // =========================================================================
    // Purchasing
    // =========================================================================

    /// Attempt to buy `id`, then save.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownEntity`] if `id` is not in the
    /// catalog, or [`SessionError::Db`] if saving fails. A failed save does
    /// not roll back an applied purchase; the next save writes it.
    pub fn try_purchase(&mut self, id: &str) -> Result<PurchaseResult, SessionError> {
        let descriptor = self
            .catalog
            .get(id)
            .ok_or_else(|| SessionError::UnknownEntity(EntityId::from(id)))?;
        let result = self
            .service
            .try_purchase(descriptor, &mut self.ledger, &mut self.state);
        self.save()?;
        Ok(result)
    }

    /// Handle a click on an entity's buy button.
    ///
    /// The first click selects the entity; a click on the already selected
    /// entity buys it.
    ///
    /// # Errors
    ///
    /// See [`try_purchase`](Self::try_purchase).
    pub fn buy(&mut self, id: &str) -> Result<BuyOutcome, SessionError> {
        if !self.catalog.contains(id) {
            return Err(SessionError::UnknownEntity(EntityId::from(id)));
        }
        match self.selection.select(id) {
            Some(transition) => Ok(BuyOutcome::Selected(transition)),
            None => self.try_purchase(id).map(BuyOutcome::Purchased),
        }
    }

    /// Buy whatever is selected. `Ok(None)` when nothing is.
    ///
    /// # Errors
    ///
    /// See [`try_purchase`](Self::try_purchase).
    pub fn buy_selected(&mut self) -> Result<Option<PurchaseResult>, SessionError> {
        let Some(id) = self.selection.selected().cloned() else {
            return Ok(None);
        };
        self.try_purchase(id.as_str()).map(Some)
    }

    /// Credit `amount` coins and save the balance. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Ledger`] if the balance would overflow, or
    /// [`SessionError::Db`] if saving fails.
    pub fn earn(&mut self, amount: u64, reason: &str) -> Result<u64, SessionError> {
        let balance = self.ledger.earn(amount, reason)?;
        self.codec.save_balance(&mut self.store, balance)?;
        Ok(balance)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select `id`. `None` if it was already selected.
    pub fn select(&mut self, id: &str) -> Option<SelectionTransition> {
        self.selection.select(id)
    }

    /// Deselect everything. `None` if nothing was selected.
    pub fn clear_selection(&mut self) -> Option<SelectionTransition> {
        self.selection.clear()
    }

    /// The currently selected entity.
    pub const fn selected(&self) -> Option<&EntityId> {
        self.selection.selected()
    }

    /// Register a listener for selection changes.
    pub fn subscribe_selection(
        &mut self,
        listener: impl FnMut(&SelectionTransition) + Send + 'static,
    ) {
        self.selection.subscribe(listener);
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// Current coin balance.
    pub const fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    /// Owned count of a consumable.
    pub fn quantity(&self, id: &str) -> u32 {
        self.state.quantity(id)
    }

    /// Current level of an upgrade.
    pub fn level(&self, id: &str) -> u32 {
        self.state.level(id)
    }

    /// Whether an unlockable is owned.
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.state.is_unlocked(id)
    }

    /// Level and cap of a progressive upgrade. `None` for other kinds and
    /// unknown ids.
    pub fn upgrade_progress(&self, id: &str) -> Option<UpgradeProgress> {
        let descriptor = self.catalog.get(id)?;
        if descriptor.kind != EntityKind::ProgressiveUpgrade {
            return None;
        }
        Some(UpgradeProgress {
            level: self.state.level(id),
            max_level: descriptor.max_level,
        })
    }

    /// Price label for `id`: the next cost, or "MAX". `None` for unknown ids.
    pub fn price_tag(&self, id: &str) -> Option<PriceTag> {
        let descriptor = self.catalog.get(id)?;
        Some(self.service.quote(descriptor, &self.state))
    }

    /// The catalog this session sells from.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The currency ledger.
    pub const fn ledger(&self) -> &CurrencyLedger {
        &self.ledger
    }

    /// The player's progression.
    pub const fn state(&self) -> &ProgressionState {
        &self.state
    }

    /// What happened to each saved field when the session opened.
    pub const fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write balance and progression with one flush.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Db`] if encoding or flushing fails.
    pub fn save(&mut self) -> Result<(), SessionError> {
        self.codec
            .save_all(&mut self.store, &self.state, self.ledger.balance())?;
        debug!(balance = self.ledger.balance(), "Store session saved");
        Ok(())
    }

    /// Save one last time and hand the store back.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Db`] if the final save fails.
    pub fn close(mut self) -> Result<S, SessionError> {
        self.save()?;
        info!(
            balance = self.ledger.balance(),
            entities = self.catalog.len(),
            "Store session closed"
        );
        Ok(self.store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use storefront_db::{Field, MemoryStore};
    use storefront_ledger::MAX_BALANCE;
    use storefront_types::EntityDescriptor;

    use crate::config::ConfigError;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            EntityDescriptor::consumable("potion", 20),
            EntityDescriptor::upgrade("magnet", vec![10, 20, 30], 3),
            EntityDescriptor::unlockable("hat", 50),
        ])
    }

    fn config(starting_balance: u64) -> StoreConfig {
        StoreConfig {
            starting_balance,
            ..StoreConfig::with_catalog(catalog())
        }
    }

    fn open(starting_balance: u64) -> StoreSession<MemoryStore> {
        StoreSession::open(config(starting_balance), MemoryStore::new()).unwrap()
    }

    #[test]
    fn fresh_session_uses_starting_balance() {
        let session = open(100);
        assert_eq!(session.balance(), 100);
        assert!(session.state().is_empty());
        assert_eq!(session.load_report().missing.len(), 4);
    }

    #[test]
    fn purchase_saves_immediately() {
        let mut session = open(100);
        let result = session.try_purchase("potion");
        assert!(matches!(result, Ok(PurchaseResult::Success)));

        let store = session.close().unwrap();
        let codec = StoreCodec::default();
        assert_eq!(codec.load_balance(&store, 0), 80);
        let mut state = ProgressionState::new();
        let _ = codec.load(&store, &mut state);
        assert_eq!(state.quantity("potion"), 1);
    }

    #[test]
    fn failed_purchase_still_saves() {
        let mut session = open(5);
        let result = session.try_purchase("potion");
        assert!(matches!(result, Ok(PurchaseResult::InsufficientFunds)));
        assert_eq!(session.store.flush_count(), 1);
        assert_eq!(session.balance(), 5);
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let mut session = open(100);
        assert!(matches!(
            session.try_purchase("dragon"),
            Err(SessionError::UnknownEntity(ref id)) if id.as_str() == "dragon"
        ));
        assert!(matches!(session.buy("dragon"), Err(SessionError::UnknownEntity(_))));
        assert!(session.selected().is_none());
        assert_eq!(session.balance(), 100);
    }

    #[test]
    fn buy_selects_first_then_purchases() {
        let mut session = open(100);

        let first = session.buy("hat");
        assert!(matches!(first, Ok(BuyOutcome::Selected(_))));
        assert!(!session.is_unlocked("hat"));
        assert_eq!(session.balance(), 100);

        let second = session.buy("hat");
        assert!(matches!(second, Ok(BuyOutcome::Purchased(PurchaseResult::Success))));
        assert!(session.is_unlocked("hat"));
        assert_eq!(session.balance(), 50);

        let third = session.buy("hat");
        assert!(matches!(third, Ok(BuyOutcome::Purchased(PurchaseResult::Maxed))));
        assert_eq!(session.balance(), 50);
    }

    #[test]
    fn buy_selected_without_selection_is_noop() {
        let mut session = open(100);
        assert!(matches!(session.buy_selected(), Ok(None)));

        let _ = session.select("magnet");
        assert!(matches!(session.buy_selected(), Ok(Some(PurchaseResult::Success))));
        assert_eq!(session.level("magnet"), 1);
    }

    #[test]
    fn upgrade_progress_and_price_tags() {
        let mut session = open(1_000);
        assert_eq!(session.price_tag("magnet"), Some(PriceTag::Price(10)));
        assert_eq!(
            session.upgrade_progress("magnet"),
            Some(UpgradeProgress { level: 0, max_level: 3 })
        );

        for _ in 0..3 {
            assert!(matches!(session.try_purchase("magnet"), Ok(PurchaseResult::Success)));
        }
        let progress = session.upgrade_progress("magnet");
        assert!(progress.is_some_and(UpgradeProgress::is_maxed));
        assert_eq!(progress.map(UpgradeProgress::remaining), Some(0));
        assert_eq!(session.price_tag("magnet"), Some(PriceTag::Maxed));
        assert_eq!(session.balance(), 940);

        assert_eq!(session.upgrade_progress("potion"), None);
        assert_eq!(session.price_tag("dragon"), None);
    }

    #[test]
    fn earn_persists_balance() {
        let mut session = open(0);
        assert!(matches!(session.earn(30, "level_complete"), Ok(30)));
        assert!(matches!(session.try_purchase("potion"), Ok(PurchaseResult::Success)));
        assert_eq!(session.balance(), 10);

        let codec = StoreCodec::default();
        assert_eq!(codec.load_balance(&session.store, 0), 10);
    }

    #[test]
    fn earn_past_ceiling_leaves_session_consistent() {
        let mut session = open(MAX_BALANCE);
        assert!(matches!(session.earn(10, "bonus"), Err(SessionError::Ledger(_))));
        assert_eq!(session.balance(), MAX_BALANCE);

        // Purchases keep saving normally afterwards.
        assert!(matches!(session.try_purchase("potion"), Ok(PurchaseResult::Success)));
        let expected = MAX_BALANCE.saturating_sub(20);
        assert_eq!(session.balance(), expected);

        let codec = StoreCodec::default();
        assert_eq!(codec.load_balance(&session.store, 0), expected);
        let mut saved = ProgressionState::new();
        let _ = codec.load(&session.store, &mut saved);
        assert_eq!(saved.quantity("potion"), 1);
    }

    #[test]
    fn oversized_starting_balance_is_rejected() {
        let result = StoreSession::open(config(u64::MAX), MemoryStore::new());
        assert!(matches!(
            result,
            Err(SessionError::Config(ConfigError::StartingBalanceTooLarge { value: u64::MAX }))
        ));
    }

    #[test]
    fn reopen_restores_progress() {
        let mut session = open(100);
        assert!(session.try_purchase("hat").is_ok());
        assert!(session.try_purchase("magnet").is_ok());
        let store = session.close().unwrap();

        let reopened = StoreSession::open(config(999), store).unwrap();
        assert_eq!(reopened.balance(), 40);
        assert!(reopened.is_unlocked("hat"));
        assert_eq!(reopened.level("magnet"), 1);
        assert!(reopened.load_report().is_clean());
    }

    #[test]
    fn corrupt_field_is_reported_not_fatal() {
        let mut store = MemoryStore::new();
        store.set_string("store_items", "not json".to_owned());

        let session = StoreSession::open(config(10), store).unwrap();
        assert_eq!(session.load_report().corrupt, vec![Field::Quantities]);
        assert_eq!(session.quantity("potion"), 0);
    }

    #[test]
    fn duplicate_catalog_is_rejected() {
        let catalog = Catalog::new(vec![
            EntityDescriptor::consumable("potion", 20),
            EntityDescriptor::consumable("potion", 30),
        ]);
        let result = StoreSession::open(StoreConfig::with_catalog(catalog), MemoryStore::new());
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[test]
    fn boxed_store_works_as_backend() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let mut session = StoreSession::open(config(50), store).unwrap();
        assert!(matches!(session.try_purchase("potion"), Ok(PurchaseResult::Success)));
        assert!(session.close().is_ok());
    }

    #[test]
    fn borrowed_store_keeps_ownership_with_caller() {
        let mut store = MemoryStore::new();
        {
            let mut session = StoreSession::open(config(30), &mut store).unwrap();
            assert!(matches!(session.try_purchase("potion"), Ok(PurchaseResult::Success)));
        }
        assert_eq!(store.flush_count(), 1);
        assert_eq!(StoreCodec::default().load_balance(&store, 0), 10);
    }

    #[test]
    fn selection_listener_sees_buy_clicks() {
        let seen: Arc<Mutex<Vec<Option<EntityId>>>> = Arc::default();
        let sink = Arc::clone(&seen);

        let mut session = open(100);
        session.subscribe_selection(move |t| {
            if let Ok(mut log) = sink.lock() {
                log.push(t.current.clone());
            }
        });

        let _ = session.buy("potion");
        let _ = session.buy("potion");
        let _ = session.buy("hat");
        let _ = session.clear_selection();

        let log = seen.lock().map(|l| l.clone()).unwrap_or_default();
        assert_eq!(
            log,
            vec![Some(EntityId::from("potion")), Some(EntityId::from("hat")), None]
        );
    }
}

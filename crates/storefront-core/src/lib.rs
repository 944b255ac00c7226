//! Purchase rules, selection, and session orchestration for the Storefront
//! in-game store.
//!
//! A UI event flows through this crate as:
//!
//! ```text
//! click "buy" --> StoreSession::try_purchase(id)
//!                   |-- PurchaseService: cap/ownership check, price, afford
//!                   |-- CurrencyLedger::spend + ProgressionState mutation
//!                   +-- StoreCodec::save_all (balance + progression, one flush)
//! click item  --> StoreSession::select(id) --> SelectionTransition
//! ```
//!
//! # Modules
//!
//! - [`config`] -- Catalog and persistence settings loaded from YAML.
//! - [`pricing`] -- [`CostPolicy`] trait and the two legacy pricing policies.
//! - [`purchase`] -- [`PurchaseService`]: one resolver per entity kind.
//! - [`selection`] -- [`SelectionController`] state machine.
//! - [`session`] -- [`StoreSession`] facade owning all of the above.
//! - [`error`] -- Session error types.
//!
//! [`CostPolicy`]: pricing::CostPolicy
//! [`PurchaseService`]: purchase::PurchaseService
//! [`SelectionController`]: selection::SelectionController
//! [`StoreSession`]: session::StoreSession

pub mod config;
pub mod error;
pub mod pricing;
pub mod purchase;
pub mod selection;
pub mod session;

pub use config::{ConfigError, StoreConfig};
pub use error::SessionError;
pub use pricing::{CostPolicy, CostPolicyKind, LevelDerivedPricing, PurchaseIndexPricing};
pub use purchase::PurchaseService;
pub use selection::{SelectionController, SelectionTransition};
pub use session::{BuyOutcome, StoreSession, UpgradeProgress};

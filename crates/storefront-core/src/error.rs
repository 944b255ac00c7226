//! Error types for the store session.
//!
//! Purchase outcomes are not errors; see
//! [`PurchaseResult`](storefront_types::PurchaseResult). These cover the
//! caller passing an id the catalog does not know and persistence failures.

use storefront_db::DbError;
use storefront_ledger::LedgerError;
use storefront_types::EntityId;

use crate::config::ConfigError;

/// Errors that can occur during store session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The catalog has no entity with this id.
    #[error("unknown catalog entity: {0}")]
    UnknownEntity(EntityId),

    /// Writing the save data failed.
    #[error("persistence error: {0}")]
    Db(#[from] DbError),

    /// A balance mutation was rejected.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The store configuration is invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

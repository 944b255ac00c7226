//! Currency ledger for the Storefront in-game store.
//!
//! The player's coin balance lives here and only changes through
//! [`CurrencyLedger::earn`] and [`CurrencyLedger::spend`]. A spend that
//! exceeds the balance is rejected, so the balance can never go negative.
//! An earn that would pass [`MAX_BALANCE`] is rejected too, so every balance
//! the ledger holds can be saved. The ledger does not persist itself;
//! callers flush it through `storefront-db` after every mutation.
//!
//! # Usage
//!
//! ```
//! use storefront_ledger::CurrencyLedger;
//!
//! let mut ledger = CurrencyLedger::with_balance(100);
//! assert!(ledger.can_afford(20));
//! ledger.spend(20, "potion").ok();
//! ledger.earn(5, "daily reward").ok();
//!
//! assert_eq!(ledger.balance(), 85);
//! ```

pub mod ledger;

pub use ledger::{CurrencyLedger, MAX_BALANCE};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when mutating the balance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A spend asked for more than the current balance.
    #[error("insufficient funds: wanted {requested} but only have {available}")]
    InsufficientFunds {
        /// The amount the caller attempted to spend.
        requested: u64,
        /// The balance at the time of the attempt.
        available: u64,
    },

    /// An earn would push the balance past [`MAX_BALANCE`].
    #[error("balance overflow: adding {amount} to {balance}")]
    BalanceOverflow {
        /// The balance before the attempt.
        balance: u64,
        /// The amount the caller attempted to add.
        amount: u64,
    },
}

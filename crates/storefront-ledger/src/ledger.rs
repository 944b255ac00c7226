//! The currency ledger: the player's coin balance.
//!
//! # Design
//!
//! - **Non-negative**: the balance is a `u64` and [`CurrencyLedger::spend`]
//!   rejects amounts above it.
//! - **Bounded**: the balance never exceeds [`MAX_BALANCE`], the largest
//!   value a signed 64-bit store integer can hold.

use tracing::debug;

use crate::LedgerError;

/// Largest balance the ledger will hold (`i64::MAX`).
pub const MAX_BALANCE: u64 = i64::MAX.unsigned_abs();

/// The player's coin balance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyLedger {
    balance: u64,
}

impl CurrencyLedger {
    /// Create a ledger with a zero balance.
    pub const fn new() -> Self {
        Self { balance: 0 }
    }

    /// Create a ledger from a previously persisted balance.
    ///
    /// Values above [`MAX_BALANCE`] are clamped to it.
    pub const fn with_balance(balance: u64) -> Self {
        let balance = if balance > MAX_BALANCE {
            MAX_BALANCE
        } else {
            balance
        };
        Self { balance }
    }

    /// The current balance.
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    /// Whether the balance covers `amount`.
    pub const fn can_afford(&self, amount: u64) -> bool {
        self.balance >= amount
    }

    /// Credit `amount` coins, returning the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BalanceOverflow`] if the balance would exceed
    /// [`MAX_BALANCE`]. The balance is unchanged in that case.
    pub fn earn(&mut self, amount: u64, reason: impl Into<String>) -> Result<u64, LedgerError> {
        let balance = self
            .balance
            .checked_add(amount)
            .filter(|b| *b <= MAX_BALANCE)
            .ok_or(LedgerError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;
        self.apply("earn", amount, balance, &reason.into());
        Ok(balance)
    }

    /// Debit `amount` coins, returning the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if `amount` exceeds the
    /// balance. The balance is unchanged in that case.
    pub fn spend(&mut self, amount: u64, reason: impl Into<String>) -> Result<u64, LedgerError> {
        let balance = self
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            })?;
        self.apply("spend", amount, balance, &reason.into());
        Ok(balance)
    }

    fn apply(&mut self, direction: &str, amount: u64, balance: u64, reason: &str) {
        debug!(direction, amount, balance, reason, "Balance updated");
        self.balance = balance;
    }
}

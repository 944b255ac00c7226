//! Enumeration types for the store.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The purchase semantics of a catalog entity.
///
/// The set is closed: every purchase path matches on it exhaustively, so a
/// new kind cannot be added without the compiler pointing at each resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A stackable item; each purchase adds one to the owned quantity.
    Consumable,
    /// A leveled upgrade capped at the descriptor's `max_level`.
    ProgressiveUpgrade,
    /// A one-time purchase; owned or not owned.
    Unlockable,
}

// ---------------------------------------------------------------------------
// Purchase results
// ---------------------------------------------------------------------------

/// Outcome of a purchase attempt.
///
/// This is a value, not an error: the UI picks a presentation per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseResult {
    /// Currency was spent and the entity was granted.
    Success,
    /// The balance does not cover the current price. Nothing changed.
    InsufficientFunds,
    /// No further purchase is possible: level cap reached, already owned,
    /// or the cost schedule is exhausted. Nothing changed.
    Maxed,
}

impl PurchaseResult {
    /// Whether the attempt mutated the ledger and progression state.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

// ---------------------------------------------------------------------------
// Price tags
// ---------------------------------------------------------------------------

/// The price the next purchase of an entity would cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTag {
    /// The next purchase costs this many coins.
    Price(u64),
    /// The entity cannot be purchased again.
    Maxed,
}

impl PriceTag {
    /// Return the amount, or `None` when maxed.
    pub const fn amount(self) -> Option<u64> {
        match self {
            Self::Price(amount) => Some(amount),
            Self::Maxed => None,
        }
    }
}

impl core::fmt::Display for PriceTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Price(amount) => write!(f, "{amount}"),
            Self::Maxed => f.write_str("MAX"),
        }
    }
}

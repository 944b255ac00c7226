//! Shared type definitions for the Storefront in-game store.
//!
//! This crate is the single source of truth for the data that flows between
//! the ledger, the persistence layer, and the purchase logic. It holds no
//! behavior beyond total accessors; validation lives in `storefront-core`.
//!
//! # Modules
//!
//! - [`ids`] -- The [`EntityId`] string newtype used to key every map
//! - [`enums`] -- Entity kinds, purchase results, and price tags
//! - [`structs`] -- Catalog descriptors and the [`Catalog`] container
//! - [`progression`] -- The player's owned/leveled/unlocked state

pub mod enums;
pub mod ids;
pub mod progression;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{EntityKind, PriceTag, PurchaseResult};
pub use ids::EntityId;
pub use progression::ProgressionState;
pub use structs::{Catalog, EntityDescriptor};

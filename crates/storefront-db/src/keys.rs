//! Fixed key names under which the store persists its state.
//!
//! | Field | Default key | Type |
//! |-------|-------------|------|
//! | balance | `player_coins` | Integer |
//! | quantities | `store_items` | JSON `{keys, values}` |
//! | levels | `store_upgrades` | JSON `{keys, values}` |
//! | unlocked | `store_outfits` | JSON id array |
//! | purchases | `store_purchase_index` | JSON `{keys, values}` |

use serde::{Deserialize, Serialize};

/// Key names for each persisted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreKeys {
    /// Key of the coin balance.
    #[serde(default = "default_balance_key")]
    pub balance: String,

    /// Key of the consumable quantities blob.
    #[serde(default = "default_quantities_key")]
    pub quantities: String,

    /// Key of the upgrade levels blob.
    #[serde(default = "default_levels_key")]
    pub levels: String,

    /// Key of the unlocked ids blob.
    #[serde(default = "default_unlocked_key")]
    pub unlocked: String,

    /// Key of the purchase counters blob.
    #[serde(default = "default_purchases_key")]
    pub purchases: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            balance: default_balance_key(),
            quantities: default_quantities_key(),
            levels: default_levels_key(),
            unlocked: default_unlocked_key(),
            purchases: default_purchases_key(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_balance_key() -> String {
    "player_coins".to_owned()
}

fn default_quantities_key() -> String {
    "store_items".to_owned()
}

fn default_levels_key() -> String {
    "store_upgrades".to_owned()
}

fn default_unlocked_key() -> String {
    "store_outfits".to_owned()
}

fn default_purchases_key() -> String {
    "store_purchase_index".to_owned()
}

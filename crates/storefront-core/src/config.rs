//! Store configuration: catalog, pricing policy, and save keys.
//!
//! Loaded from YAML. Every section is optional:
//!
//! ```yaml
//! starting_balance: 100
//! cost_policy: level_derived   # or purchase_index
//! keys:
//!   balance: player_coins
//! catalog:
//!   - id: potion
//!     kind: consumable
//!     cost_schedule: [20]
//!   - id: magnet
//!     kind: progressive_upgrade
//!     cost_schedule: [10, 20, 30]
//!     max_level: 3
//!   - id: hat
//!     kind: unlockable
//!     cost_schedule: [50]
//! ```

use std::path::Path;

use serde::Deserialize;
use storefront_db::StoreKeys;
use storefront_ledger::MAX_BALANCE;
use storefront_types::{Catalog, EntityId, EntityKind};
use tracing::warn;

use crate::pricing::CostPolicyKind;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The starting balance exceeds what the store can hold.
    #[error("starting balance {value} exceeds the maximum of {max}", max = MAX_BALANCE)]
    StartingBalanceTooLarge {
        /// The configured value.
        value: u64,
    },

    /// Two catalog entries share an id.
    #[error("duplicate catalog entity: {id}")]
    DuplicateEntity {
        /// The repeated id.
        id: EntityId,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Balance granted when no saved balance exists.
    #[serde(default)]
    pub starting_balance: u64,

    /// Which pricing policy prices the next purchase.
    #[serde(default)]
    pub cost_policy: CostPolicyKind,

    /// Key names in the persistent store.
    #[serde(default)]
    pub keys: StoreKeys,

    /// Purchasable entities.
    #[serde(default)]
    pub catalog: Catalog,
}

impl StoreConfig {
    /// Build a config around an in-memory catalog with default settings.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or any error
    /// from [`StoreConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or any
    /// error from [`StoreConfig::validate`].
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the catalog for authoring mistakes.
    ///
    /// Duplicate ids and a starting balance above [`MAX_BALANCE`] are
    /// rejected. Entries that can never be bought (empty
    /// schedule, upgrade capped at zero) are accepted with a warning; the
    /// purchase service reports them as maxed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StartingBalanceTooLarge`] if the starting
    /// balance cannot be saved, or [`ConfigError::DuplicateEntity`] for the
    /// first repeated id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_balance > MAX_BALANCE {
            return Err(ConfigError::StartingBalanceTooLarge {
                value: self.starting_balance,
            });
        }
        if let Some(id) = self.catalog.duplicate_ids().into_iter().next() {
            return Err(ConfigError::DuplicateEntity { id });
        }

        for entry in &self.catalog {
            if entry.cost_schedule.is_empty() {
                warn!(entity = %entry.id, "Catalog entry has an empty cost schedule");
            }
            if entry.kind == EntityKind::ProgressiveUpgrade && entry.max_level == 0 {
                warn!(entity = %entry.id, "Upgrade has max_level 0");
            }
        }
        Ok(())
    }
}

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use devex_badges::BadgeThresholds;
use devex_store::StoreConfig;

use crate::error::{ActionError, ActionResult};
use crate::reputation::ReputationPolicy;

/// Top-level configuration: store, reputation deltas, badge thresholds.
///
/// Every section defaults, so a config file only needs the values it
/// overrides:
///
/// ```toml
/// [store]
/// data_dir = "/var/lib/devex"
///
/// [reputation]
/// question_created = 3
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevExchangeConfig {
    pub store: StoreConfig,
    pub reputation: ReputationPolicy,
    pub badges: BadgeThresholds,
}

impl DevExchangeConfig {
    /// Parse from TOML text.
    pub fn from_toml(raw: &str) -> ActionResult<Self> {
        toml::from_str(raw).map_err(|e| ActionError::Config(e.to_string()))
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ActionResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| ActionError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }
}

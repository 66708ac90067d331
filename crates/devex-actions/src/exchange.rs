use tracing::info;

use devex_badges::BadgeThresholds;
use devex_model::Database;

use crate::config::DevExchangeConfig;
use crate::error::ActionResult;
use crate::reputation::ReputationPolicy;

/// High-level DevExchange handle.
///
/// Owns the database plus the reputation and badge policies, and exposes
/// every query/update operation as a method with explicit typed parameters
/// (per-operation parameter structs beyond single-identifier lookups).
/// Construct with [`DevExchange::in_memory`] for tests and
/// embedding, or [`DevExchange::open`] to honor a configuration (snapshot
/// persistence, policy overrides). The operation methods live in the
/// per-domain modules: `question`, `answer`, `tag`, `user`.
pub struct DevExchange {
    pub(crate) db: Database,
    pub(crate) reputation: ReputationPolicy,
    pub(crate) badges: BadgeThresholds,
}

impl DevExchange {
    /// Volatile handle with default policies.
    pub fn in_memory() -> Self {
        Self::with_database(Database::in_memory())
    }

    /// Wrap an already-open database with default policies.
    pub fn with_database(db: Database) -> Self {
        Self {
            db,
            reputation: ReputationPolicy::default(),
            badges: BadgeThresholds::default(),
        }
    }

    /// Open under a configuration. Store problems surface here, not on
    /// first use.
    pub fn open(config: DevExchangeConfig) -> ActionResult<Self> {
        let db = Database::open(config.store)?;
        info!(persistent = db.config().data_dir.is_some(), "devexchange opened");
        Ok(Self {
            db,
            reputation: config.reputation,
            badges: config.badges,
        })
    }

    /// Override the reputation policy.
    pub fn with_reputation_policy(mut self, policy: ReputationPolicy) -> Self {
        self.reputation = policy;
        self
    }

    /// Override the badge thresholds.
    pub fn with_badge_thresholds(mut self, thresholds: BadgeThresholds) -> Self {
        self.badges = thresholds;
        self
    }

    /// Persist (when configured) and drop the handle.
    pub fn close(self) -> ActionResult<()> {
        self.db.close()?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn reputation_policy(&self) -> &ReputationPolicy {
        &self.reputation
    }

    pub fn badge_thresholds(&self) -> &BadgeThresholds {
        &self.badges
    }
}

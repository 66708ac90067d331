use std::fs;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use devex_store::{Collection, StoreConfig, StoreError, StoreResult};

use crate::answer::Answer;
use crate::question::Question;
use crate::tag::Tag;
use crate::user::User;

/// Explicit database handle owning the four entity collections.
///
/// Replaces a process-global "is connected" flag with a value that callers
/// construct, pass around, and close. Opening either succeeds with a usable
/// handle or returns an error — there is no silently-unconnected state.
pub struct Database {
    config: StoreConfig,
    users: Collection<User>,
    questions: Collection<Question>,
    answers: Collection<Answer>,
    tags: Collection<Tag>,
}

/// On-disk snapshot of all collections.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    users: Vec<User>,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    tags: Vec<Tag>,
}

impl Database {
    /// Volatile handle with no persistence. For tests and embedding.
    pub fn in_memory() -> Self {
        Self::empty(StoreConfig::in_memory())
    }

    /// Open a handle under the given configuration.
    ///
    /// When a data directory is configured, it is created if missing and an
    /// existing snapshot file is reloaded. A directory that cannot be
    /// created is [`StoreError::Unavailable`]; a snapshot that does not
    /// decode is [`StoreError::CorruptSnapshot`].
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let db = Self::empty(config);

        if let Some(dir) = &db.config.data_dir {
            fs::create_dir_all(dir).map_err(|e| StoreError::Unavailable {
                reason: format!("cannot create data dir {}: {e}", dir.display()),
            })?;
        }

        if let Some(path) = db.config.snapshot_path() {
            if path.exists() {
                let raw = fs::read_to_string(&path)?;
                let snapshot: Snapshot = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::CorruptSnapshot(e.to_string()))?;
                info!(
                    path = %path.display(),
                    users = snapshot.users.len(),
                    questions = snapshot.questions.len(),
                    answers = snapshot.answers.len(),
                    tags = snapshot.tags.len(),
                    "snapshot loaded"
                );
                db.users.restore(snapshot.users);
                db.questions.restore(snapshot.questions);
                db.answers.restore(snapshot.answers);
                db.tags.restore(snapshot.tags);
            } else {
                debug!(path = %path.display(), "no snapshot; starting empty");
            }
        }

        Ok(db)
    }

    fn empty(config: StoreConfig) -> Self {
        Self {
            config,
            users: Collection::new(),
            questions: Collection::new(),
            answers: Collection::new(),
            tags: Collection::new(),
        }
    }

    /// Write the snapshot file. No-op without a configured data directory.
    ///
    /// Writes to a temp file in the same directory and renames over the
    /// target, so readers never observe a half-written snapshot.
    pub fn persist(&self) -> StoreResult<()> {
        let Some(path) = self.config.snapshot_path() else {
            return Ok(());
        };
        let snapshot = Snapshot {
            users: self.users.export(),
            questions: self.questions.export(),
            answers: self.answers.export(),
            tags: self.tags.export(),
        };
        let raw = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &raw)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = raw.len(), "snapshot persisted");
        Ok(())
    }

    /// Persist (when configured) and drop the handle.
    pub fn close(self) -> StoreResult<()> {
        self.persist()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn users(&self) -> &Collection<User> {
        &self.users
    }

    pub fn questions(&self) -> &Collection<Question> {
        &self.questions
    }

    pub fn answers(&self) -> &Collection<Answer> {
        &self.answers
    }

    pub fn tags(&self) -> &Collection<Tag> {
        &self.tags
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("users", &self.users.len())
            .field("questions", &self.questions.len())
            .field("answers", &self.answers.len())
            .field("tags", &self.tags.len())
            .field("persistent", &self.config.data_dir.is_some())
            .finish()
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the JSON snapshot inside the data directory.
pub const SNAPSHOT_FILE: &str = "devex.json";

/// Storage configuration for the database handle.
///
/// With no `data_dir` the database is volatile. With one, `open` reloads the
/// snapshot file when present and `persist`/`close` write it back.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the snapshot file. `None` disables persistence.
    pub data_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Volatile configuration (no persistence).
    pub fn in_memory() -> Self {
        Self { data_dir: None }
    }

    /// Persist snapshots under the given directory.
    pub fn at(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: Some(data_dir.as_ref().to_path_buf()),
        }
    }

    /// Path of the snapshot file, when persistence is configured.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(SNAPSHOT_FILE))
    }
}

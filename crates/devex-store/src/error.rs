/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be opened or reached. Always raised, never
    /// swallowed: callers can distinguish "open" from "failed to open".
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    /// Insert attempted with an id that is already present.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// I/O error from the underlying snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file exists but does not decode.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Serialization failure while persisting.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

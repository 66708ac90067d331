use devex_store::StoreError;

/// Errors from query/update operations.
///
/// One policy for the whole layer: every operation logs at the raise site
/// and propagates the error unchanged. No operation swallows failures.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("user not found")]
    UserNotFound,

    #[error("question not found")]
    QuestionNotFound,

    #[error("answer not found")]
    AnswerNotFound,

    #[error("tag not found")]
    TagNotFound,

    /// A unique field (auth id, username, email) is already taken.
    #[error("{field} already taken")]
    Conflict { field: &'static str },

    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ActionError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

/// Result alias for query/update operations.
pub type ActionResult<T> = Result<T, ActionError>;

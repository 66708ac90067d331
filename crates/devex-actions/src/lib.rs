//! Query/update layer for DevExchange.
//!
//! [`DevExchange`] is the caller-facing handle over the data layer: every
//! operation of the question-and-answer core — asking, answering, tagging,
//! voting, saving, profiles, stats and badges — is a method on it, taking
//! explicit typed parameters and returning resolved views or an
//! [`ActionError`]. Cross-references come back expanded ("populated") into
//! field-restricted summaries; listings paginate under the total-count
//! next-page policy.
//!
//! Operations are grouped by domain:
//! - [`question`] — feed, creation with tag find-or-create, voting, views,
//!   editing, deletion, tag-link repair
//! - [`answer`] — posting, listing, voting
//! - [`tag`] — searchable listing, per-tag feeds, popular tags
//! - [`user`] — accounts, listings, saved questions, stats, cascade delete
//!
//! Mutations that read-modify-write a record (vote toggles, save toggles,
//! reputation) run inside a single atomic collection update, so concurrent
//! callers serialize instead of racing.

pub mod answer;
pub mod config;
pub mod error;
pub mod exchange;
pub mod question;
pub mod reputation;
pub mod tag;
pub mod user;
pub mod views;
pub mod vote;

pub use answer::{AnswerSort, AnswerVoteParams, CreateAnswerParams, GetAnswersParams};
pub use config::DevExchangeConfig;
pub use error::{ActionError, ActionResult};
pub use exchange::DevExchange;
pub use question::{
    CreateQuestionParams, EditQuestionParams, QuestionVoteParams, RepairReport,
};
pub use reputation::ReputationPolicy;
pub use tag::{GetAllTagsParams, GetQuestionsByTagParams, TagQuestions, TagSort};
pub use user::{
    CreateUserParams, GetAllUsersParams, GetSavedQuestionsParams, GetUserStatsParams,
    SavedQuestionSort, ToggleSaveQuestionParams, UpdateUserParams, UserInfo, UserProfileUpdate,
    UserSort,
};
pub use views::{AnswerView, AuthorSummary, QuestionSummary, QuestionView, TagSummary, TagView};
pub use vote::{VoteDirection, VoteOutcome};

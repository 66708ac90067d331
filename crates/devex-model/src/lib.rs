//! Entity schemas and the database handle for DevExchange.
//!
//! Four record types — [`User`], [`Question`], [`Answer`], [`Tag`] — with
//! typed cross-references by identifier, plus [`Database`]: an explicit
//! connection-handle object with an open / persist / close lifecycle and
//! optional JSON snapshot persistence. All query semantics live in
//! `devex-actions`; this crate only defines the records and where they live.

pub mod answer;
pub mod database;
pub mod question;
pub mod tag;
pub mod user;

pub use answer::Answer;
pub use database::Database;
pub use question::Question;
pub use tag::Tag;
pub use user::User;

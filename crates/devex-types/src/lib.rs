//! Foundation types for DevExchange.
//!
//! This crate provides the identifier and pagination primitives used
//! throughout the DevExchange system. Every other DevExchange crate depends
//! on `devex-types`.
//!
//! # Key Types
//!
//! - [`UserId`], [`QuestionId`], [`AnswerId`], [`TagId`] — store-assigned
//!   entity identifiers (UUID v7, time-ordered)
//! - [`AuthId`] — opaque external-auth identifier supplied by callers
//! - [`Pagination`] / [`Paged`] — page/page-size parameters and the
//!   total-count next-page arithmetic

pub mod error;
pub mod ids;
pub mod pagination;

pub use error::TypeError;
pub use ids::{AnswerId, AuthId, QuestionId, TagId, UserId};
pub use pagination::{Paged, Pagination};

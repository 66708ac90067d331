//! Document-collection engine for DevExchange.
//!
//! This crate provides the storage contract the query/update layer runs
//! against:
//! - [`Document`] — the record trait (typed, ordered identifier)
//! - [`Collection`] — an in-memory collection with filtered lookups, sorted
//!   and paginated listing, atomic read-modify-write updates, find-or-create,
//!   and bulk deletes
//! - [`Query`] — typed filter/sort/skip/limit builder, the equivalent of a
//!   document store's find contract
//! - [`StoreConfig`] — snapshot-persistence configuration for the database
//!   handle
//!
//! Collections never interpret record contents beyond the [`Document`]
//! contract; cross-collection semantics (resolution, cascades, vote rules)
//! belong to the layers above.

pub mod collection;
pub mod config;
pub mod error;

pub use collection::{Collection, Document, Query};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};

//! Repository pattern over MongoDB collections.
//!
//! - [`Repository`] - CRUD, aggregation, bulk writes and transaction start
//!   for one collection
//! - [`models`] - builders for bulk write models bound to a repository's
//!   namespace

pub mod base;
pub mod models;

pub use base::Repository;
pub use models::BulkWriteSummary;

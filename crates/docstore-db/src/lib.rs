//! Generic repository over MongoDB collections.
//!
//! A [`Repository`] is bound to one collection and one client. Every
//! operation is a single delegation to the driver; identifiers given as hex
//! strings are coerced to [`ObjectId`] first.
//!
//! ```ignore
//! use docstore_db::{define_schema, doc, DbConnection, ObjectId};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct User {
//!     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
//!     id: Option<ObjectId>,
//!     name: String,
//! }
//!
//! define_schema!(User => "users");
//!
//! let conn = DbConnection::connect(&config.database).await?;
//! let users = conn.repository::<User>();
//! let alice = users.create(User { id: None, name: "alice".into() }).await?;
//! let found = users.find_one(doc! { "name": "alice" }).await?;
//! ```

pub mod connection;
pub mod entity;
pub mod error;
pub mod id;
pub mod macros;
pub mod repository;

pub use connection::DbConnection;
pub use entity::{Entity, Schema};
pub use error::{DbError, Result};
pub use id::{coerce_id, IntoObjectId};
pub use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
pub use repository::{BulkWriteSummary, Repository};

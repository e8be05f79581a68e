//! Traits that bind Rust types to stored documents.
//!
//! - [`Entity`]: a serializable record with an optional `_id`
//! - [`Schema`]: an entity that lives in a known collection

use mongodb::bson::{oid::ObjectId, Document};
use serde::{de::DeserializeOwned, Serialize};

/// A record stored in a collection, identified by its `_id` field.
///
/// The identifier is `None` until the document has been inserted. Typed
/// entities usually declare it as:
///
/// ```ignore
/// #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
/// id: Option<ObjectId>,
/// ```
///
/// so that an unsaved value serializes without an `_id` and the server
/// assigns one.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Unpin {
    fn id(&self) -> Option<ObjectId>;

    fn set_id(&mut self, id: ObjectId);
}

/// An [`Entity`] bound to a collection name.
///
/// Usually implemented through [`crate::define_schema!`].
pub trait Schema: Entity {
    const COLLECTION: &'static str;
}

impl Entity for Document {
    fn id(&self) -> Option<ObjectId> {
        self.get_object_id("_id").ok()
    }

    fn set_id(&mut self, id: ObjectId) {
        self.insert("_id", id);
    }
}

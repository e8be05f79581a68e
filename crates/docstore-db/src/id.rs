//! Identifier coercion.
//!
//! Repositories accept identifiers either as an [`ObjectId`] or as its
//! 24-character hexadecimal string. Parsing is left to the driver so an
//! invalid string fails with the driver's own [`oid::Error`].

use mongodb::bson::oid::{self, ObjectId};

/// Anything that can be turned into an [`ObjectId`].
pub trait IntoObjectId {
    fn into_object_id(self) -> Result<ObjectId, oid::Error>;
}

impl IntoObjectId for ObjectId {
    fn into_object_id(self) -> Result<ObjectId, oid::Error> {
        Ok(self)
    }
}

impl IntoObjectId for &ObjectId {
    fn into_object_id(self) -> Result<ObjectId, oid::Error> {
        Ok(*self)
    }
}

impl IntoObjectId for &str {
    fn into_object_id(self) -> Result<ObjectId, oid::Error> {
        ObjectId::parse_str(self)
    }
}

impl IntoObjectId for String {
    fn into_object_id(self) -> Result<ObjectId, oid::Error> {
        ObjectId::parse_str(&self)
    }
}

impl IntoObjectId for &String {
    fn into_object_id(self) -> Result<ObjectId, oid::Error> {
        ObjectId::parse_str(self)
    }
}

/// Coerces a native identifier or its string form into an [`ObjectId`].
///
/// Pure and idempotent: coercing an `ObjectId` returns it unchanged.
pub fn coerce_id(id: impl IntoObjectId) -> Result<ObjectId, oid::Error> {
    id.into_object_id()
}

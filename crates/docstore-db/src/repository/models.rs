//! Bulk write models bound to a repository's collection.
//!
//! [`Repository::bulk_write`] runs at the client level, so every model names
//! its namespace. These builders fill it in with the repository's own.

use mongodb::{
    bson::{to_document, Document},
    options::{
        DeleteManyModel, DeleteOneModel, InsertOneModel, ReplaceOneModel, UpdateManyModel,
        UpdateModifications, UpdateOneModel, WriteModel,
    },
    results::SummaryBulkWriteResult,
    Namespace,
};

use super::Repository;
use crate::{entity::Entity, error::Result};

/// Counts reported by [`Repository::bulk_write`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulkWriteSummary {
    pub inserted_count: i64,
    pub matched_count: i64,
    pub modified_count: i64,
    pub upserted_count: i64,
    pub deleted_count: i64,
}

impl From<SummaryBulkWriteResult> for BulkWriteSummary {
    fn from(result: SummaryBulkWriteResult) -> Self {
        Self {
            inserted_count: result.inserted_count,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: result.upserted_count,
            deleted_count: result.deleted_count,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn namespace(&self) -> Namespace {
        self.collection().namespace()
    }

    pub fn insert_model(&self, document: &T) -> Result<WriteModel> {
        let document = to_document(document).map_err(mongodb::error::Error::from)?;
        Ok(InsertOneModel::builder()
            .namespace(self.namespace())
            .document(document)
            .build()
            .into())
    }

    pub fn replace_model(&self, filter: Document, replacement: &T) -> Result<WriteModel> {
        let replacement = to_document(replacement).map_err(mongodb::error::Error::from)?;
        Ok(ReplaceOneModel::builder()
            .namespace(self.namespace())
            .filter(filter)
            .replacement(replacement)
            .build()
            .into())
    }

    pub fn update_one_model(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> WriteModel {
        UpdateOneModel::builder()
            .namespace(self.namespace())
            .filter(filter)
            .update(update)
            .build()
            .into()
    }

    pub fn update_many_model(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> WriteModel {
        UpdateManyModel::builder()
            .namespace(self.namespace())
            .filter(filter)
            .update(update)
            .build()
            .into()
    }

    pub fn delete_one_model(&self, filter: Document) -> WriteModel {
        DeleteOneModel::builder()
            .namespace(self.namespace())
            .filter(filter)
            .build()
            .into()
    }

    pub fn delete_many_model(&self, filter: Document) -> WriteModel {
        DeleteManyModel::builder()
            .namespace(self.namespace())
            .filter(filter)
            .build()
            .into()
    }
}

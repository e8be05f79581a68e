//! Generic repository bound to one collection.

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{UpdateModifications, WriteModel},
    results::{DeleteResult, UpdateResult},
    Client, ClientSession, Collection,
};
use tracing::debug;

use super::models::BulkWriteSummary;
use crate::{
    entity::Entity,
    error::Result,
    id::{coerce_id, IntoObjectId},
};

/// Uniform access surface over one collection.
///
/// Holds the collection handle and the client it came from. Both are
/// reference-counted driver handles owned by the caller; cloning the
/// repository clones the handles, not the underlying connections.
///
/// Every operation is one driver call. Filters, updates and pipelines use the
/// driver's native formats and every failure is the driver's error, unchanged.
/// There are no retries, timeouts or validation beyond what the driver does.
pub struct Repository<T: Entity> {
    collection: Collection<T>,
    client: Client,
}

impl<T: Entity> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            client: self.client.clone(),
        }
    }
}

impl<T: Entity> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("namespace", &self.collection.namespace())
            .finish()
    }
}

impl<T: Entity> Repository<T> {
    /// Binds a repository to `collection`, with `client` used for bulk writes
    /// and sessions.
    pub fn new(collection: Collection<T>, client: Client) -> Self {
        Self { collection, client }
    }

    /// The underlying collection, for calls that need options or a session.
    pub fn collection(&self) -> &Collection<T> {
        &self.collection
    }

    /// The client the collection belongs to.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Name of the bound collection.
    pub fn name(&self) -> &str {
        self.collection.name()
    }

    /// Coerces an identifier to its native form. Pure, no I/O.
    pub fn coerce_id(&self, id: impl IntoObjectId) -> Result<ObjectId> {
        Ok(coerce_id(id)?)
    }

    /// Inserts `document` and returns it with the identifier the driver assigned.
    ///
    /// A document that already carries an `_id` of another type is stored
    /// under that identifier and returned unchanged.
    pub async fn create(&self, document: T) -> Result<T> {
        debug!("{}: insert_one", self.name());
        let result = self.collection.insert_one(&document).await?;
        Ok(with_inserted_id(document, result.inserted_id))
    }

    /// Returns every document matching `filter`; an empty `Vec` when none match.
    pub async fn find_many(&self, filter: Document) -> Result<Vec<T>> {
        debug!("{}: find {}", self.name(), filter);
        let cursor = self.collection.find(filter).await?;
        let documents: Vec<T> = cursor.try_collect().await?;
        Ok(documents)
    }

    /// Returns the first document matching `filter`, if any.
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        debug!("{}: find_one {}", self.name(), filter);
        Ok(self.collection.find_one(filter).await?)
    }

    /// Returns the document with the given identifier, if any.
    pub async fn find_one_by_id(&self, id: impl IntoObjectId) -> Result<Option<T>> {
        let id = coerce_id(id)?;
        debug!("{}: find_one _id={}", self.name(), id);
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Applies `update` to the first document matching `filter`.
    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        debug!("{}: update_one {}", self.name(), filter);
        Ok(self.collection.update_one(filter, update).await?)
    }

    /// Applies `update` to the document with the given identifier.
    pub async fn update_single_by_id(
        &self,
        id: impl IntoObjectId,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        let id = coerce_id(id)?;
        debug!("{}: update_one _id={}", self.name(), id);
        Ok(self
            .collection
            .update_one(doc! { "_id": id }, update)
            .await?)
    }

    /// Applies `update` to every document matching `filter`.
    pub async fn update_many(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        debug!("{}: update_many {}", self.name(), filter);
        Ok(self.collection.update_many(filter, update).await?)
    }

    /// Deletes the first document matching `filter`.
    pub async fn delete_one(&self, filter: Document) -> Result<DeleteResult> {
        debug!("{}: delete_one {}", self.name(), filter);
        Ok(self.collection.delete_one(filter).await?)
    }

    /// Deletes the document with the given identifier. A missing document
    /// yields `deleted_count == 0`, not an error.
    pub async fn delete_one_by_id(&self, id: impl IntoObjectId) -> Result<DeleteResult> {
        let id = coerce_id(id)?;
        debug!("{}: delete_one _id={}", self.name(), id);
        Ok(self.collection.delete_one(doc! { "_id": id }).await?)
    }

    /// Deletes every document matching `filter`.
    pub async fn delete_many(&self, filter: Document) -> Result<DeleteResult> {
        debug!("{}: delete_many {}", self.name(), filter);
        Ok(self.collection.delete_many(filter).await?)
    }

    /// Number of documents matching `filter`.
    pub async fn count(&self, filter: Document) -> Result<u64> {
        debug!("{}: count_documents {}", self.name(), filter);
        Ok(self.collection.count_documents(filter).await?)
    }

    /// Runs `pipeline` on the collection and returns the raw result documents.
    pub async fn aggregate(
        &self,
        pipeline: impl IntoIterator<Item = Document>,
    ) -> Result<Vec<Document>> {
        let pipeline: Vec<Document> = pipeline.into_iter().collect();
        debug!("{}: aggregate ({} stages)", self.name(), pipeline.len());
        let cursor = self.collection.aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    /// Executes `models` as a single client-level bulk write.
    ///
    /// Models carry their own namespace, see [`super::models`] for builders
    /// bound to this collection. Requires MongoDB 8.0 or later. An empty batch
    /// performs no I/O and reports zero for every count.
    pub async fn bulk_write(
        &self,
        models: impl IntoIterator<Item = impl Into<WriteModel>>,
    ) -> Result<BulkWriteSummary> {
        let models: Vec<WriteModel> = models.into_iter().map(Into::into).collect();
        if models.is_empty() {
            debug!("{}: bulk_write with no models, skipping", self.name());
            return Ok(BulkWriteSummary::default());
        }

        debug!("{}: bulk_write ({} models)", self.name(), models.len());
        Ok(self.client.bulk_write(models).await?.into())
    }

    /// Opens a session on the held client and starts a transaction on it.
    ///
    /// The caller owns the returned session: it passes it to session-bound
    /// calls on [`Self::collection`] and finishes with
    /// `commit_transaction` or `abort_transaction`. Dropping the session
    /// aborts an unfinished transaction and releases the session.
    pub async fn start_transaction(&self) -> Result<ClientSession> {
        debug!("{}: start_transaction", self.name());
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        Ok(session)
    }
}

/// Sets the identifier the server reported, unless it is not an `ObjectId`,
/// in which case the document already carries it.
fn with_inserted_id<T: Entity>(mut document: T, inserted_id: Bson) -> T {
    if let Bson::ObjectId(id) = inserted_id {
        document.set_id(id);
    }
    document
}

//! The collection-scoped primitives the repository is written against.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection,
    bson::{Bson, Document},
    error::ErrorKind as MongoErrorKind,
};
use thiserror::Error;

use crate::error::BoxError;

/// Failure reported by a [`DocumentStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] BoxError),

    /// The store was reached but rejected or failed the call.
    #[error("store operation failed: {0}")]
    Operation(#[source] BoxError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            MongoErrorKind::ServerSelection { .. }
            | MongoErrorKind::Io(_)
            | MongoErrorKind::ConnectionPoolCleared { .. } => StoreError::Unavailable(err.into()),
            _ => StoreError::Operation(err.into()),
        }
    }
}

/// Counts reported by an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Insert/find/update/delete over a single collection of documents.
///
/// Filters are field-equality documents. `insert_one` returns the stored
/// `_id`, generating one when the document has none.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_one(&self, document: Document) -> StoreResult<Bson>;

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>>;

    /// All matching documents in store iteration order.
    async fn find(&self, filter: Document) -> StoreResult<Vec<Document>>;

    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<UpdateOutcome>;

    /// Returns the number of deleted documents (0 or 1).
    async fn delete_one(&self, filter: Document) -> StoreResult<u64>;
}

#[async_trait]
impl DocumentStore for Collection<Document> {
    async fn insert_one(&self, document: Document) -> StoreResult<Bson> {
        let result = Collection::insert_one(self, document).await?;
        Ok(result.inserted_id)
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        Ok(Collection::find_one(self, filter).await?)
    }

    async fn find(&self, filter: Document) -> StoreResult<Vec<Document>> {
        let cursor = Collection::find(self, filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<UpdateOutcome> {
        let result = Collection::update_one(self, filter, update).await?;
        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        let result = Collection::delete_one(self, filter).await?;
        Ok(result.deleted_count)
    }
}

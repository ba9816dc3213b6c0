//! In-memory [`DocumentStore`] for tests and local runs without MongoDB.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document, oid::ObjectId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::document::ID_FIELD;
use crate::store::{DocumentStore, StoreError, StoreResult, UpdateOutcome};

/// Documents kept in insertion order behind an async lock.
///
/// Supports equality filters on top-level fields and `$set` updates, which
/// is everything the user repository issues. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<Document>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with [`StoreError::Unavailable`] until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of the stored documents.
    pub async fn documents(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked unavailable".into()));
        }
        Ok(())
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn apply_set(document: &mut Document, update: Document) -> StoreResult<bool> {
    let mut modified = false;

    for (operator, fields) in update {
        let fields = match (operator.as_str(), fields) {
            ("$set", Bson::Document(fields)) => fields,
            (operator, _) => {
                return Err(StoreError::Operation(
                    format!("unsupported update operator {operator:?}").into(),
                ));
            }
        };

        for (key, value) in fields {
            if key == ID_FIELD && document.get(ID_FIELD) != Some(&value) {
                return Err(StoreError::Operation(
                    "performing an update on the path '_id' would modify the immutable field '_id'"
                        .into(),
                ));
            }
            if document.get(&key) != Some(&value) {
                document.insert(key, value);
                modified = true;
            }
        }
    }

    Ok(modified)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_one(&self, mut document: Document) -> StoreResult<Bson> {
        self.ensure_available()?;

        let id = match document.remove(ID_FIELD) {
            Some(id) => id,
            None => Bson::ObjectId(ObjectId::new()),
        };

        let mut stored = Document::new();
        stored.insert(ID_FIELD, id.clone());
        for (key, value) in document {
            stored.insert(key, value);
        }

        let mut documents = self.documents.write().await;
        if documents.iter().any(|d| d.get(ID_FIELD) == Some(&id)) {
            return Err(StoreError::Operation(
                format!("duplicate key error: _id {id}").into(),
            ));
        }
        documents.push(stored);

        Ok(id)
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<Document>> {
        self.ensure_available()?;

        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| matches(d, &filter)).cloned())
    }

    async fn find(&self, filter: Document) -> StoreResult<Vec<Document>> {
        self.ensure_available()?;

        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|d| matches(d, &filter))
            .cloned()
            .collect())
    }

    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<UpdateOutcome> {
        self.ensure_available()?;

        let mut documents = self.documents.write().await;
        let Some(document) = documents.iter_mut().find(|d| matches(d, &filter)) else {
            return Ok(UpdateOutcome::default());
        };

        // Apply to a copy so a rejected update leaves the document untouched.
        let mut updated = document.clone();
        let modified = apply_set(&mut updated, update)?;
        *document = updated;

        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete_one(&self, filter: Document) -> StoreResult<u64> {
        self.ensure_available()?;

        let mut documents = self.documents.write().await;
        match documents.iter().position(|d| matches(d, &filter)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

//! Document-store implementation of UserRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database,
    bson::{Bson, Document, doc, oid::ObjectId},
};
use std::future::Future;
use tracing::{debug, info, instrument, trace};

use crate::context::OperationContext;
use crate::document::{ID_FIELD, from_document, to_document};
use crate::error::{ErrorKind, Operation, UserError, UserResult};
use crate::memory::InMemoryDocumentStore;
use crate::models::User;
use crate::object_id;
use crate::repository::UserRepository;
use crate::store::{DocumentStore, StoreResult};

/// Default collection name for users
pub const DEFAULT_COLLECTION: &str = "users";

/// UserRepository over any [`DocumentStore`].
///
/// Holds nothing but the store handle, so it is cheap to share behind an
/// `Arc` and safe to call concurrently.
pub struct DocumentUserRepository<S> {
    store: S,
}

/// Repository backed by a MongoDB collection
pub type MongoUserRepository = DocumentUserRepository<Collection<Document>>;

/// Repository backed by [`InMemoryDocumentStore`]
pub type InMemoryUserRepository = DocumentUserRepository<InMemoryDocumentStore>;

impl<S: DocumentStore> DocumentUserRepository<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Get the underlying store for advanced operations
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl MongoUserRepository {
    /// Create a repository over the `users` collection of `db`
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoUserRepository::new(&client.database("app"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    /// Create a repository over a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self::with_store(db.collection::<Document>(collection_name))
    }
}

impl InMemoryUserRepository {
    pub fn in_memory() -> Self {
        Self::with_store(InMemoryDocumentStore::new())
    }
}

fn id_filter(oid: ObjectId) -> Document {
    doc! { "_id": oid }
}

/// Refuse to start once the context is done.
fn begin(ctx: &OperationContext, operation: Operation) -> UserResult<()> {
    ctx.check()
        .map_err(|reason| UserError::interrupted(operation, reason))
}

/// Run one store call under `ctx`, classifying store failures as `fallback`
/// unless the store was unreachable.
async fn call<T, F>(
    ctx: &OperationContext,
    operation: Operation,
    fallback: ErrorKind,
    fut: F,
) -> UserResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match ctx.run(fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(UserError::store(operation, fallback, err)),
        Err(reason) => Err(UserError::interrupted(operation, reason)),
    }
}

fn decode_id(operation: Operation, id: &str) -> UserResult<ObjectId> {
    object_id::decode(id).map_err(|err| {
        debug!(user_id = %id, error = %err, "Rejected malformed user id");
        UserError::invalid_identifier(operation, err)
    })
}

fn encode_user(operation: Operation, user: &User) -> UserResult<Document> {
    to_document(user).map_err(|err| {
        debug!(user = ?user, error = %err, "Failed to encode user");
        UserError::new(ErrorKind::EncodingFailed, operation).with_source(err)
    })
}

fn decode_user(operation: Operation, document: Document) -> UserResult<User> {
    let oid = document.get_object_id(ID_FIELD).ok();
    from_document(document).map_err(|err| {
        let id = oid.map(|oid| object_id::encode(&oid));
        debug!(user_id = ?id, error = %err, "Failed to decode stored user");
        let err = UserError::new(ErrorKind::DecodeFailed, operation).with_source(err);
        match id {
            Some(id) => err.with_id(id),
            None => err,
        }
    })
}

#[async_trait]
impl<S: DocumentStore> UserRepository for DocumentUserRepository<S> {
    #[instrument(skip(self, ctx, user))]
    async fn create(&self, ctx: &OperationContext, user: User) -> UserResult<String> {
        const OP: Operation = Operation::Create;
        begin(ctx, OP)?;

        let document = encode_user(OP, &user)?;
        let inserted = call(ctx, OP, ErrorKind::WriteFailed, self.store.insert_one(document)).await?;

        let id = match inserted {
            Bson::ObjectId(oid) => object_id::encode(&oid),
            other => {
                debug!(inserted_id = %other, "Store assigned a non-ObjectId _id");
                return Err(UserError::new(ErrorKind::EncodingFailed, OP)
                    .with_source(format!("inserted _id is not an ObjectId: {other}")));
            }
        };

        info!(user_id = %id, "User created");
        Ok(id)
    }

    #[instrument(skip(self, ctx), fields(user_id = %id))]
    async fn find_one(&self, ctx: &OperationContext, id: &str) -> UserResult<User> {
        const OP: Operation = Operation::FindOne;
        begin(ctx, OP)?;

        let oid = decode_id(OP, id)?;
        let document = call(ctx, OP, ErrorKind::ReadFailed, self.store.find_one(id_filter(oid)))
            .await
            .map_err(|err| err.with_id(id))?
            .ok_or_else(|| UserError::not_found(OP, id))?;

        let user = decode_user(OP, document)?;
        debug!("User found");
        Ok(user)
    }

    #[instrument(skip(self, ctx))]
    async fn find_all(&self, ctx: &OperationContext) -> UserResult<Vec<User>> {
        const OP: Operation = Operation::FindAll;
        begin(ctx, OP)?;

        let documents = call(ctx, OP, ErrorKind::ReadFailed, self.store.find(doc! {})).await?;

        let users = documents
            .into_iter()
            .map(|document| decode_user(OP, document))
            .collect::<UserResult<Vec<_>>>()?;

        debug!(count = users.len(), "Users listed");
        Ok(users)
    }

    #[instrument(skip(self, ctx, user), fields(user_id = %user.id))]
    async fn update(&self, ctx: &OperationContext, user: User) -> UserResult<()> {
        const OP: Operation = Operation::Update;
        begin(ctx, OP)?;

        let oid = decode_id(OP, &user.id)?;
        let payload = encode_user(OP, &user)?;

        if payload.is_empty() {
            // Nothing to set; still report whether the user exists. Every
            // Update failure is write-classified, this lookup included.
            let found = call(ctx, OP, ErrorKind::WriteFailed, self.store.find_one(id_filter(oid)))
                .await
                .map_err(|err| err.with_id(&user.id))?;
            return match found {
                Some(_) => {
                    debug!("Empty update, user unchanged");
                    Ok(())
                }
                None => Err(UserError::not_found(OP, user.id)),
            };
        }

        let outcome = call(
            ctx,
            OP,
            ErrorKind::WriteFailed,
            self.store
                .update_one(id_filter(oid), doc! { "$set": payload }),
        )
        .await
        .map_err(|err| err.with_id(&user.id))?;

        trace!(
            matched = outcome.matched_count,
            modified = outcome.modified_count,
            "Update applied"
        );

        if outcome.matched_count == 0 {
            return Err(UserError::not_found(OP, user.id));
        }

        info!("User updated");
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(user_id = %id))]
    async fn delete(&self, ctx: &OperationContext, id: &str) -> UserResult<()> {
        const OP: Operation = Operation::Delete;
        begin(ctx, OP)?;

        let oid = decode_id(OP, id)?;
        let deleted = call(ctx, OP, ErrorKind::WriteFailed, self.store.delete_one(id_filter(oid)))
            .await
            .map_err(|err| err.with_id(id))?;

        trace!(deleted, "Delete applied");

        if deleted == 0 {
            return Err(UserError::not_found(OP, id));
        }

        info!("User deleted");
        Ok(())
    }
}

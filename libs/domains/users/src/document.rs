//! Mapping between [`User`] and its stored document form.
//!
//! The stored document keys the user by a native `_id` ObjectId; the
//! external `id` attribute is never persisted.

use mongodb::bson::{self, Bson, Document};
use thiserror::Error;

use crate::models::User;
use crate::object_id;

pub(crate) const ID_FIELD: &str = "_id";
const EXTERNAL_ID_FIELD: &str = "id";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("document has no _id")]
    MissingIdentifier,

    #[error("_id is not an ObjectId: {0}")]
    UnexpectedIdentifier(Bson),

    #[error(transparent)]
    Attributes(#[from] bson::de::Error),
}

/// Serialize the user's attributes, dropping any identifier.
pub(crate) fn to_document(user: &User) -> Result<Document, bson::ser::Error> {
    let mut document = bson::to_document(user)?;
    document.remove(EXTERNAL_ID_FIELD);
    document.remove(ID_FIELD);
    Ok(document)
}

/// Build a user from a stored document, encoding `_id` as the external id.
pub(crate) fn from_document(mut document: Document) -> Result<User, DecodeError> {
    let id = match document.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => object_id::encode(&oid),
        Some(other) => return Err(DecodeError::UnexpectedIdentifier(other)),
        None => return Err(DecodeError::MissingIdentifier),
    };
    // A stray plain "id" attribute must not shadow the real identifier.
    document.remove(EXTERNAL_ID_FIELD);

    let mut user: User = bson::from_document(document)?;
    user.id = id;
    Ok(user)
}

//! Conversion between the external user identifier and the store's `ObjectId`.
//!
//! The external form is exactly 24 lowercase hexadecimal characters. Decoding
//! also accepts uppercase hex but never trims, pads or truncates.

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

/// Length of the external identifier in characters.
pub const ENCODED_LEN: usize = 24;

/// The input is not a well-formed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id {input:?}: {reason}")]
pub struct InvalidIdentifier {
    pub input: String,
    pub reason: &'static str,
}

/// Render an `ObjectId` as its external identifier.
pub fn encode(oid: &ObjectId) -> String {
    oid.to_hex()
}

/// Parse an external identifier.
pub fn decode(input: &str) -> Result<ObjectId, InvalidIdentifier> {
    let invalid = |reason| InvalidIdentifier {
        input: input.to_string(),
        reason,
    };

    if input.len() != ENCODED_LEN {
        return Err(invalid("expected 24 hexadecimal characters"));
    }
    if !input.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hexadecimal characters"));
    }

    ObjectId::parse_str(input).map_err(|_| invalid("not a valid ObjectId"))
}

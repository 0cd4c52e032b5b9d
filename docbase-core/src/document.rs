//! Core types and utilities for document representation.
//!
//! Documents are schema-less JSON records. At rest and inside a table they are
//! kept as [`RawDocument`] values — the exact serialized JSON text, never
//! re-encoded — while the identifying metadata is extracted once on the way in.
//!
//! Every stored document must expose a non-empty string identifier under
//! [`ID_FIELD`]; an optional revision marker under [`REVISION_FIELD`] is
//! carried through unchanged but not interpreted by the store.
//!
//! # Example
//!
//! ```ignore
//! use docbase_core::document::{encode_document, DocumentMeta};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Movie {
//!     #[serde(rename = "_id")]
//!     id: String,
//!     title: String,
//! }
//!
//! let movie = Movie { id: "movie_1".into(), title: "Blade Runner".into() };
//! let (meta, raw) = encode_document(&movie)?;
//! assert_eq!(meta.id, "movie_1");
//! # Ok::<(), docbase_core::error::DocumentStoreError>(())
//! ```

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, value::RawValue, value::to_raw_value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// The reserved field holding a document's unique identifier.
pub const ID_FIELD: &str = "_id";

/// The reserved field holding a document's optional revision marker.
pub const REVISION_FIELD: &str = "_rev";

/// The serialized form of a single document: owned raw JSON text.
///
/// Storing raw text keeps the bytes the caller serialized byte-for-byte,
/// so round trips through the table and the backing file are exact.
pub type RawDocument = Box<RawValue>;

/// The identifying metadata extracted from a document on every write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// The unique identifier, taken from the document's `_id` field.
    pub id: String,
    /// The revision marker from `_rev`, if the document carries one.
    /// The store passes it through unchanged and never assigns one itself.
    pub revision: Option<String>,
}

/// Extracts the reserved fields from an already-decoded document value.
///
/// # Errors
///
/// Returns [`DocumentStoreError::EmptyOrInvalidId`] if the value is not a
/// JSON object, or its `_id` field is missing, empty, or not a string.
pub fn required_fields(value: &Value) -> DocumentStoreResult<DocumentMeta> {
    let Some(object) = value.as_object() else {
        return Err(DocumentStoreError::EmptyOrInvalidId);
    };

    let id = match object.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => return Err(DocumentStoreError::EmptyOrInvalidId),
    };

    let revision = object
        .get(REVISION_FIELD)
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok(DocumentMeta { id, revision })
}

/// Serializes a document and extracts its metadata in one step.
///
/// This is the single entry point for every write path: the document is
/// serialized to JSON, its reserved fields are validated, and the raw text
/// is returned alongside the extracted [`DocumentMeta`].
///
/// # Errors
///
/// Returns a serialization error if the document cannot be converted to JSON,
/// or [`DocumentStoreError::EmptyOrInvalidId`] if it lacks a usable identifier.
pub fn encode_document<D: Serialize>(
    document: &D,
) -> DocumentStoreResult<(DocumentMeta, RawDocument)> {
    let value = serde_json::to_value(document)?;
    let meta = required_fields(&value)?;
    let raw = to_raw_value(&value)?;

    Ok((meta, raw))
}

/// Deserializes a raw document into a caller-supplied type.
///
/// # Errors
///
/// Returns a serialization error if the raw JSON does not decode into `D`.
pub fn decode_document<D: DeserializeOwned>(raw: &RawValue) -> DocumentStoreResult<D> {
    Ok(serde_json::from_str(raw.get())?)
}

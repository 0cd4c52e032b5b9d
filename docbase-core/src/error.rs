//! Error types and result types for document store operations.
//!
//! This module provides the error handling for all document store operations.
//! Use [`DocumentStoreResult<T>`] as the return type for fallible operations.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
///
/// This enum covers identifier validation, document lifecycle issues, collection
/// management, cursor misuse, and I/O or serialization failures from the backing file.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// The document has a missing, empty, or non-string identifier field.
    /// Documents without a usable identifier are never persisted.
    #[error("empty or invalid document id")]
    EmptyOrInvalidId,
    /// A document with the given identifier already exists in the collection.
    #[error("document {0} already exists")]
    DocumentAlreadyExists(String),
    /// The document targeted by an update does not exist.
    #[error("document not found: {0}")]
    DocumentNotFound(String),
    /// A read found no document under the given identifier.
    #[error("no documents match id {0}")]
    NoDocuments(String),
    /// A collection with the given name already exists, either in memory
    /// or as a backing file on disk.
    #[error("collection already exists: {0}")]
    CollectionAlreadyExists(String),
    /// The requested collection exists neither in memory nor on disk.
    #[error("collection does not exist: {0}")]
    CollectionNotFound(String),
    /// The collection name does not satisfy the naming rules
    /// (a letter followed by up to 31 letters, digits, or underscores).
    #[error("invalid collection name: {0}")]
    InvalidCollectionName(String),
    /// Error during store initialization (invalid directory, out-of-range option).
    #[error("initialization error: {0}")]
    Initialization(String),
    /// A cursor was decoded before the first `advance` or after exhaustion.
    #[error("cursor is not positioned on a document")]
    CursorNotPositioned,
    /// Serialization/deserialization error when converting a document to or
    /// from its JSON representation, or when reading a corrupt backing file.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// An I/O error from the backing file or its directory.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for document store operations.
///
/// This type alias is used throughout the crate to indicate operations that may fail
/// with a [`DocumentStoreError`].
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

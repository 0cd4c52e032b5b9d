//! Collection interface for document store backends.
//!
//! This module defines the trait surface a storage backend exposes for one
//! named collection: the create/read/update/delete and bulk operations of
//! [`DataCollection`], and the filter-expression query surface of
//! [`QueryableCollection`]. Backend crates implement both for their
//! collection handle types.
//!
//! All document parameters are generic over serde traits, so callers work
//! with their own types while backends deal only in raw JSON documents.
//!
//! # Example
//!
//! ```ignore
//! use docbase_core::collection::DataCollection;
//!
//! let meta = collection.create(&movie).await?;
//! let stored: Movie = collection.get(&meta.id).await?;
//! ```

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    cursor::DocumentCursor,
    document::DocumentMeta,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Fields},
};

/// The result of a bulk create.
///
/// Bulk creation commits item by item and stops at the first failure, leaving
/// prior items in place — there is no rollback. This type makes the partial
/// success explicit: `created` holds the metadata of every document committed
/// before the failure, and `error` the failure itself (or `None` when the
/// whole batch went through).
#[derive(Debug)]
pub struct BulkWriteOutcome {
    /// Metadata of the documents committed so far, in input order.
    pub created: Vec<DocumentMeta>,
    /// The first extraction or duplicate-key error, if any item failed.
    pub error: Option<DocumentStoreError>,
}

impl BulkWriteOutcome {
    /// Returns `true` when every item in the batch was committed.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Collapses the outcome into a `Result`, discarding the partial list on failure.
    ///
    /// Callers that need the committed identifiers from a failed batch should
    /// read `created` directly instead.
    pub fn into_result(self) -> DocumentStoreResult<Vec<DocumentMeta>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.created),
        }
    }
}

/// The create/read/update/delete surface of one named collection.
///
/// Implementations extract the reserved identifier fields from documents on
/// every write path and reject documents without a usable identifier. All
/// methods are safe to call concurrently from multiple tasks.
#[async_trait]
pub trait DataCollection: Send + Sync {
    /// Creates a new document in the collection and returns its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::EmptyOrInvalidId`] when the document has
    /// no usable identifier, and
    /// [`DocumentStoreError::DocumentAlreadyExists`] on a duplicate.
    async fn create<D>(&self, document: &D) -> DocumentStoreResult<DocumentMeta>
    where
        D: Serialize + Sync;

    /// Retrieves the document with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::NoDocuments`] when no document exists
    /// under `id`, and a serialization error if the stored document does not
    /// decode into `D`.
    async fn get<D>(&self, id: &str) -> DocumentStoreResult<D>
    where
        D: DeserializeOwned + Send;

    /// Replaces an existing document, matched by its identifier field.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::EmptyOrInvalidId`] when the document has
    /// no usable identifier, and [`DocumentStoreError::DocumentNotFound`]
    /// when no document exists under that identifier.
    async fn update<D>(&self, document: &D) -> DocumentStoreResult<()>
    where
        D: Serialize + Sync;

    /// Deletes the document with the given identifier.
    ///
    /// Removing an absent document is not an error; the operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::EmptyOrInvalidId`] when `id` is empty.
    async fn delete(&self, id: &str) -> DocumentStoreResult<()>;

    /// Returns the current number of documents in the collection.
    async fn count(&self) -> u64;

    /// Returns a cursor over a snapshot of every document in the collection.
    ///
    /// The snapshot order is the backing map's iteration order; callers must
    /// not rely on it.
    async fn all(&self) -> DocumentStoreResult<DocumentCursor>;

    /// Creates multiple documents, stopping at the first failure.
    ///
    /// Items are committed one by one; an extraction error or duplicate key
    /// fails the batch at that item with all prior items committed. See
    /// [`BulkWriteOutcome`] for the partial-success contract.
    async fn create_many<D>(&self, documents: &[D]) -> BulkWriteOutcome
    where
        D: Serialize + Sync;

    /// Inserts or replaces multiple documents unconditionally.
    ///
    /// Every document is validated up front; the batch fails fast — before
    /// touching storage — if any document lacks a usable identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::EmptyOrInvalidId`] when any document in
    /// the batch has no usable identifier.
    async fn update_many<D>(&self, documents: &[D]) -> DocumentStoreResult<()>
    where
        D: Serialize + Sync;
}

/// The filter-expression query surface of a collection.
#[async_trait]
pub trait QueryableCollection: DataCollection {
    /// Runs the filter expression over every document and returns a cursor
    /// over the matches.
    ///
    /// `fields` is accepted for interface compatibility but does not restrict
    /// the returned documents; full documents are always produced.
    async fn select(&self, filter: &Expr, fields: &Fields) -> DocumentStoreResult<DocumentCursor>;
}

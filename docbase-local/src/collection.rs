//! The public collection surface over one file-backed table.
//!
//! A [`LocalCollection`] combines a [`FileTable`] with the query evaluator
//! behind the [`DataCollection`] and [`QueryableCollection`] traits. It
//! extracts and validates the reserved identifier fields on every write path
//! and decodes raw documents back into caller types on the read paths.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use docbase_core::{
    collection::{BulkWriteOutcome, DataCollection, QueryableCollection},
    cursor::DocumentCursor,
    document::{DocumentMeta, decode_document, encode_document},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Fields},
};

use crate::{evaluator, table::FileTable};

/// A collection of documents backed by one file-backed table.
///
/// Collections are cheap handles over a shared table; cloning one or creating
/// several through the same manager observes the same data.
#[derive(Debug, Clone)]
pub struct LocalCollection {
    table: Arc<FileTable>,
}

impl LocalCollection {
    /// Wraps a table in the collection surface.
    pub fn new(table: Arc<FileTable>) -> Self {
        Self { table }
    }

    /// Returns the query surface of this collection.
    ///
    /// The collection is its own query surface, so this is an identity
    /// conversion and never fails.
    pub fn as_queryable(&self) -> DocumentStoreResult<&Self> {
        Ok(self)
    }
}

#[async_trait]
impl DataCollection for LocalCollection {
    async fn create<D>(&self, document: &D) -> DocumentStoreResult<DocumentMeta>
    where
        D: Serialize + Sync,
    {
        let (meta, raw) = encode_document(document)?;
        self.table.insert(&meta.id, raw).await?;

        Ok(meta)
    }

    async fn get<D>(&self, id: &str) -> DocumentStoreResult<D>
    where
        D: DeserializeOwned + Send,
    {
        match self.table.get(id).await {
            Some(raw) => decode_document(&raw),
            None => Err(DocumentStoreError::NoDocuments(id.to_string())),
        }
    }

    async fn update<D>(&self, document: &D) -> DocumentStoreResult<()>
    where
        D: Serialize + Sync,
    {
        let (meta, raw) = encode_document(document)?;

        self.table.update(&meta.id, raw).await
    }

    async fn delete(&self, id: &str) -> DocumentStoreResult<()> {
        if id.is_empty() {
            return Err(DocumentStoreError::EmptyOrInvalidId);
        }

        self.table.remove(id).await;

        Ok(())
    }

    async fn count(&self) -> u64 {
        self.table.count().await
    }

    async fn all(&self) -> DocumentStoreResult<DocumentCursor> {
        Ok(DocumentCursor::new(self.table.all().await))
    }

    async fn create_many<D>(&self, documents: &[D]) -> BulkWriteOutcome
    where
        D: Serialize + Sync,
    {
        let mut metas = Vec::with_capacity(documents.len());

        let entries = documents
            .iter()
            .map(|document| {
                encode_document(document).map(|(meta, raw)| {
                    let key = meta.id.clone();
                    metas.push(meta);
                    (key, raw)
                })
            })
            .collect::<Vec<_>>();

        let mut collected = Vec::new();
        let error = self
            .table
            .insert_each(entries, &mut collected)
            .await
            .err();

        // only the committed prefix was collected
        metas.truncate(collected.len());

        BulkWriteOutcome { created: metas, error }
    }

    async fn update_many<D>(&self, documents: &[D]) -> DocumentStoreResult<()>
    where
        D: Serialize + Sync,
    {
        let mut pairs = Vec::with_capacity(documents.len());

        // validate the whole batch before touching storage
        for document in documents {
            let (meta, raw) = encode_document(document)?;
            pairs.push((meta.id, raw));
        }

        self.table.upsert_many(pairs).await;

        Ok(())
    }
}

#[async_trait]
impl QueryableCollection for LocalCollection {
    async fn select(&self, filter: &Expr, _fields: &Fields) -> DocumentStoreResult<DocumentCursor> {
        let matches = self
            .table
            .scan(|raw| {
                serde_json::from_str::<Value>(raw.get())
                    .map(|document| evaluator::matches(&document, filter))
                    .unwrap_or(false)
            })
            .await;

        Ok(DocumentCursor::new(matches))
    }
}

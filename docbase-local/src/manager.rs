//! Per-directory registry of file-backed tables.
//!
//! A [`FileManager`] owns one directory and hands out at most one
//! [`FileTable`] per collection name, either freshly initialized
//! ([`create_table`](FileManager::create_table)) or loaded from the
//! collection's backing file ([`open_table`](FileManager::open_table)).
//! Managers are plain caller-owned values — independent managers over
//! different directories (or even the same one in separate tests) never
//! share state.
//!
//! Concurrent create/open requests for the same name serialize on the
//! registry lock, so a table is never initialized twice.

use std::{collections::HashMap, path::{Path, PathBuf}, sync::Arc};

use futures::future::join_all;
use mea::mutex::Mutex;
use tracing::{info, warn};

use docbase_core::{
    document::RawDocument,
    error::{DocumentStoreError, DocumentStoreResult},
};

use crate::table::FileTable;

/// The registry owning every table for one directory.
#[derive(Debug)]
pub struct FileManager {
    path: PathBuf,
    tables: Mutex<HashMap<String, Arc<FileTable>>>,
}

impl FileManager {
    /// Creates a manager for the given directory.
    ///
    /// The directory itself is not validated here; the store entry point
    /// checks it before constructing a manager.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tables: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the directory this manager owns.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates a new, empty table for the given collection name and starts
    /// its periodic flush task.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::CollectionAlreadyExists`] if a table is
    /// already registered under the name or a backing file for it exists on
    /// disk.
    pub async fn create_table(
        &self,
        name: &str,
        every_secs: u64,
        update_sync: bool,
    ) -> DocumentStoreResult<Arc<FileTable>> {
        let mut tables = self.tables.lock().await;
        let file_path = self.file_path(name);

        if tables.contains_key(name) || tokio::fs::try_exists(&file_path).await? {
            return Err(DocumentStoreError::CollectionAlreadyExists(name.to_string()));
        }

        let table = FileTable::new(file_path, update_sync, HashMap::new());
        FileTable::spawn_flush(&table, every_secs).await;
        tables.insert(name.to_string(), Arc::clone(&table));

        info!(collection = name, path = %self.path.display(), "created collection");

        Ok(table)
    }

    /// Returns the table for an existing collection, loading it from its
    /// backing file on first access.
    ///
    /// If the table is already registered, the existing instance is returned
    /// and the configuration arguments are ignored — the first caller's
    /// durability mode holds for the table's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::CollectionNotFound`] when neither a
    /// registered table nor a backing file exists, an I/O error when the file
    /// cannot be read, or a serialization error when its contents are not a
    /// JSON object of documents. No partial recovery is attempted.
    pub async fn open_table(
        &self,
        name: &str,
        every_secs: u64,
        update_sync: bool,
    ) -> DocumentStoreResult<Arc<FileTable>> {
        let mut tables = self.tables.lock().await;

        if let Some(table) = tables.get(name) {
            return Ok(Arc::clone(table));
        }

        let file_path = self.file_path(name);

        if !tokio::fs::try_exists(&file_path).await? {
            return Err(DocumentStoreError::CollectionNotFound(name.to_string()));
        }

        let contents = tokio::fs::read(&file_path).await?;
        let items: HashMap<String, RawDocument> = serde_json::from_slice(&contents)?;

        info!(
            collection = name,
            documents = items.len(),
            path = %self.path.display(),
            "loaded collection"
        );

        let table = FileTable::new(file_path, update_sync, items);
        FileTable::spawn_flush(&table, every_secs).await;
        tables.insert(name.to_string(), Arc::clone(&table));

        Ok(table)
    }

    /// Flushes and evicts every registered table.
    ///
    /// All tables are closed concurrently; every one is attempted even when
    /// some fail.
    ///
    /// # Errors
    ///
    /// Returns the first close failure after all tables have been attempted.
    pub async fn close(&self) -> DocumentStoreResult<()> {
        let mut tables = self.tables.lock().await;
        let drained: Vec<(String, Arc<FileTable>)> = tables.drain().collect();

        let results = join_all(drained.into_iter().map(|(name, table)| async move {
            (name, table.close().await)
        }))
        .await;

        let mut first_error = None;

        for (name, result) in results {
            if let Err(error) = result {
                warn!(collection = %name, %error, "failed to flush collection on close");

                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{name}.json"))
    }
}

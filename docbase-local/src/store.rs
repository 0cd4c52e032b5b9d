//! The local store entry point.
//!
//! A [`LocalStore`] owns one [`FileManager`] over a validated directory and
//! hands out [`LocalCollection`] handles. Construction goes through
//! [`LocalStoreBuilder`], which validates the directory and the flush
//! configuration before anything touches disk.
//!
//! # Example
//!
//! ```ignore
//! use docbase_local::LocalStore;
//!
//! let store = LocalStore::builder("/var/lib/app/data")
//!     .sync_interval(30)
//!     .update_sync(false)
//!     .build()
//!     .await?;
//!
//! let movies = store.create_collection("movies").await?;
//! # Ok::<(), docbase_core::error::DocumentStoreError>(())
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use docbase_core::error::{DocumentStoreError, DocumentStoreResult};

use crate::{collection::LocalCollection, manager::FileManager};

/// The widest allowed periodic flush interval, in seconds.
const MAX_SYNC_INTERVAL_SECS: u64 = 3600;

/// Maximum length of a collection name.
const MAX_COLLECTION_NAME_LEN: usize = 32;

/// File-system metadata for a store's directory.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    /// The directory's base name.
    pub name: String,
    /// The directory's size in bytes, as reported by the file system.
    pub size: u64,
    /// The directory's last modification time.
    pub modified: DateTime<Utc>,
}

/// An embedded document store over one directory of collection files.
#[derive(Debug)]
pub struct LocalStore {
    manager: FileManager,
    sync_every_secs: u64,
    update_sync: bool,
}

impl LocalStore {
    /// Creates a builder for a store rooted at the given directory.
    pub fn builder(path: impl Into<PathBuf>) -> LocalStoreBuilder {
        LocalStoreBuilder {
            path: path.into(),
            sync_every_secs: 0,
            update_sync: false,
        }
    }

    /// Creates a new collection.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidCollectionName`] when the name is
    /// not a letter followed by up to 31 letters, digits, or underscores, and
    /// [`DocumentStoreError::CollectionAlreadyExists`] when the collection is
    /// already present in memory or on disk.
    pub async fn create_collection(&self, name: &str) -> DocumentStoreResult<LocalCollection> {
        validate_collection_name(name)?;

        let table = self
            .manager
            .create_table(name, self.sync_every_secs, self.update_sync)
            .await?;

        Ok(LocalCollection::new(table))
    }

    /// Returns an existing collection, loading it from disk on first access.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::CollectionNotFound`] when the collection
    /// exists neither in memory nor on disk, or an I/O or serialization error
    /// when its backing file cannot be read.
    pub async fn collection(&self, name: &str) -> DocumentStoreResult<LocalCollection> {
        let table = self
            .manager
            .open_table(name, self.sync_every_secs, self.update_sync)
            .await?;

        Ok(LocalCollection::new(table))
    }

    /// Reports file-system metadata for the store's directory.
    pub async fn status(&self) -> DocumentStoreResult<StoreStatus> {
        let metadata = tokio::fs::metadata(self.manager.path()).await?;
        let modified: DateTime<Utc> = metadata.modified()?.into();

        let name = self
            .manager
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(StoreStatus { name, size: metadata.len(), modified })
    }

    /// Flushes and closes every collection in the store.
    ///
    /// # Errors
    ///
    /// Returns the first flush failure after all collections have been
    /// attempted.
    pub async fn close(&self) -> DocumentStoreResult<()> {
        self.manager.close().await
    }
}

/// Builder validating the directory and flush configuration of a [`LocalStore`].
#[derive(Debug, Clone)]
pub struct LocalStoreBuilder {
    path: PathBuf,
    sync_every_secs: u64,
    update_sync: bool,
}

impl LocalStoreBuilder {
    /// Sets the periodic flush interval in seconds.
    ///
    /// Zero (the default) disables the periodic flush task; the accepted
    /// range is 0–3600.
    pub fn sync_interval(mut self, seconds: u64) -> Self {
        self.sync_every_secs = seconds;
        self
    }

    /// Selects synchronous flushing after every mutating operation, instead
    /// of the default deferred (periodic or close-time) flushing.
    pub fn update_sync(mut self, update_sync: bool) -> Self {
        self.update_sync = update_sync;
        self
    }

    /// Validates the configuration and builds the store.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Initialization`] when the flush interval
    /// is out of range or the path does not name an existing directory.
    pub async fn build(self) -> DocumentStoreResult<LocalStore> {
        if self.sync_every_secs > MAX_SYNC_INTERVAL_SECS {
            return Err(DocumentStoreError::Initialization(format!(
                "sync interval {} out of range (0-{MAX_SYNC_INTERVAL_SECS} seconds)",
                self.sync_every_secs,
            )));
        }

        let is_dir = tokio::fs::metadata(&self.path)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false);

        if !is_dir {
            return Err(DocumentStoreError::Initialization(format!(
                "invalid path: {}",
                self.path.display(),
            )));
        }

        info!(
            path = %self.path.display(),
            sync_interval_secs = self.sync_every_secs,
            update_sync = self.update_sync,
            "opened local store"
        );

        Ok(LocalStore {
            manager: FileManager::new(self.path),
            sync_every_secs: self.sync_every_secs,
            update_sync: self.update_sync,
        })
    }
}

/// Checks a collection name: a letter followed by up to 31 letters, digits,
/// or underscores.
fn validate_collection_name(name: &str) -> DocumentStoreResult<()> {
    let mut chars = name.chars();

    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            name.len() <= MAX_COLLECTION_NAME_LEN
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(DocumentStoreError::InvalidCollectionName(name.to_string()))
    }
}

//! The file-backed document table.
//!
//! A [`FileTable`] holds one collection's documents in memory — a map from
//! identifier to raw JSON document behind an async read-write lock — and owns
//! the single flat file the map is snapshotted to. Durability is whole-file:
//! [`FileTable::sync`] serializes the entire map as one JSON object and
//! overwrites the backing file.
//!
//! Two flush policies exist, selected at creation time:
//!
//! - *synchronous* (`update_sync = true`): every mutating operation is
//!   followed by a best-effort flush;
//! - *deferred*: the map only reaches disk through the periodic flush task
//!   (when an interval is configured) or an explicit [`FileTable::close`].
//!
//! The lock is held only for map operations, never across file I/O: `sync`
//! clones the map under the exclusive lock and serializes/writes outside it,
//! so disk writes do not block readers.

use std::{collections::HashMap, path::{Path, PathBuf}, sync::Arc, time::Duration};

use mea::{mutex::Mutex, rwlock::RwLock};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use docbase_core::{
    document::RawDocument,
    error::{DocumentStoreError, DocumentStoreResult},
};

/// The in-memory table backing one named collection, plus its file path and
/// flush policy.
///
/// A table lives behind an `Arc`, created and registered by its
/// [`FileManager`](crate::manager::FileManager); at most one instance exists
/// per (directory, name) pair for the life of the manager entry. All methods
/// take `&self` and are safe to call concurrently.
#[derive(Debug)]
pub struct FileTable {
    path: PathBuf,
    items: RwLock<HashMap<String, RawDocument>>,
    update_sync: bool,
    shutdown: watch::Sender<bool>,
    flush_task: Mutex<Option<JoinHandle<()>>>,
    last_sync_error: RwLock<Option<String>>,
}

impl FileTable {
    /// Creates a table over the given backing file and initial contents.
    pub(crate) fn new(
        path: PathBuf,
        update_sync: bool,
        items: HashMap<String, RawDocument>,
    ) -> Arc<Self> {
        let (shutdown, _) = watch::channel(false);

        Arc::new(Self {
            path,
            items: RwLock::new(items),
            update_sync,
            shutdown,
            flush_task: Mutex::new(None),
            last_sync_error: RwLock::new(None),
        })
    }

    /// Starts the periodic flush task for this table.
    ///
    /// An interval of zero disables the timer entirely. The task runs until
    /// the table's shutdown signal fires and is joined by
    /// [`close`](FileTable::close).
    pub(crate) async fn spawn_flush(table: &Arc<Self>, every_secs: u64) {
        if every_secs == 0 {
            return;
        }

        let mut shutdown = table.shutdown.subscribe();
        let period = Duration::from_secs(every_secs);
        let worker = Arc::clone(table);

        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        worker.best_effort_sync().await;
                    }
                    _ = shutdown.changed() => {
                        debug!(path = %worker.path.display(), "flush task stopping");
                        break;
                    }
                }
            }
        });

        *table.flush_task.lock().await = Some(handle);
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts a new document under the given key.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DocumentAlreadyExists`] if the key is
    /// already present.
    pub async fn insert(&self, key: &str, document: RawDocument) -> DocumentStoreResult<()> {
        {
            let mut items = self.items.write().await;

            if items.contains_key(key) {
                return Err(DocumentStoreError::DocumentAlreadyExists(key.to_string()));
            }

            items.insert(key.to_string(), document);
        }

        if self.update_sync {
            self.best_effort_sync().await;
        }

        Ok(())
    }

    /// Returns the document stored under the given key, if any.
    pub async fn get(&self, key: &str) -> Option<RawDocument> {
        self.items
            .read()
            .await
            .get(key)
            .cloned()
    }

    /// Replaces the document stored under the given key.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::DocumentNotFound`] if the key is absent.
    pub async fn update(&self, key: &str, document: RawDocument) -> DocumentStoreResult<()> {
        {
            let mut items = self.items.write().await;

            if !items.contains_key(key) {
                return Err(DocumentStoreError::DocumentNotFound(key.to_string()));
            }

            items.insert(key.to_string(), document);
        }

        if self.update_sync {
            self.best_effort_sync().await;
        }

        Ok(())
    }

    /// Removes the document stored under the given key.
    ///
    /// Removing an absent key is not an error.
    pub async fn remove(&self, key: &str) {
        {
            let mut items = self.items.write().await;
            items.remove(key);
        }

        if self.update_sync {
            self.best_effort_sync().await;
        }
    }

    /// Returns the current number of documents in the table.
    pub async fn count(&self) -> u64 {
        self.items.read().await.len() as u64
    }

    /// Returns a snapshot copy of every document in the table.
    ///
    /// The order is the map's iteration order; callers must not rely on it.
    pub async fn all(&self) -> Vec<RawDocument> {
        self.items
            .read()
            .await
            .values()
            .cloned()
            .collect()
    }

    /// Returns a snapshot copy of every document for which the predicate holds.
    ///
    /// The predicate is expected to fold its own failures (such as a document
    /// that does not decode) into `false`; nothing is propagated from here.
    pub async fn scan<P>(&self, predicate: P) -> Vec<RawDocument>
    where
        P: Fn(&RawDocument) -> bool,
    {
        self.items
            .read()
            .await
            .values()
            .filter(|document| predicate(document))
            .cloned()
            .collect()
    }

    /// Inserts a sequence of pre-extracted entries, stopping at the first failure.
    ///
    /// The exclusive lock is held across the whole batch. Each successfully
    /// inserted key is pushed to `collected` before the next entry is
    /// attempted; a failed extraction (an `Err` entry) or a duplicate key
    /// fails the call at that item with all prior items committed — there is
    /// no rollback. In synchronous mode a flush follows the batch whether or
    /// not it failed, since committed items must still reach disk.
    pub async fn insert_each(
        &self,
        entries: Vec<DocumentStoreResult<(String, RawDocument)>>,
        collected: &mut Vec<String>,
    ) -> DocumentStoreResult<()> {
        let result = {
            let mut items = self.items.write().await;
            let mut outcome = Ok(());

            for entry in entries {
                match entry {
                    Ok((key, document)) => {
                        if items.contains_key(&key) {
                            outcome = Err(DocumentStoreError::DocumentAlreadyExists(key));
                            break;
                        }

                        items.insert(key.clone(), document);
                        collected.push(key);
                    }
                    Err(error) => {
                        outcome = Err(error);
                        break;
                    }
                }
            }

            outcome
        };

        if self.update_sync {
            self.best_effort_sync().await;
        }

        result
    }

    /// Inserts or replaces every given pair unconditionally.
    pub async fn upsert_many(&self, pairs: Vec<(String, RawDocument)>) {
        {
            let mut items = self.items.write().await;

            for (key, document) in pairs {
                items.insert(key, document);
            }
        }

        if self.update_sync {
            self.best_effort_sync().await;
        }
    }

    /// Serializes the entire map to a single JSON object and overwrites the
    /// backing file.
    ///
    /// The exclusive lock is held only while the map is cloned into a
    /// transient export; serialization and the write happen outside it.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the export cannot be encoded, or an
    /// I/O error if the file cannot be written.
    pub async fn sync(&self) -> DocumentStoreResult<()> {
        let export = {
            let items = self.items.write().await;
            items.clone()
        };

        let encoded = serde_json::to_vec(&export)?;
        tokio::fs::write(&self.path, encoded).await?;

        Ok(())
    }

    /// Returns the message of the most recent failed background flush, if the
    /// latest flush failed.
    ///
    /// Mutation-triggered and timer-triggered flushes are best-effort; this
    /// slot is the observable side channel for their failures. A subsequent
    /// successful flush clears it.
    pub async fn last_sync_error(&self) -> Option<String> {
        self.last_sync_error.read().await.clone()
    }

    /// Stops the periodic flush task, joins it, and runs a final flush.
    ///
    /// # Errors
    ///
    /// Returns the final flush's serialization or I/O error, if any.
    pub async fn close(&self) -> DocumentStoreResult<()> {
        // send fails only when no flush task ever subscribed
        let _ = self.shutdown.send(true);

        if let Some(handle) = self.flush_task.lock().await.take() {
            let _ = handle.await;
        }

        self.sync().await
    }

    /// Runs a flush, logging and recording the error instead of surfacing it.
    async fn best_effort_sync(&self) {
        match self.sync().await {
            Ok(()) => {
                *self.last_sync_error.write().await = None;
            }
            Err(error) => {
                warn!(path = %self.path.display(), %error, "snapshot flush failed");
                *self.last_sync_error.write().await = Some(error.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::value::RawValue;
    use tempfile::tempdir;

    fn raw(text: &str) -> RawDocument {
        RawValue::from_string(text.to_string()).unwrap()
    }

    fn table_at(dir: &Path, update_sync: bool) -> Arc<FileTable> {
        FileTable::new(dir.join("table.json"), update_sync, HashMap::new())
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_keys() {
        let dir = tempdir().unwrap();
        let table = table_at(dir.path(), false);

        table.insert("a", raw(r#"{"n":1}"#)).await.unwrap();

        assert!(matches!(
            table.insert("a", raw(r#"{"n":2}"#)).await,
            Err(DocumentStoreError::DocumentAlreadyExists(key)) if key == "a"
        ));
        assert_eq!(table.count().await, 1);
    }

    #[tokio::test]
    async fn update_requires_an_existing_key() {
        let dir = tempdir().unwrap();
        let table = table_at(dir.path(), false);

        assert!(matches!(
            table.update("missing", raw("{}")).await,
            Err(DocumentStoreError::DocumentNotFound(_))
        ));

        table.insert("a", raw(r#"{"n":1}"#)).await.unwrap();
        table.update("a", raw(r#"{"n":2}"#)).await.unwrap();
        assert_eq!(table.get("a").await.unwrap().get(), r#"{"n":2}"#);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let table = table_at(dir.path(), false);

        table.insert("a", raw("{}")).await.unwrap();
        table.remove("a").await;
        table.remove("a").await;
        assert_eq!(table.count().await, 0);
    }

    #[tokio::test]
    async fn insert_each_commits_the_prefix_before_a_duplicate() {
        let dir = tempdir().unwrap();
        let table = table_at(dir.path(), false);

        table.insert("b", raw(r#"{"n":0}"#)).await.unwrap();

        let entries = vec![
            Ok(("a".to_string(), raw(r#"{"n":1}"#))),
            Ok(("b".to_string(), raw(r#"{"n":2}"#))),
            Ok(("c".to_string(), raw(r#"{"n":3}"#))),
        ];

        let mut collected = Vec::new();
        let result = table.insert_each(entries, &mut collected).await;

        assert!(matches!(
            result,
            Err(DocumentStoreError::DocumentAlreadyExists(key)) if key == "b"
        ));
        assert_eq!(collected, vec!["a".to_string()]);
        // "c" was never attempted
        assert!(table.get("c").await.is_none());
        // the pre-existing "b" is untouched
        assert_eq!(table.get("b").await.unwrap().get(), r#"{"n":0}"#);
    }

    #[tokio::test]
    async fn upsert_many_overwrites_unconditionally() {
        let dir = tempdir().unwrap();
        let table = table_at(dir.path(), false);

        table.insert("a", raw(r#"{"n":1}"#)).await.unwrap();
        table
            .upsert_many(vec![
                ("a".to_string(), raw(r#"{"n":10}"#)),
                ("b".to_string(), raw(r#"{"n":20}"#)),
            ])
            .await;

        assert_eq!(table.count().await, 2);
        assert_eq!(table.get("a").await.unwrap().get(), r#"{"n":10}"#);
    }

    #[tokio::test]
    async fn sync_writes_one_json_object_keyed_by_id() {
        let dir = tempdir().unwrap();
        let table = table_at(dir.path(), false);

        table.insert("a", raw(r#"{"n":1}"#)).await.unwrap();
        table.sync().await.unwrap();

        let contents = tokio::fs::read(table.path()).await.unwrap();
        let decoded: HashMap<String, serde_json::Value> =
            serde_json::from_slice(&contents).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded["a"], serde_json::json!({ "n": 1 }));
    }

    #[tokio::test]
    async fn update_sync_mode_flushes_after_each_mutation() {
        let dir = tempdir().unwrap();
        let table = table_at(dir.path(), true);

        table.insert("a", raw(r#"{"n":1}"#)).await.unwrap();
        assert!(tokio::fs::try_exists(table.path()).await.unwrap());

        table.remove("a").await;
        let contents = tokio::fs::read(table.path()).await.unwrap();
        let decoded: HashMap<String, serde_json::Value> =
            serde_json::from_slice(&contents).unwrap();
        assert!(decoded.is_empty());
    }

    #[tokio::test]
    async fn deferred_mode_touches_disk_only_on_close() {
        let dir = tempdir().unwrap();
        let table = table_at(dir.path(), false);

        table.insert("a", raw(r#"{"n":1}"#)).await.unwrap();
        assert!(!tokio::fs::try_exists(table.path()).await.unwrap());

        table.close().await.unwrap();
        assert!(tokio::fs::try_exists(table.path()).await.unwrap());
    }

    #[tokio::test]
    async fn periodic_flush_writes_without_explicit_sync() {
        let dir = tempdir().unwrap();
        let table = table_at(dir.path(), false);
        FileTable::spawn_flush(&table, 1).await;

        table.insert("a", raw(r#"{"n":1}"#)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(tokio::fs::try_exists(table.path()).await.unwrap());
        table.close().await.unwrap();
    }

    #[tokio::test]
    async fn failed_flush_is_recorded_and_cleared() {
        let dir = tempdir().unwrap();
        // a backing path whose parent does not exist makes every write fail
        let table = FileTable::new(
            dir.path().join("missing").join("table.json"),
            true,
            HashMap::new(),
        );

        table.insert("a", raw(r#"{"n":1}"#)).await.unwrap();
        assert!(table.last_sync_error().await.is_some());
        // the document itself is still in memory
        assert_eq!(table.count().await, 1);

        // once the directory exists, the next flush succeeds and clears the slot
        tokio::fs::create_dir(dir.path().join("missing")).await.unwrap();
        table.insert("b", raw(r#"{"n":2}"#)).await.unwrap();
        assert!(table.last_sync_error().await.is_none());
    }
}

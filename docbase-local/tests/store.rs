//! Store entry point tests: builder validation, collection naming, status,
//! and the durability modes end to end.

use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize};
use tempfile::tempdir;

use docbase_core::{collection::DataCollection, error::DocumentStoreError};
use docbase_local::LocalStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Note {
    #[serde(rename = "_id")]
    id: String,
    body: String,
}

fn note(id: &str, body: &str) -> Note {
    Note { id: id.to_string(), body: body.to_string() }
}

#[tokio::test]
async fn builder_rejects_a_missing_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");

    assert!(matches!(
        LocalStore::builder(&missing).build().await,
        Err(DocumentStoreError::Initialization(_))
    ));
}

#[tokio::test]
async fn builder_rejects_a_file_path() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    tokio::fs::write(&file, b"x").await.unwrap();

    assert!(matches!(
        LocalStore::builder(&file).build().await,
        Err(DocumentStoreError::Initialization(_))
    ));
}

#[tokio::test]
async fn builder_bounds_the_sync_interval() {
    let dir = tempdir().unwrap();

    assert!(matches!(
        LocalStore::builder(dir.path()).sync_interval(3601).build().await,
        Err(DocumentStoreError::Initialization(_))
    ));

    LocalStore::builder(dir.path())
        .sync_interval(3600)
        .build()
        .await
        .unwrap();
}

#[tokio::test]
async fn collection_names_are_validated_on_create() {
    let dir = tempdir().unwrap();
    let store = LocalStore::builder(dir.path()).build().await.unwrap();

    for name in ["", "*notes", "1notes", "notes.json", "a slot"] {
        assert!(matches!(
            store.create_collection(name).await,
            Err(DocumentStoreError::InvalidCollectionName(_))
        ));
    }

    store.create_collection("notes_2024").await.unwrap();
}

#[tokio::test]
async fn collections_follow_create_and_open_semantics() {
    let dir = tempdir().unwrap();
    let store = LocalStore::builder(dir.path()).build().await.unwrap();

    store.create_collection("notes").await.unwrap();

    assert!(matches!(
        store.create_collection("notes").await,
        Err(DocumentStoreError::CollectionAlreadyExists(_))
    ));

    store.collection("notes").await.unwrap();

    assert!(matches!(
        store.collection("drafts").await,
        Err(DocumentStoreError::CollectionNotFound(_))
    ));
}

#[tokio::test]
async fn status_reports_the_directory_metadata() {
    let dir = tempdir().unwrap();
    let store = LocalStore::builder(dir.path()).build().await.unwrap();

    let status = store.status().await.unwrap();
    let expected = dir
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    assert_eq!(status.name, expected);
}

#[tokio::test]
async fn update_sync_mode_persists_every_mutation_immediately() {
    let dir = tempdir().unwrap();
    let store = LocalStore::builder(dir.path())
        .update_sync(true)
        .build()
        .await
        .unwrap();

    let notes = store.create_collection("notes").await.unwrap();
    notes.create(&note("note_1", "first")).await.unwrap();

    // visible on disk without any explicit flush
    let contents = tokio::fs::read(dir.path().join("notes.json")).await.unwrap();
    let decoded: HashMap<String, Note> = serde_json::from_slice(&contents).unwrap();
    assert_eq!(decoded["note_1"], note("note_1", "first"));
}

#[tokio::test]
async fn periodic_flush_persists_without_explicit_sync() {
    let dir = tempdir().unwrap();
    let store = LocalStore::builder(dir.path())
        .sync_interval(1)
        .build()
        .await
        .unwrap();

    let notes = store.create_collection("notes").await.unwrap();
    notes.create(&note("note_1", "first")).await.unwrap();

    let path = dir.path().join("notes.json");
    assert!(!tokio::fs::try_exists(&path).await.unwrap());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(tokio::fs::try_exists(&path).await.unwrap());

    store.close().await.unwrap();
}

#[tokio::test]
async fn deferred_mode_persists_on_close_and_reloads() {
    let dir = tempdir().unwrap();

    {
        let store = LocalStore::builder(dir.path()).build().await.unwrap();
        let notes = store.create_collection("notes").await.unwrap();

        notes.create(&note("note_1", "first")).await.unwrap();
        notes.create(&note("note_2", "second")).await.unwrap();

        assert!(!tokio::fs::try_exists(dir.path().join("notes.json")).await.unwrap());
        store.close().await.unwrap();
    }

    let store = LocalStore::builder(dir.path()).build().await.unwrap();
    let notes = store.collection("notes").await.unwrap();

    assert_eq!(notes.count().await, 2);
    let stored: Note = notes.get("note_2").await.unwrap();
    assert_eq!(stored, note("note_2", "second"));
}

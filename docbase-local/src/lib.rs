//! File-backed local storage for the docbase document store.
//!
//! This crate provides the embedded engine: each collection is an in-memory
//! map of raw JSON documents behind an async read-write lock, snapshotted to
//! a single `<collection>.json` file in the store's directory.
//!
//! - [`store`] - The validated entry point ([`LocalStore`])
//! - [`manager`] - Per-directory registry of tables ([`FileManager`])
//! - [`table`] - The locked, file-backed document table ([`FileTable`])
//! - [`collection`] - The CRUD and query facade ([`LocalCollection`])
//! - [`evaluator`] - Filter-expression evaluation over decoded documents
//!
//! # Example
//!
//! ```ignore
//! use docbase_local::LocalStore;
//! use docbase_core::{collection::{DataCollection, QueryableCollection}, query::{Fields, Filter}};
//!
//! let store = LocalStore::builder("./data").build().await?;
//! let movies = store.create_collection("movies").await?;
//!
//! movies.create(&movie).await?;
//!
//! let mut winners = movies
//!     .select(&Filter::eq("oscars", true), &Fields::none())
//!     .await?;
//! # Ok::<(), docbase_core::error::DocumentStoreError>(())
//! ```

pub mod collection;
pub mod evaluator;
pub mod manager;
pub mod store;
pub mod table;

pub use collection::LocalCollection;
pub use manager::FileManager;
pub use store::{LocalStore, LocalStoreBuilder, StoreStatus};
pub use table::FileTable;

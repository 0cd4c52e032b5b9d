//! Main docbase crate providing an embedded JSON document store.
//!
//! This crate is the primary entry point for users of docbase. It re-exports
//! the abstraction layer (`docbase-core`) and the file-backed local engine
//! (`docbase-local`) and provides a [`prelude`] for the common types.
//!
//! # Backends
//!
//! - [`local`] - File-backed storage, one JSON file per collection
//!
//! # Quick Start
//!
//! ```ignore
//! use docbase::prelude::*;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Movie {
//!     #[serde(rename = "_id")]
//!     pub id: String,
//!     pub title: String,
//!     pub year: i64,
//!     pub oscars: bool,
//! }
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     // Open a store over an existing directory
//!     let store = LocalStore::builder("./data")
//!         .sync_interval(30)
//!         .build()
//!         .await?;
//!
//!     // Create a collection and insert a document
//!     let movies = store.create_collection("movies").await?;
//!     movies
//!         .create(&Movie {
//!             id: "movie_1".into(),
//!             title: "Blade Runner".into(),
//!             year: 1982,
//!             oscars: false,
//!         })
//!         .await?;
//!
//!     // Query it back
//!     let mut cursor = movies
//!         .select(&Filter::eq("year", 1982), &Fields::none())
//!         .await?;
//!
//!     let mut found: Vec<Movie> = Vec::new();
//!     cursor.drain_into(&mut found)?;
//!
//!     store.close().await
//! }
//! ```

pub mod prelude;

pub use docbase_core::{collection, cursor, document, error, query};

/// File-backed local storage implementations.
pub mod local {
    pub use docbase_local::{
        FileManager, FileTable, LocalCollection, LocalStore, LocalStoreBuilder, StoreStatus,
    };
}

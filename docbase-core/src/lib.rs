//! Core types for the docbase embedded document store.
//!
//! This crate is the abstraction layer of the docbase project and provides:
//!
//! - **Document representation** ([`document`]) - Raw JSON documents and metadata extraction
//! - **Collection interface** ([`collection`]) - The CRUD and query trait surface backends implement
//! - **Query construction** ([`query`]) - Filter-expression trees, builders, and the visitor
//! - **Cursors** ([`cursor`]) - Forward-only iteration over snapshots of raw documents
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use docbase_core::{collection::DataCollection, query::Filter};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Movie {
//!     #[serde(rename = "_id")]
//!     pub id: String,
//!     pub title: String,
//!     pub year: i64,
//! }
//!
//! # async fn example(collection: &impl DataCollection) -> docbase_core::error::DocumentStoreResult<()> {
//! let movie = Movie { id: "movie_1".into(), title: "Blade Runner".into(), year: 1982 };
//! collection.create(&movie).await?;
//! # Ok(()) }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docbase_core;

pub mod collection;
pub mod cursor;
pub mod document;
pub mod error;
pub mod query;

//! Convenient re-exports of commonly used types from docbase.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use docbase::prelude::*;
//! ```
//!
//! This provides access to:
//! - The local store, manager, and collection types
//! - The collection trait surface
//! - Query construction and filtering
//! - Cursors, document metadata, and error types

pub use docbase_core::{
    collection::{BulkWriteOutcome, DataCollection, QueryableCollection},
    cursor::DocumentCursor,
    document::{DocumentMeta, RawDocument, ID_FIELD, REVISION_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{CmpOp, Expr, Fields, Filter, Literal, QueryVisitor},
};

pub use docbase_local::{
    FileManager, FileTable, LocalCollection, LocalStore, LocalStoreBuilder, StoreStatus,
};

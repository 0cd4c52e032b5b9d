//! Forward-only cursor over a snapshot of raw documents.
//!
//! A [`DocumentCursor`] is created per query or scan call and owns a fixed,
//! pre-materialized sequence of raw documents captured at call time — it is
//! not a live view, and consuming it never re-reads the table. Decoding is
//! bound to a concrete destination type at the call site.
//!
//! # Example
//!
//! ```ignore
//! let mut cursor = collection.all().await?;
//!
//! while cursor.advance() {
//!     let movie: Movie = cursor.decode()?;
//!     println!("{}", movie.title);
//! }
//! cursor.close();
//! ```

use serde::de::DeserializeOwned;

use crate::{
    document::{RawDocument, decode_document},
    error::{DocumentStoreError, DocumentStoreResult},
};

/// Where the cursor stands relative to its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Before the first element; no document is current yet.
    NotStarted,
    /// A valid current element at this index.
    At(usize),
    /// Past the last element; no document will become current again.
    Done,
}

/// A one-shot, forward-only iterator over a snapshot of raw documents.
///
/// The cursor starts before the first element; each successful
/// [`advance`](DocumentCursor::advance) makes the next element current.
/// Once exhausted it stays exhausted. Closing releases nothing (the snapshot
/// holds no external resource) and may be called any number of times.
#[derive(Debug)]
pub struct DocumentCursor {
    data: Vec<RawDocument>,
    pos: Position,
}

impl DocumentCursor {
    /// Creates a cursor over the given snapshot, positioned before the first element.
    pub fn new(data: Vec<RawDocument>) -> Self {
        Self { data, pos: Position::NotStarted }
    }

    /// Moves forward one element.
    ///
    /// Returns `true` while a current element is available, `false` once the
    /// snapshot is exhausted (and on every call thereafter).
    pub fn advance(&mut self) -> bool {
        self.pos = match self.pos {
            Position::NotStarted if !self.data.is_empty() => Position::At(0),
            Position::At(index) if index + 1 < self.data.len() => Position::At(index + 1),
            _ => Position::Done,
        };

        matches!(self.pos, Position::At(_))
    }

    /// Decodes the current element into the destination type.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::CursorNotPositioned`] before the first
    /// successful [`advance`](DocumentCursor::advance) or after exhaustion,
    /// and a serialization error if the raw document does not decode into `D`.
    pub fn decode<D: DeserializeOwned>(&self) -> DocumentStoreResult<D> {
        match self.pos {
            Position::At(index) => decode_document(&self.data[index]),
            _ => Err(DocumentStoreError::CursorNotPositioned),
        }
    }

    /// Decodes every remaining element into the destination, in snapshot order.
    ///
    /// On a fresh cursor this drains the entire snapshot; on a positioned
    /// cursor it drains from the current element onward. The cursor is left
    /// exhausted, so a second drain appends nothing.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if any raw document does not decode into `D`.
    pub fn drain_into<D: DeserializeOwned>(
        &mut self,
        destination: &mut Vec<D>,
    ) -> DocumentStoreResult<()> {
        let start = match self.pos {
            Position::NotStarted => 0,
            Position::At(index) => index,
            Position::Done => self.data.len(),
        };

        for raw in &self.data[start..] {
            destination.push(decode_document(raw)?);
        }

        self.pos = Position::Done;

        Ok(())
    }

    /// Closes the cursor.
    ///
    /// No external resource is held, so this is a no-op; it is safe to call
    /// multiple times.
    pub fn close(&self) {}

    /// Returns the number of documents in the underlying snapshot.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying snapshot holds no documents.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

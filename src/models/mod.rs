//! Data models for jobsplit.
//!
//! Line classification and the in-memory document produced by the parser.

mod document;
mod tag;

pub use document::{Document, Item, LINE_TERMINATOR};
pub use tag::{DELIMITER, LineTag, TaggedLine};

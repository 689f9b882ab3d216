//! Full-text search over stored template text.
//!
//! # Responsibility
//! - Expose keyword search backed by the SQLite FTS5 index.
//! - Shape hits inside core.

pub mod fts;

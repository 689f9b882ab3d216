//! Persisted template content shape.
//!
//! # Responsibility
//! - Pair the authoritative document tree with its derived flat text.
//!
//! # Invariants
//! - When `tree` is present it is authoritative; `text` is a lossy
//!   projection kept for search, diff and plain rendering.
//! - `text` is always derived with [`crate::codec::encode`] when a tree is
//!   supplied, never written independently.

use crate::codec::encode;
use crate::model::document::Document;
use serde::{Deserialize, Serialize};

/// `{ text, tree? }` content stored per template/language variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContent {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree: Option<Document>,
}

impl StoredContent {
    /// Snapshots a tree and derives its flat text.
    pub fn from_document(document: Document) -> Self {
        Self {
            text: encode(&document),
            tree: Some(document),
        }
    }

    /// Text-only content, decoded through the lossy fallback path on read.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tree: None,
        }
    }

    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }
}

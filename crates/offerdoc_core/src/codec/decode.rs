//! Flat text to paragraph tree.
//!
//! # Responsibility
//! - Rebuild variable tokens and emphasis runs line by line.
//! - Open stored content, preferring the tree snapshot over the text.
//!
//! # Invariants
//! - Never fails; unmatched markup stays literal text.

use crate::model::content::StoredContent;
use crate::model::document::{Block, Document, Inline};
use once_cell::sync::Lazy;
use regex::Regex;

// Alternation order is the priority order: variable, bold, italic.
static FLAT_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}|\*\*([^*]+)\*\*|\*([^*]+)\*")
        .expect("valid flat token regex")
});

/// Decodes flat text into one paragraph per line.
///
/// Unterminated or mismatched markup stays literal text. Decoded variable
/// tokens carry their key as label until resolved against a catalog.
pub fn decode(text: &str) -> Document {
    Document::new(
        text.split('\n')
            .map(|line| Block::paragraph(decode_line(line)))
            .collect(),
    )
}

/// Returns the authoritative tree when present, otherwise decodes `text`.
pub fn decode_stored(content: &StoredContent) -> Document {
    match &content.tree {
        Some(tree) => tree.clone(),
        None => decode(&content.text),
    }
}

fn decode_line(line: &str) -> Vec<Inline> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    for caps in FLAT_TOKEN_RE.captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > cursor {
            runs.push(Inline::text(&line[cursor..whole.start()]));
        }

        if let Some(key) = caps.get(1) {
            runs.push(Inline::variable(key.as_str(), key.as_str()));
        } else if let Some(bold) = caps.get(2) {
            runs.push(Inline::bold(bold.as_str()));
        } else if let Some(italic) = caps.get(3) {
            runs.push(Inline::italic(italic.as_str()));
        }
        cursor = whole.end();
    }

    if cursor < line.len() {
        runs.push(Inline::text(&line[cursor..]));
    }
    runs
}

//! Tree to flat text projection.
//!
//! # Invariants
//! - Total and deterministic: every tree encodes, equal trees encode equally.
//! - Bold wins over italic on a run carrying both marks.

use super::{rule_line, BULLET_PREFIX};
use crate::model::document::{Block, Document, Inline, TextRun};

/// Renders a document as newline-joined flat text.
pub fn encode(document: &Document) -> String {
    document
        .blocks
        .iter()
        .map(encode_block)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders one block as a single flat-text line.
///
/// Heading level and list ordering are dropped.
pub fn encode_block(block: &Block) -> String {
    match block {
        Block::Paragraph { content } | Block::Heading { content, .. } => encode_runs(content),
        Block::BulletItem { content } | Block::OrderedItem { content } => {
            format!("{BULLET_PREFIX}{}", encode_runs(content))
        }
        Block::HorizontalRule => rule_line(),
    }
}

/// Renders one inline run.
///
/// Bold wins over italic when a run carries both marks.
pub fn encode_inline(inline: &Inline) -> String {
    match inline {
        Inline::Variable(token) => format!("{{{{{}}}}}", token.key),
        Inline::Text(run) => encode_text_run(run),
    }
}

fn encode_runs(content: &[Inline]) -> String {
    content.iter().map(encode_inline).collect()
}

fn encode_text_run(run: &TextRun) -> String {
    if run.text.is_empty() {
        return String::new();
    }
    if run.marks.bold {
        format!("**{}**", run.text)
    } else if run.marks.italic {
        format!("*{}*", run.text)
    } else {
        run.text.clone()
    }
}

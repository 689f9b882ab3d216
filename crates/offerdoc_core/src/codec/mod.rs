//! Bidirectional transcoder between document trees and flat text.
//!
//! # Responsibility
//! - `encode`: total, deterministic projection of a [`Document`] to flat text.
//! - `decode`: total, never-failing fallback from flat text to paragraphs.
//!
//! # Invariants
//! - `encode(decode(s)) == s` for every string `s`, which makes the flat
//!   projection idempotent.
//! - Heading levels, list ordering and horizontal rules are not rebuilt by
//!   `decode`; the tree snapshot is the only lossless form.
//!
//! # See also
//! - docs/architecture/template-content.md
//!
//! [`Document`]: crate::model::document::Document

mod decode;
mod encode;

pub use decode::{decode, decode_stored};
pub use encode::{encode, encode_block, encode_inline};

/// Prefix emitted for bullet and ordered list items.
pub const BULLET_PREFIX: &str = "• ";
/// Glyph repeated to render a horizontal rule.
pub const RULE_GLYPH: char = '─';
/// Number of glyphs in a rendered horizontal rule.
pub const RULE_WIDTH: usize = 24;

/// Full horizontal-rule line.
pub fn rule_line() -> String {
    std::iter::repeat(RULE_GLYPH).take(RULE_WIDTH).collect()
}

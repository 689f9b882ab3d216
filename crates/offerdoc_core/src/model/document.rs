//! Structured rich-document tree for offer/contract templates.
//!
//! # Responsibility
//! - Define the closed set of block and inline node kinds the engine supports.
//! - Provide inspection helpers over the editor offset space.
//!
//! # Invariants
//! - Heading levels are restricted to `1..=4` by construction.
//! - A variable token is atomic: it occupies exactly one editor position and
//!   its identity is `key`.
//! - Consecutive blocks are separated by one editor position.
//!
//! # See also
//! - docs/architecture/template-content.md

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Placeholder rendered for a variable token inside a text window.
///
/// Keeps window character offsets aligned with editor positions.
pub const TOKEN_PLACEHOLDER: char = '\u{FFFC}';

/// Ordered sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        content: Vec<Inline>,
    },
    Heading {
        level: HeadingLevel,
        #[serde(default)]
        content: Vec<Inline>,
    },
    BulletItem {
        #[serde(default)]
        content: Vec<Inline>,
    },
    OrderedItem {
        #[serde(default)]
        content: Vec<Inline>,
    },
    HorizontalRule,
}

/// Inline run inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text(TextRun),
    Variable(VariableToken),
}

/// Run of text sharing one set of marks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "Marks::is_plain")]
    pub marks: Marks,
}

/// Emphasis marks applied to a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marks {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
}

impl Marks {
    pub const PLAIN: Marks = Marks {
        bold: false,
        italic: false,
    };
    pub const BOLD: Marks = Marks {
        bold: true,
        italic: false,
    };
    pub const ITALIC: Marks = Marks {
        bold: false,
        italic: true,
    };

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic
    }
}

/// Atomic reference to a catalog variable.
///
/// `label` is display-only and never serialized into flat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableToken {
    pub key: String,
    pub label: String,
}

/// Heading level restricted to `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

/// Rejected heading level value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHeadingLevel(pub u8);

impl Display for InvalidHeadingLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "heading level must be within 1..=4, got {}", self.0)
    }
}

impl Error for InvalidHeadingLevel {}

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidHeadingLevel(value))
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(value: HeadingLevel) -> Self {
        value.0
    }
}

impl Inline {
    /// Plain, unmarked text run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextRun {
            text: text.into(),
            marks: Marks::PLAIN,
        })
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::Text(TextRun {
            text: text.into(),
            marks: Marks::BOLD,
        })
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::Text(TextRun {
            text: text.into(),
            marks: Marks::ITALIC,
        })
    }

    pub fn variable(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Variable(VariableToken {
            key: key.into(),
            label: label.into(),
        })
    }

    /// Number of editor positions this run occupies.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(run) => run.text.chars().count(),
            Self::Variable(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Self::Paragraph { content }
    }

    /// Inline runs of this block; a horizontal rule has none.
    pub fn content(&self) -> &[Inline] {
        match self {
            Self::Paragraph { content }
            | Self::Heading { content, .. }
            | Self::BulletItem { content }
            | Self::OrderedItem { content } => content,
            Self::HorizontalRule => &[],
        }
    }

    /// Mutable inline runs, or `None` for a horizontal rule.
    pub fn content_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Self::Paragraph { content }
            | Self::Heading { content, .. }
            | Self::BulletItem { content }
            | Self::OrderedItem { content } => Some(content),
            Self::HorizontalRule => None,
        }
    }

    /// Number of editor positions covered by this block's content.
    pub fn content_len(&self) -> usize {
        self.content().iter().map(Inline::len).sum()
    }
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Single-paragraph document.
    pub fn from_paragraph(content: Vec<Inline>) -> Self {
        Self::new(vec![Block::paragraph(content)])
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total length of the editor offset space.
    pub fn content_len(&self) -> usize {
        let inner: usize = self.blocks.iter().map(Block::content_len).sum();
        inner + self.blocks.len().saturating_sub(1)
    }

    /// Variable keys in document order, duplicates included.
    pub fn variable_keys(&self) -> Vec<&str> {
        self.variable_tokens().map(|token| token.key.as_str()).collect()
    }

    pub fn variable_tokens(&self) -> impl Iterator<Item = &VariableToken> {
        self.blocks
            .iter()
            .flat_map(|block| block.content().iter())
            .filter_map(|inline| match inline {
                Inline::Variable(token) => Some(token),
                Inline::Text(_) => None,
            })
    }

    pub fn variable_tokens_mut(&mut self) -> impl Iterator<Item = &mut VariableToken> {
        self.blocks
            .iter_mut()
            .filter_map(Block::content_mut)
            .flat_map(|content| content.iter_mut())
            .filter_map(|inline| match inline {
                Inline::Variable(token) => Some(token),
                Inline::Text(_) => None,
            })
    }

    /// Returns up to `width` characters immediately preceding `offset`.
    ///
    /// Block boundaries render as `\n` and variable tokens as
    /// [`TOKEN_PLACEHOLDER`], so character `i` of the result maps to editor
    /// position `offset - result_len + i`. Offsets past the end clamp.
    pub fn text_before(&self, offset: usize, width: usize) -> String {
        self.window_before(offset, width).1
    }

    /// Clamps `offset` to the document and returns it together with the
    /// window [`Document::text_before`] renders for it.
    ///
    /// Blocks up to the one holding `offset` are only measured; characters
    /// are copied walking backwards and the walk stops once `width` is
    /// reached.
    pub fn window_before(&self, offset: usize, width: usize) -> (usize, String) {
        let mut block_start = 0;
        let mut located = None;
        for (index, block) in self.blocks.iter().enumerate() {
            let block_len = block.content_len();
            located = Some((index, block_start, block_len));
            if offset <= block_start + block_len {
                break;
            }
            block_start += block_len + 1;
        }
        let Some((last_index, last_start, last_len)) = located else {
            return (0, String::new());
        };

        let local_end = (offset - last_start).min(last_len);
        let end = last_start + local_end;
        let mut window = ReverseWindow {
            chars: Vec::with_capacity(width.min(end)),
            width,
            skip: last_len - local_end,
        };

        'blocks: for (index, block) in self.blocks[..=last_index].iter().enumerate().rev() {
            if index < last_index && !window.push('\n') {
                break;
            }
            for inline in block.content().iter().rev() {
                let open = match inline {
                    Inline::Text(run) => run.text.chars().rev().all(|ch| window.push(ch)),
                    Inline::Variable(_) => window.push(TOKEN_PLACEHOLDER),
                };
                if !open {
                    break 'blocks;
                }
            }
        }
        (end, window.chars.iter().rev().collect())
    }

    /// Maps a UTF-16 code unit offset, as counted by Dart and JS hosts, to an
    /// editor position.
    ///
    /// Boundaries and tokens are one unit in both spaces. An offset inside a
    /// surrogate pair rounds down; offsets past the end clamp.
    pub fn position_from_utf16(&self, units: usize) -> usize {
        let mut position = 0;
        let mut remaining = units;
        for (index, block) in self.blocks.iter().enumerate() {
            if index > 0 {
                if remaining == 0 {
                    return position;
                }
                remaining -= 1;
                position += 1;
            }
            for inline in block.content() {
                match inline {
                    Inline::Text(run) => {
                        for ch in run.text.chars() {
                            let width = ch.len_utf16();
                            if remaining < width {
                                return position;
                            }
                            remaining -= width;
                            position += 1;
                        }
                    }
                    Inline::Variable(_) => {
                        if remaining == 0 {
                            return position;
                        }
                        remaining -= 1;
                        position += 1;
                    }
                }
            }
        }
        position
    }
}

/// Backwards collector for [`Document::window_before`].
struct ReverseWindow {
    chars: Vec<char>,
    width: usize,
    /// Characters after the requested offset still to pass over.
    skip: usize,
}

impl ReverseWindow {
    /// Feeds the next character to the left; `false` once the window is full.
    fn push(&mut self, ch: char) -> bool {
        if self.skip > 0 {
            self.skip -= 1;
            return true;
        }
        if self.chars.len() >= self.width {
            return false;
        }
        self.chars.push(ch);
        self.chars.len() < self.width
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, Document, HeadingLevel, Inline, TOKEN_PLACEHOLDER};

    fn sample() -> Document {
        Document::new(vec![
            Block::paragraph(vec![Inline::text("Hi "), Inline::variable("client_name", "Client")]),
            Block::HorizontalRule,
            Block::BulletItem {
                content: vec![Inline::bold("ok")],
            },
        ])
    }

    #[test]
    fn content_len_counts_tokens_once_and_block_boundaries() {
        // "Hi " + token = 4, rule = 0, "ok" = 2, two boundaries.
        assert_eq!(sample().content_len(), 8);
    }

    #[test]
    fn text_before_renders_tokens_and_boundaries() {
        let window = sample().text_before(8, 50);
        let expected: String = ['H', 'i', ' ', TOKEN_PLACEHOLDER, '\n', '\n', 'o', 'k']
            .iter()
            .collect();
        assert_eq!(window, expected);
        assert_eq!(sample().text_before(3, 2), "i ");
        assert_eq!(sample().text_before(100, 2), "ok");
    }

    #[test]
    fn window_from_a_long_document_matches_its_tail() {
        let rows: Vec<String> = (0..20_000).map(|index| format!("row {index}")).collect();
        let document = Document::new(
            rows.iter()
                .map(|row| Block::paragraph(vec![Inline::text(row.as_str())]))
                .collect(),
        );
        let flat = rows.join("\n");
        let end = document.content_len();
        assert_eq!(end, flat.chars().count());

        let tail: String = flat.chars().skip(end - 50).collect();
        assert_eq!(document.text_before(end, 50), tail);
        assert_eq!(document.window_before(end + 10, 50), (end, tail));

        let prefix = rows[..10].join("\n");
        let prefix_len = prefix.chars().count();
        let expected: String = prefix.chars().skip(prefix_len - 13).collect();
        assert_eq!(document.text_before(prefix_len, 13), expected);
        assert_eq!(document.text_before(prefix_len, 0), "");
    }

    #[test]
    fn window_skips_text_after_the_offset_inside_a_block() {
        let document = Document::new(vec![
            Block::paragraph(vec![Inline::text("ab")]),
            Block::paragraph(vec![Inline::text("cd"), Inline::variable("k", "K"), Inline::text("ef")]),
        ]);
        assert_eq!(document.window_before(5, 10), (5, "ab\ncd".to_string()));
        assert_eq!(document.window_before(2, 10), (2, "ab".to_string()));
        assert_eq!(document.window_before(0, 10), (0, String::new()));
        assert_eq!(Document::default().window_before(4, 10), (0, String::new()));
    }

    #[test]
    fn utf16_offsets_map_astral_characters_to_one_position() {
        let document = Document::new(vec![
            Block::paragraph(vec![Inline::text("\u{1F642} /")]),
            Block::paragraph(vec![Inline::variable("k", "K"), Inline::text("x")]),
        ]);
        assert_eq!(document.position_from_utf16(2), 1);
        assert_eq!(document.position_from_utf16(1), 0);
        assert_eq!(document.position_from_utf16(4), 3);
        assert_eq!(document.position_from_utf16(7), 6);
        assert_eq!(document.position_from_utf16(99), 6);
    }

    #[test]
    fn heading_level_rejects_out_of_range_values() {
        assert!(HeadingLevel::try_from(0u8).is_err());
        assert!(HeadingLevel::try_from(5u8).is_err());
        assert_eq!(HeadingLevel::try_from(4u8).expect("level 4").get(), 4);
    }

    #[test]
    fn serde_shape_is_internally_tagged() {
        let doc = Document::new(vec![Block::Heading {
            level: HeadingLevel::try_from(2u8).expect("level 2"),
            content: vec![Inline::variable("total", "Total")],
        }]);
        let json = serde_json::to_value(&doc).expect("serialize document");
        assert_eq!(json["blocks"][0]["type"], "heading");
        assert_eq!(json["blocks"][0]["level"], 2);
        assert_eq!(json["blocks"][0]["content"][0]["type"], "variable");
        assert_eq!(json["blocks"][0]["content"][0]["key"], "total");

        let bad = serde_json::json!({"blocks": [{"type": "heading", "level": 7}]});
        assert!(serde_json::from_value::<Document>(bad).is_err());
    }

    #[test]
    fn variable_keys_follow_document_order() {
        let doc = Document::from_paragraph(vec![
            Inline::variable("b", "B"),
            Inline::text(" and "),
            Inline::variable("a", "A"),
        ]);
        assert_eq!(doc.variable_keys(), vec!["b", "a"]);
    }
}

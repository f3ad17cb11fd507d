//! Core document types.

use std::fmt;
use std::ops::Range;

/// Paragraph-level type of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    Blockquote,
    UnorderedListItem,
    OrderedListItem,
    CodeBlock,
}

impl BlockType {
    pub const ALL: [Self; 11] = [
        Self::Unstyled,
        Self::HeaderOne,
        Self::HeaderTwo,
        Self::HeaderThree,
        Self::HeaderFour,
        Self::HeaderFive,
        Self::HeaderSix,
        Self::Blockquote,
        Self::UnorderedListItem,
        Self::OrderedListItem,
        Self::CodeBlock,
    ];

    /// Wire name, e.g. `header-one`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unstyled => "unstyled",
            Self::HeaderOne => "header-one",
            Self::HeaderTwo => "header-two",
            Self::HeaderThree => "header-three",
            Self::HeaderFour => "header-four",
            Self::HeaderFive => "header-five",
            Self::HeaderSix => "header-six",
            Self::Blockquote => "blockquote",
            Self::UnorderedListItem => "unordered-list-item",
            Self::OrderedListItem => "ordered-list-item",
            Self::CodeBlock => "code-block",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Heading level (1-6), or `None` for non-heading blocks.
    pub const fn heading_level(self) -> Option<u8> {
        match self {
            Self::HeaderOne => Some(1),
            Self::HeaderTwo => Some(2),
            Self::HeaderThree => Some(3),
            Self::HeaderFour => Some(4),
            Self::HeaderFive => Some(5),
            Self::HeaderSix => Some(6),
            _ => None,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named inline visual attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Code,
    Strikethrough,
    Red,
}

impl InlineStyle {
    pub const ALL: [Self; 6] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Code,
        Self::Strikethrough,
        Self::Red,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "BOLD",
            Self::Italic => "ITALIC",
            Self::Underline => "UNDERLINE",
            Self::Code => "CODE",
            Self::Strikethrough => "STRIKETHROUGH",
            Self::Red => "RED",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of inline styles applied to one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleSet(u8);

impl StyleSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, style: InlineStyle) -> bool {
        self.0 & style.bit() != 0
    }

    #[must_use]
    pub const fn with(self, style: InlineStyle) -> Self {
        Self(self.0 | style.bit())
    }

    #[must_use]
    pub const fn without(self, style: InlineStyle) -> Self {
        Self(self.0 & !style.bit())
    }

    #[must_use]
    pub const fn toggled(self, style: InlineStyle) -> Self {
        Self(self.0 ^ style.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = InlineStyle> {
        InlineStyle::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<InlineStyle> for StyleSet {
    fn from_iter<I: IntoIterator<Item = InlineStyle>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// A styled sub-range of a block's text. Offsets count chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: InlineStyle,
}

/// A paragraph-level unit of rich text.
///
/// Styles are tracked per character; `styles.len()` always equals the
/// number of chars in `text`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    block_type: BlockType,
    text: String,
    styles: Vec<StyleSet>,
}

impl Block {
    /// Create an unstyled-text block of the given type.
    pub fn new(block_type: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        let styles = vec![StyleSet::empty(); text.chars().count()];
        Self {
            block_type,
            text,
            styles,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder-style: apply `style` over a char range, clamped to the text.
    #[must_use]
    pub fn with_style(mut self, range: Range<usize>, style: InlineStyle) -> Self {
        self.set_style(range, style, true);
        self
    }

    pub const fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub const fn set_block_type(&mut self, block_type: BlockType) {
        self.block_type = block_type;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub const fn len(&self) -> usize {
        self.styles.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style of the char at `offset`, or empty past the end.
    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.styles.get(offset).copied().unwrap_or_default()
    }

    pub fn styles(&self) -> &[StyleSet] {
        &self.styles
    }

    /// Text of the chars in `range`.
    pub fn slice(&self, range: Range<usize>) -> &str {
        let start = byte_offset(&self.text, range.start);
        let end = byte_offset(&self.text, range.end.max(range.start));
        &self.text[start..end]
    }

    /// Canonical range view of the inline styles: ordered by style, then
    /// offset, with adjacent runs merged.
    pub fn style_ranges(&self) -> Vec<StyleRange> {
        let mut ranges = Vec::new();
        for style in InlineStyle::ALL {
            let mut run_start = None;
            for (idx, set) in self.styles.iter().enumerate() {
                match (set.contains(style), run_start) {
                    (true, None) => run_start = Some(idx),
                    (false, Some(start)) => {
                        ranges.push(StyleRange {
                            offset: start,
                            length: idx - start,
                            style,
                        });
                        run_start = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = run_start {
                ranges.push(StyleRange {
                    offset: start,
                    length: self.styles.len() - start,
                    style,
                });
            }
        }
        ranges
    }

    /// Add or remove `style` over a char range, clamped to the text.
    pub fn set_style(&mut self, range: Range<usize>, style: InlineStyle, on: bool) {
        let end = range.end.min(self.styles.len());
        let start = range.start.min(end);
        for set in &mut self.styles[start..end] {
            *set = if on { set.with(style) } else { set.without(style) };
        }
    }

    /// Insert `text` at a char offset with a uniform style.
    pub fn insert(&mut self, offset: usize, text: &str, style: StyleSet) {
        let offset = offset.min(self.styles.len());
        let at = byte_offset(&self.text, offset);
        self.text.insert_str(at, text);
        let added = text.chars().count();
        self.styles
            .splice(offset..offset, std::iter::repeat_n(style, added));
    }

    /// Remove the chars in `range`, clamped to the text.
    pub fn remove(&mut self, range: Range<usize>) {
        let end = range.end.min(self.styles.len());
        let start = range.start.min(end);
        if start == end {
            return;
        }
        let start_byte = byte_offset(&self.text, start);
        let end_byte = byte_offset(&self.text, end);
        self.text.replace_range(start_byte..end_byte, "");
        self.styles.drain(start..end);
    }

    /// Split at a char offset, returning the tail as a new block.
    ///
    /// Splitting a heading at its end starts an unstyled block; every
    /// other split keeps the block type.
    pub fn split_off(&mut self, offset: usize) -> Self {
        let offset = offset.min(self.styles.len());
        let at = byte_offset(&self.text, offset);
        let tail_text = self.text.split_off(at);
        let tail_styles = self.styles.split_off(offset);
        let block_type = if self.block_type.heading_level().is_some() && tail_text.is_empty() {
            BlockType::Unstyled
        } else {
            self.block_type
        };
        Self {
            block_type,
            text: tail_text,
            styles: tail_styles,
        }
    }

    /// Append another block's content, keeping this block's type.
    pub fn append(&mut self, other: Self) {
        self.text.push_str(&other.text);
        self.styles.extend(other.styles);
    }
}

/// An ordered sequence of blocks.
///
/// A document is never empty: the "empty document" holds one empty
/// unstyled block so there is always somewhere to put the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::empty()],
        }
    }

    /// Build a document from blocks, falling back to the empty document.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            Self::empty()
        } else {
            Self { blocks }
        }
    }

    /// Concatenate the blocks of every document in order.
    pub fn concat(documents: impl IntoIterator<Item = Self>) -> Self {
        Self::from_blocks(documents.into_iter().flat_map(|d| d.blocks).collect())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) const fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn block(&self, idx: usize) -> Option<&Block> {
        self.blocks.get(idx)
    }

    pub const fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Whether any block has non-empty text.
    pub fn has_text(&self) -> bool {
        self.blocks.iter().any(|b| !b.is_empty())
    }

    /// Block texts joined by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

/// Byte index of the char at `char_offset`, or `text.len()` past the end.
fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(idx, _)| idx)
}

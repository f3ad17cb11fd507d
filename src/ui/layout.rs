//! Soft-wrapping of blocks into terminal rows.

use std::ops::Range;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::document::{Block, BlockType, Document};
use crate::editor::BlockPos;

use super::DOCUMENT_LEFT_PADDING;

/// Placement of one block in the body area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLayout {
    /// Decoration drawn before the first row (`• `, `3. `, `│ `)
    pub prefix: String,
    /// Drawn before each wrapped continuation row
    pub continuation: String,
    /// Index of the block's first row in the document
    pub first_row: usize,
    /// Char ranges of each wrapped row. Never empty.
    pub rows: Vec<Range<usize>>,
}

impl BlockLayout {
    fn prefix_width(&self) -> u16 {
        u16::try_from(self.prefix.width()).unwrap_or(u16::MAX)
    }

    /// Row inside this block and display column (relative to the text
    /// start) of the caret at `offset`.
    fn locate(&self, block: &Block, offset: usize) -> (usize, u16) {
        let row = self
            .rows
            .iter()
            .rposition(|range| range.start <= offset)
            .unwrap_or(0);
        let start = self.rows[row].start;
        let width: usize = block
            .text()
            .chars()
            .skip(start)
            .take(offset.saturating_sub(start))
            .map(char_width)
            .sum();
        (row, u16::try_from(width).unwrap_or(u16::MAX))
    }
}

/// The whole document wrapped to a terminal width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    blocks: Vec<BlockLayout>,
    total_rows: usize,
}

impl DocumentLayout {
    pub fn new(document: &Document, width: u16) -> Self {
        let mut blocks = Vec::with_capacity(document.block_count());
        let mut next_row = 0;
        let mut ordinal = 0usize;
        for block in document.blocks() {
            let block_type = block.block_type();
            ordinal = if block_type == BlockType::OrderedListItem {
                ordinal + 1
            } else {
                0
            };
            let prefix = block_prefix(block_type, ordinal);
            let continuation = if block_type == BlockType::Blockquote {
                prefix.clone()
            } else {
                " ".repeat(prefix.width())
            };
            let avail = usize::from(width)
                .saturating_sub(usize::from(DOCUMENT_LEFT_PADDING) + prefix.width())
                .max(1);
            let rows = wrap_chars(block.text(), avail);
            let first_row = next_row;
            next_row += rows.len();
            blocks.push(BlockLayout {
                prefix,
                continuation,
                first_row,
                rows,
            });
        }
        Self {
            blocks,
            total_rows: next_row,
        }
    }

    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn blocks(&self) -> &[BlockLayout] {
        &self.blocks
    }

    /// Map a document row to `(block index, row within block)`.
    pub fn row(&self, row: usize) -> Option<(usize, usize)> {
        if row >= self.total_rows {
            return None;
        }
        let idx = self
            .blocks
            .partition_point(|layout| layout.first_row <= row)
            .checked_sub(1)?;
        Some((idx, row - self.blocks[idx].first_row))
    }

    /// Absolute row and body-relative column of a caret position.
    pub fn caret_position(&self, document: &Document, pos: BlockPos) -> (usize, u16) {
        let (Some(layout), Some(block)) = (self.blocks.get(pos.block), document.block(pos.block))
        else {
            return (0, DOCUMENT_LEFT_PADDING);
        };
        let (row, col) = layout.locate(block, pos.offset);
        (
            layout.first_row + row,
            DOCUMENT_LEFT_PADDING
                .saturating_add(layout.prefix_width())
                .saturating_add(col),
        )
    }
}

/// Decoration shown before a block's text.
pub fn block_prefix(block_type: BlockType, ordinal: usize) -> String {
    match block_type {
        BlockType::Blockquote => "\u{2502} ".to_string(),
        BlockType::UnorderedListItem => "\u{2022} ".to_string(),
        BlockType::OrderedListItem => format!("{ordinal}. "),
        _ => String::new(),
    }
}

/// Greedy char wrap of `text` into rows at most `width` columns wide.
fn wrap_chars(text: &str, width: usize) -> Vec<Range<usize>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut used = 0;
    for (idx, c) in text.chars().enumerate() {
        let w = char_width(c);
        if used + w > width && idx > start {
            rows.push(start..idx);
            start = idx;
            used = 0;
        }
        used += w;
    }
    rows.push(start..text.chars().count());
    rows
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_one_row() {
        assert_eq!(wrap_chars("", 10), vec![0..0]);
    }

    #[test]
    fn test_wrap_chars_splits_at_width() {
        assert_eq!(wrap_chars("abcdefg", 3), vec![0..3, 3..6, 6..7]);
    }

    #[test]
    fn test_wide_chars_count_double() {
        assert_eq!(wrap_chars("日本語", 4), vec![0..2, 2..3]);
    }

    #[test]
    fn test_ordered_items_are_numbered_in_runs() {
        let doc = Document::from_blocks(vec![
            Block::new(BlockType::OrderedListItem, "a"),
            Block::new(BlockType::OrderedListItem, "b"),
            Block::new(BlockType::Unstyled, "c"),
            Block::new(BlockType::OrderedListItem, "d"),
        ]);
        let layout = DocumentLayout::new(&doc, 40);
        let prefixes: Vec<&str> = layout.blocks().iter().map(|b| b.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["1. ", "2. ", "", "1. "]);
    }

    #[test]
    fn test_row_lookup_crosses_wrapped_blocks() {
        let doc = Document::from_blocks(vec![
            Block::new(BlockType::Unstyled, "abcdefgh"),
            Block::new(BlockType::Unstyled, "x"),
        ]);
        // 2 columns of padding leave 4 for text
        let layout = DocumentLayout::new(&doc, 6);
        assert_eq!(layout.total_rows(), 3);
        assert_eq!(layout.row(1), Some((0, 1)));
        assert_eq!(layout.row(2), Some((1, 0)));
        assert_eq!(layout.row(3), None);
    }

    #[test]
    fn test_caret_position_includes_padding_and_prefix() {
        let doc = Document::from_blocks(vec![
            Block::new(BlockType::Unstyled, "title"),
            Block::new(BlockType::UnorderedListItem, "item"),
        ]);
        let layout = DocumentLayout::new(&doc, 40);
        assert_eq!(layout.caret_position(&doc, BlockPos::new(0, 3)), (0, 5));
        assert_eq!(layout.caret_position(&doc, BlockPos::new(1, 4)), (1, 8));
    }

    #[test]
    fn test_caret_at_wrap_point_moves_to_next_row() {
        let doc = Document::from_blocks(vec![Block::new(BlockType::Unstyled, "abcdefgh")]);
        let layout = DocumentLayout::new(&doc, 6);
        assert_eq!(layout.caret_position(&doc, BlockPos::new(0, 4)), (1, 2));
        assert_eq!(layout.caret_position(&doc, BlockPos::new(0, 8)), (1, 6));
    }
}

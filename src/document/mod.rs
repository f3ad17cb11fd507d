//! Rich-text document model.
//!
//! This module handles:
//! - Blocks with a paragraph-level type and per-char inline styles
//! - The raw JSON-compatible form used by the archive

mod raw;
mod types;

pub use raw::{
    RawBlock, RawDocument, RawError, RawStyleRange, blocks_from_raw, convert_from_raw,
    convert_to_raw,
};
pub use types::{Block, BlockType, Document, InlineStyle, StyleRange, StyleSet};

/// Render a document as plain text, one block per line with a type marker.
///
/// Used by `--dump` to print the archive without a terminal UI.
pub fn to_marked_text(document: &Document) -> String {
    let mut out = String::new();
    let mut ordinal = 0usize;
    for block in document.blocks() {
        let block_type = block.block_type();
        ordinal = if block_type == BlockType::OrderedListItem {
            ordinal + 1
        } else {
            0
        };
        let marker = match block_type {
            BlockType::Unstyled => String::new(),
            BlockType::Blockquote => "> ".to_string(),
            BlockType::UnorderedListItem => "- ".to_string(),
            BlockType::OrderedListItem => format!("{ordinal}. "),
            BlockType::CodeBlock => "    ".to_string(),
            heading => heading
                .heading_level()
                .map(|level| format!("{} ", "#".repeat(usize::from(level))))
                .unwrap_or_default(),
        };
        out.push_str(&marker);
        out.push_str(block.text());
        out.push('\n');
    }
    out
}

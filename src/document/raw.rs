//! Raw (JSON-compatible) document form used for persistence.
//!
//! The layout mirrors the usual rich-text editor "raw content" shape so an
//! archive stays readable by other tools:
//!
//! ```json
//! { "blocks": [ { "key": "b0000", "text": "Title", "type": "header-one",
//!                 "depth": 0,
//!                 "inlineStyleRanges": [ { "offset": 0, "length": 5, "style": "BOLD" } ],
//!                 "entityRanges": [], "data": {} } ],
//!   "entityMap": {} }
//! ```
//!
//! Entities are not modelled; their fields are written empty and ignored
//! on read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{Block, BlockType, Document, InlineStyle};

/// A document in raw form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub entity_map: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    #[serde(default)]
    pub key: String,
    pub text: String,
    #[serde(rename = "type", default = "default_block_type")]
    pub block_type: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<Value>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

fn default_block_type() -> String {
    BlockType::Unstyled.as_str().to_string()
}

/// Raw content that does not describe a valid document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RawError {
    #[error("unknown block type `{0}`")]
    UnknownBlockType(String),
    #[error("unknown inline style `{0}`")]
    UnknownStyle(String),
    #[error("style range {offset}+{length} exceeds block {block} of length {len}")]
    RangeOutOfBounds {
        block: usize,
        offset: usize,
        length: usize,
        len: usize,
    },
}

/// Serialize a document into raw form.
pub fn convert_to_raw(document: &Document) -> RawDocument {
    let blocks = document
        .blocks()
        .iter()
        .enumerate()
        .map(|(idx, block)| RawBlock {
            key: format!("b{idx:04x}"),
            text: block.text().to_string(),
            block_type: block.block_type().as_str().to_string(),
            depth: 0,
            inline_style_ranges: block
                .style_ranges()
                .into_iter()
                .map(|r| RawStyleRange {
                    offset: r.offset,
                    length: r.length,
                    style: r.style.as_str().to_string(),
                })
                .collect(),
            entity_ranges: Vec::new(),
            data: Map::new(),
        })
        .collect();
    RawDocument {
        blocks,
        entity_map: Map::new(),
    }
}

/// Validate raw content and build its blocks, in order.
///
/// # Errors
///
/// Returns [`RawError`] for unknown block types or style names and for
/// style ranges that reach past the end of their block.
pub fn blocks_from_raw(raw: &RawDocument) -> Result<Vec<Block>, RawError> {
    raw.blocks
        .iter()
        .enumerate()
        .map(|(idx, raw_block)| {
            let block_type = BlockType::from_name(&raw_block.block_type)
                .ok_or_else(|| RawError::UnknownBlockType(raw_block.block_type.clone()))?;
            let mut block = Block::new(block_type, raw_block.text.as_str());
            for range in &raw_block.inline_style_ranges {
                let style = InlineStyle::from_name(&range.style)
                    .ok_or_else(|| RawError::UnknownStyle(range.style.clone()))?;
                let end = range.offset.checked_add(range.length);
                if end.is_none_or(|end| end > block.len()) {
                    return Err(RawError::RangeOutOfBounds {
                        block: idx,
                        offset: range.offset,
                        length: range.length,
                        len: block.len(),
                    });
                }
                block.set_style(range.offset..range.offset + range.length, style, true);
            }
            Ok(block)
        })
        .collect()
}

/// Deserialize raw content into a document.
///
/// # Errors
///
/// See [`blocks_from_raw`].
pub fn convert_from_raw(raw: &RawDocument) -> Result<Document, RawError> {
    blocks_from_raw(raw).map(Document::from_blocks)
}

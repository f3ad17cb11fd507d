use crate::document::{Block, BlockType, Document, InlineStyle, StyleSet};

use super::selection::{BlockPos, Motion, Selection};

/// Maximum number of undo snapshots kept.
const MAX_UNDO: usize = 200;

/// Kind of edit, used to coalesce undo entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    InsertCharacters,
    RemoveRange,
    SplitBlock,
    BackspaceCharacter,
    DeleteCharacter,
    ChangeBlockType,
    ChangeInlineStyle,
}

#[derive(Debug, Clone)]
struct Snapshot {
    document: Document,
    selection: Selection,
}

/// The live editing surface: document, selection, pending inline style,
/// and undo/redo history.
///
/// All mutations keep the selection inside the document bounds.
#[derive(Debug, Clone)]
pub struct EditorState {
    document: Document,
    selection: Selection,
    style_override: Option<StyleSet>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    last_change: Option<ChangeType>,
    batching: bool,
}

impl EditorState {
    /// An empty document with the caret at its start.
    pub fn new() -> Self {
        Self::with_document(Document::empty())
    }

    /// Wrap an existing document with fresh history; the caret starts at
    /// the beginning of the first block.
    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            selection: Selection::default(),
            style_override: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            last_change: None,
            batching: false,
        }
    }

    /// Replace everything with an empty document and empty history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Style applied to the next insertion, if one was toggled at a
    /// collapsed caret.
    pub const fn style_override(&self) -> Option<StyleSet> {
        self.style_override
    }

    pub const fn caret(&self) -> BlockPos {
        self.selection.focus
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The block holding the caret.
    pub fn current_block(&self) -> &Block {
        &self.document.blocks()[self.caret().block]
    }

    /// Text of the caret block from its start up to the caret.
    pub fn text_before_caret(&self) -> &str {
        self.current_block().slice(0..self.caret().offset)
    }

    /// Move the selection, clamping it to the document.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Selection {
            anchor: self.clamp(selection.anchor),
            focus: self.clamp(selection.focus),
        };
        self.style_override = None;
    }

    /// Style that the next typed character would get.
    ///
    /// At a collapsed caret this is the style of the char before it; at
    /// offset 0 the first char of the block, or failing that the last char
    /// of the nearest non-empty previous block.
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(style) = self.style_override {
            return style;
        }
        let start = self.selection.start();
        let block = &self.document.blocks()[start.block];
        if !self.selection.is_collapsed() {
            return block.style_at(start.offset);
        }
        if start.offset > 0 {
            return block.style_at(start.offset - 1);
        }
        if !block.is_empty() {
            return block.style_at(0);
        }
        self.document.blocks()[..start.block]
            .iter()
            .rev()
            .find(|b| !b.is_empty())
            .map(|b| b.style_at(b.len() - 1))
            .unwrap_or_default()
    }

    // --- Edits ---

    /// Insert text at the caret, replacing any selected range. `\n` splits
    /// the block.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.selection.is_collapsed() {
            self.last_change = None;
        }
        let style = self.current_inline_style();
        self.begin(ChangeType::InsertCharacters);
        self.remove_selected();
        self.style_override = None;

        for (idx, piece) in text.split('\n').enumerate() {
            if idx > 0 {
                self.split_at_caret();
            }
            let caret = self.caret();
            self.document.blocks_mut()[caret.block].insert(caret.offset, piece, style);
            self.collapse_to(BlockPos::new(
                caret.block,
                caret.offset + piece.chars().count(),
            ));
        }
    }

    /// Split the caret block in two, replacing any selected range.
    pub fn split_block(&mut self) {
        self.begin(ChangeType::SplitBlock);
        self.remove_selected();
        self.split_at_caret();
        self.style_override = None;
    }

    /// Remove the chars between `start` and `end` (in either order) and
    /// collapse the caret at the earlier position.
    pub fn remove_range(&mut self, start: BlockPos, end: BlockPos) {
        let (start, end) = (self.clamp(start.min(end)), self.clamp(start.max(end)));
        self.begin(ChangeType::RemoveRange);
        self.remove_between(start, end);
        self.collapse_to(start);
    }

    /// Delete backward (Backspace). Returns `false` when nothing changed.
    ///
    /// At the start of a styled block the block type is reset to unstyled
    /// instead of joining with the previous block.
    pub fn backspace(&mut self) -> bool {
        if self.remove_selection_if_any() {
            return true;
        }
        let caret = self.caret();
        if caret.offset == 0 {
            if self.current_block().block_type() != BlockType::Unstyled {
                self.begin(ChangeType::ChangeBlockType);
                self.document.blocks_mut()[caret.block].set_block_type(BlockType::Unstyled);
                return true;
            }
            if caret.block == 0 {
                return false;
            }
            self.begin(ChangeType::BackspaceCharacter);
            let prev_len = self.document.blocks()[caret.block - 1].len();
            let blocks = self.document.blocks_mut();
            let removed = blocks.remove(caret.block);
            blocks[caret.block - 1].append(removed);
            self.collapse_to(BlockPos::new(caret.block - 1, prev_len));
            return true;
        }
        self.begin(ChangeType::BackspaceCharacter);
        self.document.blocks_mut()[caret.block].remove(caret.offset - 1..caret.offset);
        self.collapse_to(BlockPos::new(caret.block, caret.offset - 1));
        true
    }

    /// Delete forward (Delete). Returns `false` when nothing changed.
    pub fn delete(&mut self) -> bool {
        if self.remove_selection_if_any() {
            return true;
        }
        let caret = self.caret();
        let block_len = self.current_block().len();
        if caret.offset >= block_len {
            if caret.block + 1 >= self.document.block_count() {
                return false;
            }
            self.begin(ChangeType::DeleteCharacter);
            let blocks = self.document.blocks_mut();
            let next = blocks.remove(caret.block + 1);
            blocks[caret.block].append(next);
            return true;
        }
        self.begin(ChangeType::DeleteCharacter);
        self.document.blocks_mut()[caret.block].remove(caret.offset..caret.offset + 1);
        true
    }

    /// Delete back to the previous word boundary.
    pub fn backspace_word(&mut self) -> bool {
        let caret = self.caret();
        if !self.selection.is_collapsed() || caret.offset == 0 {
            return self.backspace();
        }
        let start = prev_word_boundary(self.current_block().text(), caret.offset);
        self.remove_range(BlockPos::new(caret.block, start), caret);
        true
    }

    /// Delete forward to the next word boundary.
    pub fn delete_word(&mut self) -> bool {
        let caret = self.caret();
        if !self.selection.is_collapsed() || caret.offset >= self.current_block().len() {
            return self.delete();
        }
        let end = next_word_boundary(self.current_block().text(), caret.offset);
        self.remove_range(caret, BlockPos::new(caret.block, end));
        true
    }

    /// Delete from the start of the block to the caret.
    pub fn backspace_to_start_of_line(&mut self) -> bool {
        let caret = self.caret();
        if !self.selection.is_collapsed() || caret.offset == 0 {
            return self.backspace();
        }
        self.remove_range(BlockPos::new(caret.block, 0), caret);
        true
    }

    /// Toggle the type of every block touched by the selection. If the
    /// first one already has `block_type`, all revert to unstyled.
    pub fn toggle_block_type(&mut self, block_type: BlockType) {
        let (start, end) = (self.selection.start(), self.selection.end());
        let target = if self.document.blocks()[start.block].block_type() == block_type {
            BlockType::Unstyled
        } else {
            block_type
        };
        self.begin(ChangeType::ChangeBlockType);
        for block in &mut self.document.blocks_mut()[start.block..=end.block] {
            block.set_block_type(target);
        }
    }

    /// Toggle an inline style.
    ///
    /// At a collapsed caret this only changes the pending style for the
    /// next insertion. Over a range, the style is removed when the range's
    /// first char already carries it and added otherwise.
    pub fn toggle_inline_style(&mut self, style: InlineStyle) {
        let current = self.current_inline_style();
        if self.selection.is_collapsed() {
            self.style_override = Some(current.toggled(style));
            return;
        }
        let on = !current.contains(style);
        let (start, end) = (self.selection.start(), self.selection.end());
        self.begin(ChangeType::ChangeInlineStyle);
        for (idx, block) in self.document.blocks_mut()[start.block..=end.block]
            .iter_mut()
            .enumerate()
        {
            let block_idx = start.block + idx;
            let from = if block_idx == start.block { start.offset } else { 0 };
            let to = if block_idx == end.block {
                end.offset
            } else {
                block.len()
            };
            block.set_style(from..to, style, on);
        }
    }

    /// Run several edits as one undo step.
    pub fn transact<R>(&mut self, edits: impl FnOnce(&mut Self) -> R) -> R {
        self.push_undo();
        self.last_change = None;
        self.batching = true;
        let out = edits(self);
        self.batching = false;
        out
    }

    /// Restore the previous snapshot. Returns `false` with no history.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.take_snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Re-apply the most recently undone change.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.take_snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    // --- Caret movement ---

    /// Move the caret, collapsing any selection.
    pub fn move_caret(&mut self, motion: Motion) {
        let target = if self.selection.is_collapsed() {
            self.moved(self.caret(), motion)
        } else {
            match motion {
                Motion::Left => self.selection.start(),
                Motion::Right => self.selection.end(),
                _ => self.moved(self.caret(), motion),
            }
        };
        self.collapse_to(target);
        self.style_override = None;
        self.last_change = None;
    }

    /// Move only the focus, growing or shrinking the selection.
    pub fn extend_selection(&mut self, motion: Motion) {
        self.selection.focus = self.moved(self.caret(), motion);
        self.style_override = None;
        self.last_change = None;
    }

    pub fn select_all(&mut self) {
        let last = self.document.block_count() - 1;
        let len = self.document.blocks()[last].len();
        self.set_selection(Selection {
            anchor: BlockPos::new(0, 0),
            focus: BlockPos::new(last, len),
        });
    }

    // --- Private helpers ---

    fn begin(&mut self, change: ChangeType) {
        let coalesce = change == ChangeType::InsertCharacters
            && self.last_change == Some(ChangeType::InsertCharacters);
        if !coalesce && !self.batching {
            self.push_undo();
        }
        self.last_change = Some(change);
    }

    fn push_undo(&mut self) {
        let snapshot = self.take_snapshot();
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    fn take_snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            selection: self.selection,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.document = snapshot.document;
        self.selection = snapshot.selection;
        self.style_override = None;
        self.last_change = None;
    }

    const fn collapse_to(&mut self, pos: BlockPos) {
        self.selection = Selection::collapsed(pos);
    }

    fn clamp(&self, pos: BlockPos) -> BlockPos {
        let block = pos.block.min(self.document.block_count() - 1);
        let offset = pos.offset.min(self.document.blocks()[block].len());
        BlockPos::new(block, offset)
    }

    fn remove_selection_if_any(&mut self) -> bool {
        if self.selection.is_collapsed() {
            return false;
        }
        self.remove_range(self.selection.start(), self.selection.end());
        true
    }

    /// Remove the selected range without recording history.
    fn remove_selected(&mut self) {
        if self.selection.is_collapsed() {
            return;
        }
        let start = self.selection.start();
        self.remove_between(start, self.selection.end());
        self.collapse_to(start);
    }

    fn remove_between(&mut self, start: BlockPos, end: BlockPos) {
        let blocks = self.document.blocks_mut();
        if start.block == end.block {
            blocks[start.block].remove(start.offset..end.offset);
            return;
        }
        let tail = blocks[end.block].split_off(end.offset);
        blocks.drain(start.block + 1..=end.block);
        blocks[start.block].remove(start.offset..usize::MAX);
        blocks[start.block].append(tail);
    }

    fn split_at_caret(&mut self) {
        let caret = self.caret();
        let blocks = self.document.blocks_mut();
        let tail = blocks[caret.block].split_off(caret.offset);
        blocks.insert(caret.block + 1, tail);
        self.collapse_to(BlockPos::new(caret.block + 1, 0));
    }

    fn moved(&self, pos: BlockPos, motion: Motion) -> BlockPos {
        let blocks = self.document.blocks();
        let last = blocks.len() - 1;
        let len = blocks[pos.block].len();
        match motion {
            Motion::Left if pos.offset > 0 => BlockPos::new(pos.block, pos.offset - 1),
            Motion::Left if pos.block > 0 => {
                BlockPos::new(pos.block - 1, blocks[pos.block - 1].len())
            }
            Motion::Right if pos.offset < len => BlockPos::new(pos.block, pos.offset + 1),
            Motion::Right if pos.block < last => BlockPos::new(pos.block + 1, 0),
            Motion::Left | Motion::Right => pos,
            Motion::Up if pos.block > 0 => self.clamp(BlockPos::new(pos.block - 1, pos.offset)),
            Motion::Up => BlockPos::new(0, 0),
            Motion::Down if pos.block < last => {
                self.clamp(BlockPos::new(pos.block + 1, pos.offset))
            }
            Motion::Down => BlockPos::new(last, blocks[last].len()),
            Motion::WordLeft if pos.offset == 0 => self.moved(pos, Motion::Left),
            Motion::WordLeft => BlockPos::new(
                pos.block,
                prev_word_boundary(blocks[pos.block].text(), pos.offset),
            ),
            Motion::WordRight if pos.offset >= len => self.moved(pos, Motion::Right),
            Motion::WordRight => BlockPos::new(
                pos.block,
                next_word_boundary(blocks[pos.block].text(), pos.offset),
            ),
            Motion::LineStart => BlockPos::new(pos.block, 0),
            Motion::LineEnd => BlockPos::new(pos.block, len),
            Motion::DocStart => BlockPos::new(0, 0),
            Motion::DocEnd => BlockPos::new(last, blocks[last].len()),
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Char offset of the start of the word before `offset`.
fn prev_word_boundary(text: &str, offset: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut idx = offset.min(chars.len());
    while idx > 0 && chars[idx - 1].is_whitespace() {
        idx -= 1;
    }
    let word_end = idx;
    while idx > 0 && is_word_char(chars[idx - 1]) {
        idx -= 1;
    }
    if idx == word_end && idx > 0 {
        idx -= 1;
    }
    idx
}

/// Char offset of the end of the word after `offset`.
fn next_word_boundary(text: &str, offset: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut idx = offset.min(chars.len());
    while idx < chars.len() && chars[idx].is_whitespace() {
        idx += 1;
    }
    let word_start = idx;
    while idx < chars.len() && is_word_char(chars[idx]) {
        idx += 1;
    }
    if idx == word_start && idx < chars.len() {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> EditorState {
        let mut state = EditorState::new();
        state.insert_text(text);
        state
    }

    fn texts(state: &EditorState) -> Vec<&str> {
        state.document().blocks().iter().map(Block::text).collect()
    }

    // --- Insertion ---

    #[test]
    fn test_insert_text_advances_caret() {
        let state = typed("héllo");
        assert_eq!(state.caret(), BlockPos::new(0, 5));
        assert_eq!(state.text_before_caret(), "héllo");
    }

    #[test]
    fn test_insert_newline_splits_blocks() {
        let state = typed("one\ntwo\nthree");
        assert_eq!(texts(&state), vec!["one", "two", "three"]);
        assert_eq!(state.caret(), BlockPos::new(2, 5));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut state = typed("hello world");
        state.set_selection(Selection {
            anchor: BlockPos::new(0, 0),
            focus: BlockPos::new(0, 5),
        });
        state.insert_text("bye");
        assert_eq!(texts(&state), vec!["bye world"]);
        assert_eq!(state.caret(), BlockPos::new(0, 3));
    }

    #[test]
    fn test_split_block_in_middle() {
        let mut state = typed("abcd");
        state.move_caret(Motion::Left);
        state.move_caret(Motion::Left);
        state.split_block();
        assert_eq!(texts(&state), vec!["ab", "cd"]);
        assert_eq!(state.caret(), BlockPos::new(1, 0));
    }

    // --- Deletion ---

    #[test]
    fn test_backspace_joins_blocks() {
        let mut state = typed("ab\ncd");
        state.move_caret(Motion::LineStart);
        assert!(state.backspace());
        assert_eq!(texts(&state), vec!["abcd"]);
        assert_eq!(state.caret(), BlockPos::new(0, 2));
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let mut state = EditorState::new();
        assert!(!state.backspace());
        assert!(!state.can_undo());
    }

    #[test]
    fn test_backspace_at_styled_block_start_resets_type() {
        let mut state = EditorState::new();
        state.toggle_block_type(BlockType::HeaderOne);
        state.insert_text("Title");
        state.move_caret(Motion::LineStart);
        assert!(state.backspace());
        assert_eq!(state.current_block().block_type(), BlockType::Unstyled);
        assert_eq!(texts(&state), vec!["Title"]);
    }

    #[test]
    fn test_delete_at_block_end_joins_next() {
        let mut state = typed("ab\ncd");
        state.move_caret(Motion::DocStart);
        state.move_caret(Motion::LineEnd);
        assert!(state.delete());
        assert_eq!(texts(&state), vec!["abcd"]);
        assert!(!typed("x").delete());
    }

    #[test]
    fn test_remove_range_across_blocks() {
        let mut state = typed("alpha\nbeta\ngamma");
        state.remove_range(BlockPos::new(0, 2), BlockPos::new(2, 3));
        assert_eq!(texts(&state), vec!["alma"]);
        assert_eq!(state.caret(), BlockPos::new(0, 2));
    }

    #[test]
    fn test_backspace_word_and_to_line_start() {
        let mut state = typed("hello big world");
        assert!(state.backspace_word());
        assert_eq!(texts(&state), vec!["hello big "]);
        assert!(state.backspace_word());
        assert_eq!(texts(&state), vec!["hello "]);
        assert!(state.backspace_to_start_of_line());
        assert_eq!(texts(&state), vec![""]);
    }

    #[test]
    fn test_delete_word_forward() {
        let mut state = typed("one two");
        state.move_caret(Motion::LineStart);
        assert!(state.delete_word());
        assert_eq!(texts(&state), vec![" two"]);
    }

    // --- Styles ---

    #[test]
    fn test_toggle_inline_style_at_caret_styles_next_insert() {
        let mut state = EditorState::new();
        state.toggle_inline_style(InlineStyle::Bold);
        assert!(state.style_override().is_some());
        state.insert_text("ab");
        state.insert_text("c");
        let block = state.current_block();
        assert!(block.styles().iter().all(|s| s.contains(InlineStyle::Bold)));
        assert!(state.style_override().is_none());
    }

    #[test]
    fn test_toggle_inline_style_over_range() {
        let mut state = typed("hello");
        state.select_all();
        state.toggle_inline_style(InlineStyle::Underline);
        assert!(
            state
                .current_block()
                .styles()
                .iter()
                .all(|s| s.contains(InlineStyle::Underline))
        );
        state.toggle_inline_style(InlineStyle::Underline);
        assert!(state.current_block().styles().iter().all(|s| s.is_empty()));
    }

    #[test]
    fn test_current_style_looks_up_previous_block() {
        let mut state = EditorState::new();
        state.toggle_inline_style(InlineStyle::Red);
        state.insert_text("red\n");
        assert!(state.current_block().is_empty());
        assert!(state.current_inline_style().contains(InlineStyle::Red));
    }

    #[test]
    fn test_toggle_block_type_twice_reverts() {
        let mut state = typed("x");
        state.toggle_block_type(BlockType::Blockquote);
        assert_eq!(state.current_block().block_type(), BlockType::Blockquote);
        state.toggle_block_type(BlockType::Blockquote);
        assert_eq!(state.current_block().block_type(), BlockType::Unstyled);
    }

    // --- History ---

    #[test]
    fn test_typing_coalesces_into_one_undo_step() {
        let mut state = EditorState::new();
        for c in ["a", "b", "c"] {
            state.insert_text(c);
        }
        assert!(state.undo());
        assert_eq!(texts(&state), vec![""]);
        assert!(!state.undo());
        assert!(state.redo());
        assert_eq!(texts(&state), vec!["abc"]);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut state = typed("a");
        state.split_block();
        state.undo();
        assert!(state.can_redo());
        state.insert_text("b");
        assert!(!state.can_redo());
    }

    #[test]
    fn test_reset_clears_document_and_history() {
        let mut state = typed("text");
        state.reset();
        assert!(!state.document().has_text());
        assert!(!state.can_undo());
        assert_eq!(state.caret(), BlockPos::default());
    }

    // --- Movement ---

    #[test]
    fn test_vertical_motion_clamps_offset() {
        let mut state = typed("long line\nab");
        state.move_caret(Motion::Up);
        assert_eq!(state.caret(), BlockPos::new(0, 2));
        state.move_caret(Motion::LineEnd);
        state.move_caret(Motion::Down);
        assert_eq!(state.caret(), BlockPos::new(1, 2));
    }

    #[test]
    fn test_left_on_selection_collapses_to_start() {
        let mut state = typed("abc");
        state.extend_selection(Motion::Left);
        state.extend_selection(Motion::Left);
        assert!(!state.selection().is_collapsed());
        state.move_caret(Motion::Left);
        assert_eq!(state.caret(), BlockPos::new(0, 1));
        assert!(state.selection().is_collapsed());
    }

    #[test]
    fn test_word_motion() {
        let mut state = typed("foo bar");
        state.move_caret(Motion::WordLeft);
        assert_eq!(state.caret(), BlockPos::new(0, 4));
        state.move_caret(Motion::WordLeft);
        assert_eq!(state.caret(), BlockPos::new(0, 0));
        state.move_caret(Motion::WordRight);
        assert_eq!(state.caret(), BlockPos::new(0, 3));
    }
}

use super::*;
use crate::app::{Message, Model, update};
use crate::document::{Block, BlockType, Document, InlineStyle};
use crate::editor::{BlockPos, EditorState, Motion};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier};

fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).unwrap()
}

fn model_with(blocks: Vec<Block>, size: (u16, u16)) -> Model {
    Model::new(
        EditorState::with_document(Document::from_blocks(blocks)),
        size,
    )
}

fn draw(model: &Model, terminal: &mut Terminal<TestBackend>) -> Buffer {
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal.backend().buffer().clone()
}

fn row_text(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

/// Column of the first cell in row `y` whose symbol is `needle`.
fn find_col(buffer: &Buffer, y: u16, needle: &str) -> Option<u16> {
    (0..buffer.area.width).find(|&x| buffer[(x, y)].symbol() == needle)
}

#[test]
fn test_title_and_status_bars_frame_the_body() {
    let model = model_with(vec![Block::new(BlockType::Unstyled, "hello")], (60, 6));
    let mut terminal = create_test_terminal(60, 6);
    let buffer = draw(&model, &mut terminal);

    assert!(row_text(&buffer, 0).contains("blockpad"));
    assert_eq!(row_text(&buffer, 1).trim_end(), "  hello");
    assert!(row_text(&buffer, 5).contains("unstyled"));
}

#[test]
fn test_block_decorations_render_prefixes() {
    let model = model_with(
        vec![
            Block::new(BlockType::Blockquote, "quote"),
            Block::new(BlockType::UnorderedListItem, "bullet"),
            Block::new(BlockType::OrderedListItem, "first"),
            Block::new(BlockType::OrderedListItem, "second"),
        ],
        (40, 8),
    );
    let mut terminal = create_test_terminal(40, 8);
    let buffer = draw(&model, &mut terminal);

    assert_eq!(row_text(&buffer, 1).trim_end(), "  \u{2502} quote");
    assert_eq!(row_text(&buffer, 2).trim_end(), "  \u{2022} bullet");
    assert_eq!(row_text(&buffer, 3).trim_end(), "  1. first");
    assert_eq!(row_text(&buffer, 4).trim_end(), "  2. second");
}

#[test]
fn test_inline_styles_map_to_modifiers() {
    let block = Block::new(BlockType::Unstyled, "brs")
        .with_style(0..1, InlineStyle::Bold)
        .with_style(1..2, InlineStyle::Red)
        .with_style(2..3, InlineStyle::Strikethrough);
    let model = model_with(vec![block], (20, 4));
    let mut terminal = create_test_terminal(20, 4);
    let buffer = draw(&model, &mut terminal);

    let x = DOCUMENT_LEFT_PADDING;
    assert!(buffer[(x, 1)].modifier.contains(Modifier::BOLD));
    assert_eq!(buffer[(x + 1, 1)].fg, Color::Red);
    assert!(buffer[(x + 2, 1)].modifier.contains(Modifier::CROSSED_OUT));
}

#[test]
fn test_header_one_is_bold_and_underlined() {
    let model = model_with(vec![Block::new(BlockType::HeaderOne, "Top")], (20, 4));
    let mut terminal = create_test_terminal(20, 4);
    let buffer = draw(&model, &mut terminal);

    let cell = &buffer[(DOCUMENT_LEFT_PADDING, 1)];
    assert!(cell.modifier.contains(Modifier::BOLD));
    assert!(cell.modifier.contains(Modifier::UNDERLINED));
}

#[test]
fn test_selection_renders_reversed() {
    let model = model_with(vec![Block::new(BlockType::Unstyled, "abcd")], (20, 4));
    let model = update(model, Message::MoveCaret(Motion::LineStart));
    let model = update(model, Message::ExtendSelection(Motion::Right));
    let model = update(model, Message::ExtendSelection(Motion::Right));
    let mut terminal = create_test_terminal(20, 4);
    let buffer = draw(&model, &mut terminal);

    let y = 1;
    let a = find_col(&buffer, y, "a").unwrap();
    let c = find_col(&buffer, y, "c").unwrap();
    assert!(buffer[(a, y)].modifier.contains(Modifier::REVERSED));
    assert!(!buffer[(c, y)].modifier.contains(Modifier::REVERSED));
}

#[test]
fn test_long_block_wraps_onto_continuation_rows() {
    let model = model_with(
        vec![Block::new(BlockType::UnorderedListItem, "abcdefghij")],
        (10, 6),
    );
    let mut terminal = create_test_terminal(10, 6);
    let buffer = draw(&model, &mut terminal);

    // 2 padding + 2 prefix leave 6 columns of text
    assert_eq!(row_text(&buffer, 1).trim_end(), "  \u{2022} abcdef");
    assert_eq!(row_text(&buffer, 2).trim_end(), "    ghij");
}

#[test]
fn test_cursor_follows_caret() {
    let model = model_with(
        vec![
            Block::new(BlockType::Unstyled, "one"),
            Block::new(BlockType::UnorderedListItem, "two"),
        ],
        (20, 6),
    );
    let mut model = model;
    model.editor.set_selection(crate::editor::Selection::collapsed(BlockPos::new(1, 2)));
    let mut terminal = create_test_terminal(20, 6);
    draw(&model, &mut terminal);

    let cursor = terminal.get_cursor_position().unwrap();
    assert_eq!(cursor.x, DOCUMENT_LEFT_PADDING + 2 + 2);
    assert_eq!(cursor.y, 2);
}

#[test]
fn test_scrolled_body_starts_at_viewport_offset() {
    let blocks = (0..30)
        .map(|i| Block::new(BlockType::Unstyled, format!("line {i}")))
        .collect();
    let model = model_with(blocks, (20, 6));
    let model = update(model, Message::MoveCaret(Motion::DocEnd));
    let mut terminal = create_test_terminal(20, 6);
    let buffer = draw(&model, &mut terminal);

    // Body is 4 rows tall; the last 4 blocks are visible.
    assert_eq!(row_text(&buffer, 1).trim_end(), "  line 26");
    assert_eq!(row_text(&buffer, 4).trim_end(), "  line 29");
}

#[test]
fn test_help_overlay_lists_triggers() {
    let model = update(Model::default(), Message::ToggleHelp);
    let mut terminal = create_test_terminal(80, 40);
    let buffer = draw(&model, &mut terminal);
    let text: String = (0..buffer.area.height)
        .map(|y| row_text(&buffer, y))
        .collect::<Vec<_>>()
        .join("\n");

    assert!(text.contains("Help"));
    assert!(text.contains("header-one"));
    assert!(text.contains("UNDERLINE"));
}

#[test]
fn test_body_height_reserves_bars() {
    assert_eq!(body_height(24), 22);
    assert_eq!(body_height(1), 0);
}

use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::Model;
use crate::document::{Block, BlockType};
use crate::editor::{BlockPos, Selection};

use super::layout::{BlockLayout, DocumentLayout};
use super::style::{style_for_block_type, style_for_char, style_for_prefix};
use super::{DOCUMENT_LEFT_PADDING, overlays, status};

/// Split the screen into title bar, document body and status bar.
pub fn split_screen(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area)
}

/// Rows available to the document body for a terminal `height`.
pub const fn body_height(height: u16) -> u16 {
    height.saturating_sub(2)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let [title_area, body_area, status_area] = split_screen(area);

    status::render_title_bar(model, frame, title_area);
    render_document(model, frame, body_area);
    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, status_area);
    } else {
        status::render_status_bar(model, frame, status_area);
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_document(model: &Model, frame: &mut Frame, area: Rect) {
    let document = model.editor.document();
    let layout = DocumentLayout::new(document, area.width);
    let selection = model.editor.selection();

    let visible = model.viewport.visible_range();
    let mut lines: Vec<Line> = Vec::with_capacity(visible.len());
    for row in visible.clone() {
        let Some((block_idx, row_in_block)) = layout.row(row) else {
            break;
        };
        let (Some(block), Some(block_layout)) =
            (document.block(block_idx), layout.blocks().get(block_idx))
        else {
            break;
        };
        lines.push(render_row(
            block,
            block_idx,
            block_layout,
            row_in_block,
            selection,
        ));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines), area);

    if model.help_visible {
        return;
    }
    let (row, col) = layout.caret_position(document, model.editor.caret());
    if visible.contains(&row) {
        let y = area.y + u16::try_from(row - visible.start).unwrap_or(0);
        let x = area.x + col.min(area.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn render_row(
    block: &Block,
    block_idx: usize,
    layout: &BlockLayout,
    row_in_block: usize,
    selection: Selection,
) -> Line<'static> {
    let block_type = block.block_type();
    let mut spans = vec![Span::raw(" ".repeat(usize::from(DOCUMENT_LEFT_PADDING)))];
    let prefix = if row_in_block == 0 {
        &layout.prefix
    } else {
        &layout.continuation
    };
    if !prefix.is_empty() {
        spans.push(Span::styled(prefix.clone(), style_for_prefix(block_type)));
    }

    let range = layout.rows[row_in_block].clone();
    let (sel_start, sel_end) = (selection.start(), selection.end());
    let mut run = String::new();
    let mut run_style: Option<Style> = None;
    for (offset, c) in block
        .text()
        .chars()
        .enumerate()
        .skip(range.start)
        .take(range.len())
    {
        let pos = BlockPos::new(block_idx, offset);
        let selected = sel_start <= pos && pos < sel_end;
        let style = style_for_char(block_type, block.style_at(offset), selected);
        if run_style.is_some_and(|current| current != style) {
            spans.push(Span::styled(std::mem::take(&mut run), run_style.unwrap_or_default()));
        }
        run_style = Some(style);
        run.push(c);
    }
    if let Some(style) = run_style {
        spans.push(Span::styled(run, style));
    }

    let line = Line::from(spans);
    if block_type == BlockType::CodeBlock {
        line.style(style_for_block_type(block_type))
    } else {
        line
    }
}

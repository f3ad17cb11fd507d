use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::editor::{TRIGGERS, TriggerAction};

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut all_lines: Vec<Line> = Vec::new();

    all_lines.push(Line::styled("Document", section_style));
    all_lines.push(Line::raw("  Ctrl-s              Save and start a new document"));
    all_lines.push(Line::raw("  Ctrl-d              Delete all saved content"));
    all_lines.push(Line::raw(format!("  Storage key         {}", model.storage_key)));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Formatting", section_style));
    all_lines.push(Line::raw("  Ctrl-b              Bold"));
    all_lines.push(Line::raw("  Alt-i / Ctrl-i      Italic"));
    all_lines.push(Line::raw("  Ctrl-u / Ctrl-j     Underline / code"));
    all_lines.push(Line::raw("  Ctrl-t              Strikethrough"));
    all_lines.push(Line::raw("  Ctrl-z              Undo"));
    all_lines.push(Line::raw("  Ctrl-y              Redo"));
    all_lines.push(Line::raw(""));

    let heading = if model.triggers_enabled {
        "Triggers (type at block start, then Space)"
    } else {
        "Triggers (disabled)"
    };
    all_lines.push(Line::styled(heading, section_style));
    for trigger in &TRIGGERS {
        let effect = match trigger.action {
            TriggerAction::Block(block_type) => block_type.as_str(),
            TriggerAction::Inline(style) => style.as_str(),
        };
        all_lines.push(Line::raw(format!(
            "  {:<20}{effect}",
            trigger.literal_prefix
        )));
    }
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  Arrows, Home/End    Move caret"));
    all_lines.push(Line::raw("  Shift+movement      Extend selection"));
    all_lines.push(Line::raw("  Ctrl-a              Select all"));
    all_lines.push(Line::raw("  Ctrl-q              Quit"));
    all_lines.push(Line::raw("  F1                  Toggle help"));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    let visible: Vec<Line> = all_lines
        .into_iter()
        .take(content_height as usize)
        .collect();
    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    let footer = Line::styled("any key closes", dim_style);
    frame.render_widget(Paragraph::new(footer), footer_area);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}

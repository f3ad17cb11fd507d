use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::document::InlineStyle;

pub fn render_title_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let triggers = if model.triggers_enabled {
        ""
    } else {
        "  [triggers off]"
    };
    let title = format!(
        " blockpad{triggers}  Ctrl+S:save  Ctrl+D:delete all  F1:help  Ctrl+Q:quit"
    );
    let bar = Paragraph::new(title).style(
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(bar, area);
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let editor = &model.editor;
    let block_type = editor.current_block().block_type();
    let styles = editor
        .current_inline_style()
        .iter()
        .map(InlineStyle::as_str)
        .collect::<Vec<_>>();
    let styles = if styles.is_empty() {
        "-".to_string()
    } else {
        styles.join("+")
    };
    let caret = editor.caret();
    let saved = match model.archived_count {
        1 => "1 saved document".to_string(),
        n => format!("{n} saved documents"),
    };

    let status = format!(
        " {block_type}  [{styles}]  Block {}/{}, Col {}  {saved}",
        caret.block + 1,
        editor.document().block_count(),
        caret.offset + 1,
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some(message) = model.active_toast() else {
        return;
    };
    let toast = Paragraph::new(format!("[info] {message}"))
        .style(Style::default().bg(Color::Green).fg(Color::Black));
    frame.render_widget(toast, area);
}

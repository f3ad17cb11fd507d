//! Theming and color definitions.
//!
//! Maps block types and inline styles onto terminal styles. Uses ANSI colors
//! that adapt to the terminal's color palette.

use ratatui::style::{Color, Modifier, Style};

use crate::document::{BlockType, InlineStyle, StyleSet};

/// Style for the text of a block, before inline styles are applied.
pub fn style_for_block_type(block_type: BlockType) -> Style {
    match block_type {
        BlockType::HeaderOne => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        BlockType::HeaderTwo => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        BlockType::HeaderThree => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        BlockType::HeaderFour | BlockType::HeaderFive | BlockType::HeaderSix => {
            Style::default().add_modifier(Modifier::BOLD)
        }
        BlockType::Blockquote => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::ITALIC),
        BlockType::CodeBlock => Style::default().bg(Color::Indexed(236)),
        BlockType::Unstyled | BlockType::UnorderedListItem | BlockType::OrderedListItem => {
            Style::default()
        }
    }
}

/// Style for a block's decoration prefix.
pub fn style_for_prefix(block_type: BlockType) -> Style {
    match block_type {
        BlockType::Blockquote => Style::default().fg(Color::Blue),
        _ => Style::default().fg(Color::Yellow),
    }
}

/// Style for a single inline style.
pub fn style_for_inline(style: InlineStyle) -> Style {
    match style {
        InlineStyle::Bold => Style::default().add_modifier(Modifier::BOLD),
        InlineStyle::Italic => Style::default().add_modifier(Modifier::ITALIC),
        InlineStyle::Underline => Style::default().add_modifier(Modifier::UNDERLINED),
        InlineStyle::Code => Style::default().bg(Color::DarkGray),
        InlineStyle::Strikethrough => Style::default().add_modifier(Modifier::CROSSED_OUT),
        InlineStyle::Red => Style::default().fg(Color::Red),
    }
}

/// Combined style of a char: block base, then each inline style on top.
pub fn style_for_char(block_type: BlockType, styles: StyleSet, selected: bool) -> Style {
    let base = styles
        .iter()
        .fold(style_for_block_type(block_type), |acc, style| {
            acc.patch(style_for_inline(style))
        });
    if selected {
        base.add_modifier(Modifier::REVERSED)
    } else {
        base
    }
}

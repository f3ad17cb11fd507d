use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::editor::{KeyCommand, Motion};

/// Map a key event onto a named editor command.
///
/// Returns `None` for keys that are not bound to a command; those are
/// handled as movement, typing, or application actions.
pub fn key_binding(key: KeyEvent) -> Option<&'static str> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let command = match key.code {
        KeyCode::Char(c) if ctrl => match (c.to_ascii_lowercase(), shift) {
            ('b', false) => KeyCommand::Bold,
            ('i', false) => KeyCommand::Italic,
            ('u', false) => KeyCommand::Underline,
            ('j', false) => KeyCommand::Code,
            ('t', false) | ('x', true) => KeyCommand::Strikethrough,
            ('z', false) => KeyCommand::Undo,
            ('z', true) | ('y', _) => KeyCommand::Redo,
            ('w', _) => KeyCommand::BackspaceWord,
            _ => return None,
        },
        KeyCode::Char('i') if alt => KeyCommand::Italic,
        KeyCode::Backspace if ctrl && shift => KeyCommand::BackspaceToStartOfLine,
        KeyCode::Backspace if ctrl || alt => KeyCommand::BackspaceWord,
        KeyCode::Backspace => KeyCommand::Backspace,
        KeyCode::Delete if ctrl || alt => KeyCommand::DeleteWord,
        KeyCode::Delete => KeyCommand::Delete,
        KeyCode::Enter => KeyCommand::SplitBlock,
        _ => return None,
    };
    Some(command.name())
}

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Paste(text) if !model.help_visible => Some(Message::InsertText(text.clone())),
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        // Application
        match key.code {
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::Char('q' | 'c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('s') if ctrl => return Some(Message::Save),
            KeyCode::Char('d') if ctrl => return Some(Message::DeleteAll),
            KeyCode::Char('a') if ctrl => return Some(Message::SelectAll),
            _ => {}
        }

        if let Some(name) = key_binding(key) {
            return Some(Message::KeyCommand(name.to_string()));
        }

        if let Some(motion) = motion_for(key.code, ctrl) {
            return Some(if shift {
                Message::ExtendSelection(motion)
            } else {
                Message::MoveCaret(motion)
            });
        }

        match key.code {
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Message::InsertChar(c))
            }
            KeyCode::Tab => Some(Message::InsertChar('\t')),
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

const fn motion_for(code: KeyCode, ctrl: bool) -> Option<Motion> {
    Some(match code {
        KeyCode::Left if ctrl => Motion::WordLeft,
        KeyCode::Right if ctrl => Motion::WordRight,
        KeyCode::Left => Motion::Left,
        KeyCode::Right => Motion::Right,
        KeyCode::Up => Motion::Up,
        KeyCode::Down => Motion::Down,
        KeyCode::Home if ctrl => Motion::DocStart,
        KeyCode::End if ctrl => Motion::DocEnd,
        KeyCode::Home => Motion::LineStart,
        KeyCode::End => Motion::LineEnd,
        _ => return None,
    })
}

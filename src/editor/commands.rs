//! Named key commands and their dispatcher.

use crate::document::InlineStyle;

use super::EditorState;

/// Result of offering an event to an interception hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    /// The hook consumed the event and updated the editor state.
    Handled,
    /// The hook declined; the caller applies its default behavior.
    NotHandled,
}

impl EditorOutcome {
    pub const fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// The editor's built-in command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Bold,
    Italic,
    Underline,
    Code,
    Strikethrough,
    Undo,
    Redo,
    Backspace,
    BackspaceWord,
    BackspaceToStartOfLine,
    Delete,
    DeleteWord,
    SplitBlock,
}

impl KeyCommand {
    pub const ALL: [Self; 13] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Code,
        Self::Strikethrough,
        Self::Undo,
        Self::Redo,
        Self::Backspace,
        Self::BackspaceWord,
        Self::BackspaceToStartOfLine,
        Self::Delete,
        Self::DeleteWord,
        Self::SplitBlock,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Code => "code",
            Self::Strikethrough => "strikethrough",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Backspace => "backspace",
            Self::BackspaceWord => "backspace-word",
            Self::BackspaceToStartOfLine => "backspace-to-start-of-line",
            Self::Delete => "delete",
            Self::DeleteWord => "delete-word",
            Self::SplitBlock => "split-block",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Run the command. Returns `false` when it had nothing to do.
    pub fn apply(self, state: &mut EditorState) -> bool {
        let style = match self {
            Self::Bold => InlineStyle::Bold,
            Self::Italic => InlineStyle::Italic,
            Self::Underline => InlineStyle::Underline,
            Self::Code => InlineStyle::Code,
            Self::Strikethrough => InlineStyle::Strikethrough,
            Self::Undo => return state.undo(),
            Self::Redo => return state.redo(),
            Self::Backspace => return state.backspace(),
            Self::BackspaceWord => return state.backspace_word(),
            Self::BackspaceToStartOfLine => return state.backspace_to_start_of_line(),
            Self::Delete => return state.delete(),
            Self::DeleteWord => return state.delete_word(),
            Self::SplitBlock => {
                state.split_block();
                return true;
            }
        };
        state.toggle_inline_style(style);
        true
    }
}

/// Dispatch a named key command to the built-in command table.
///
/// Unknown names and commands that leave the state untouched report
/// [`EditorOutcome::NotHandled`].
pub fn on_key_command(name: &str, state: &mut EditorState) -> EditorOutcome {
    let Some(command) = KeyCommand::from_name(name) else {
        tracing::debug!(command = name, "unrecognized key command");
        return EditorOutcome::NotHandled;
    };
    if command.apply(state) {
        EditorOutcome::Handled
    } else {
        EditorOutcome::NotHandled
    }
}

use crate::app::Model;
use crate::editor::{Motion, on_before_insert, on_key_command};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Type a character at the caret
    InsertChar(char),
    /// Insert pasted text at the caret, bypassing the auto-format triggers
    InsertText(String),
    /// Run a named editor command (`bold`, `undo`, `split-block`, ...)
    KeyCommand(String),
    /// Move the caret, collapsing the selection
    MoveCaret(Motion),
    /// Move the selection focus
    ExtendSelection(Motion),
    /// Select the whole document
    SelectAll,

    // Document store
    /// Archive the current document and clear the editor
    Save,
    /// Erase the archive and clear the editor
    DeleteAll,

    // Application
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Terminal resized
    Resize(u16, u16),
    /// Quit the application
    Quit,
}

/// Apply a message to the model.
///
/// Store messages (`Save`, `DeleteAll`) are handled as side effects by the
/// event loop, which owns the store.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::InsertChar(c) => {
            let mut buf = [0u8; 4];
            insert(&mut model, c.encode_utf8(&mut buf));
        }
        Message::InsertText(text) => {
            let text = text.replace("\r\n", "\n").replace('\r', "\n");
            model.editor.insert_text(&text);
        }
        Message::KeyCommand(name) => {
            let outcome = on_key_command(&name, &mut model.editor);
            tracing::trace!(command = %name, ?outcome, "key command");
        }
        Message::MoveCaret(motion) => model.editor.move_caret(motion),
        Message::ExtendSelection(motion) => model.editor.extend_selection(motion),
        Message::SelectAll => model.editor.select_all(),
        Message::Save | Message::DeleteAll => {}
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,
        Message::Resize(width, height) => {
            model
                .viewport
                .resize(width, crate::ui::body_height(height));
        }
        Message::Quit => model.should_quit = true,
    }
    model.ensure_caret_visible();
    model
}

/// Offer `chars` to the trigger hook, inserting it when declined.
fn insert(model: &mut Model, chars: &str) {
    if model.triggers_enabled && on_before_insert(chars, &mut model.editor).is_handled() {
        return;
    }
    model.editor.insert_text(chars);
}

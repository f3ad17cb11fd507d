use std::time::{Duration, Instant};

use crate::editor::EditorState;
use crate::ui::layout::DocumentLayout;
use crate::ui::viewport::Viewport;

/// How long a toast stays in the status bar.
const TOAST_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The document store
/// is owned by [`App`](super::App) and only touched from side effects.
pub struct Model {
    /// The live editing surface
    pub editor: EditorState,
    /// Viewport over the wrapped document body
    pub viewport: Viewport,
    /// Whether auto-format triggers run before insertion
    pub triggers_enabled: bool,
    /// Documents currently in the archive, shown in the status bar
    pub archived_count: usize,
    /// Storage key shown in help
    pub storage_key: String,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("blocks", &self.editor.document().block_count())
            .field("caret", &self.editor.caret())
            .field("archived_count", &self.archived_count)
            .field("help_visible", &self.help_visible)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model around an editor, sized to the terminal.
    pub fn new(editor: EditorState, terminal_size: (u16, u16)) -> Self {
        let mut model = Self {
            editor,
            viewport: Viewport::new(terminal_size.0, crate::ui::body_height(terminal_size.1), 0),
            triggers_enabled: true,
            archived_count: 0,
            storage_key: String::new(),
            help_visible: false,
            should_quit: false,
            toast: None,
        };
        model.ensure_caret_visible();
        model
    }

    #[must_use]
    pub const fn with_triggers(mut self, enabled: bool) -> Self {
        self.triggers_enabled = enabled;
        self
    }

    #[must_use]
    pub const fn with_archived_count(mut self, count: usize) -> Self {
        self.archived_count = count;
        self
    }

    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Keep the viewport in sync with the wrapped document and the caret
    /// row on screen.
    pub fn ensure_caret_visible(&mut self) {
        let document = self.editor.document();
        let layout = DocumentLayout::new(document, self.viewport.width());
        let (caret_row, _) = layout.caret_position(document, self.editor.caret());
        self.viewport.set_total_lines(layout.total_rows());
        self.viewport.reveal(caret_row);
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    /// Drop the toast once it has expired. Returns `true` if one was removed.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<&str> {
        self.toast.as_ref().map(|toast| toast.message.as_str())
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(EditorState::new(), (80, 24))
    }
}

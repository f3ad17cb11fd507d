use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::supports_keyboard_enhancement;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::editor::EditorState;

impl App {
    /// Run the main event loop.
    ///
    /// The merged archive is loaded into the editor before the first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let document = self.store.load_all();
        tracing::debug!(
            blocks = document.block_count(),
            archived = self.store.archive_len(),
            "loaded archive"
        );

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; blockpad requires an interactive terminal")?;
        let size = terminal.size()?;
        execute!(stdout(), EnableBracketedPaste)?;
        // Ctrl+I and Ctrl+Shift+letter are only distinguishable under the
        // kitty keyboard protocol.
        let enhanced = supports_keyboard_enhancement().unwrap_or(false)
            && execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )
            .is_ok();
        tracing::debug!(enhanced, "keyboard enhancement");

        let mut model = Model::new(EditorState::with_document(document), (size.width, size.height))
            .with_triggers(self.triggers_enabled)
            .with_archived_count(self.store.archive_len())
            .with_storage_key(self.store.key());

        let result = self.event_loop(&mut terminal, &mut model);

        if enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        result
    }

    fn dispatch(&mut self, model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, &side_msg);
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| Self::view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            let poll_ms = if model.active_toast().is_some() { 100 } else { 250 };
            if event::poll(Duration::from_millis(poll_ms))? {
                if let Some(msg) = Self::handle_event(&event::read()?, model) {
                    tracing::trace!(?msg, "message");
                    self.dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts and pastes into a single render.
                while !model.should_quit && event::poll(Duration::from_millis(0))? {
                    if let Some(msg) = Self::handle_event(&event::read()?, model) {
                        self.dispatch(model, msg);
                        needs_render = true;
                    }
                }
            }
        }
        Ok(())
    }
}

use crate::app::{App, Message, Model};

pub(super) const SAVED_NOTICE: &str = "Content saved successfully!";
pub(super) const DELETED_NOTICE: &str = "All content deleted successfully!";

impl App {
    /// Run the store operations behind `msg` and report them to the user.
    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        match msg {
            Message::Save => {
                let report = self.store.save(&mut model.editor);
                if !report.persisted {
                    tracing::warn!(
                        archived = report.archived,
                        key = self.store.key(),
                        "save kept in memory only"
                    );
                }
                model.archived_count = report.archived;
                model.show_toast(SAVED_NOTICE);
            }
            Message::DeleteAll => {
                self.store.delete_all(&mut model.editor);
                model.archived_count = 0;
                model.show_toast(DELETED_NOTICE);
            }
            _ => return,
        }
        model.ensure_caret_visible();
    }
}

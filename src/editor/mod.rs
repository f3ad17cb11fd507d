//! Rich-text editing surface.
//!
//! [`EditorState`] owns the document, the selection and the undo history.
//! Two interception hooks sit in front of it, mirroring how an embedding
//! UI drives a rich-text widget:
//! - [`on_before_insert`]: auto-format triggers, run before each insertion
//! - [`on_key_command`]: the built-in named command table

mod commands;
mod selection;
mod state;
mod triggers;

pub use commands::{EditorOutcome, KeyCommand, on_key_command};
pub use selection::{BlockPos, Motion, Selection};
pub use state::{ChangeType, EditorState};
pub use triggers::{TRIGGERS, Trigger, TriggerAction, match_trigger, on_before_insert};

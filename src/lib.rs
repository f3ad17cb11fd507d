// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. store::StorageError)
    clippy::module_name_repetitions
)]

//! # Blockpad
//!
//! A terminal rich-text scratchpad.
//!
//! Blockpad edits a block-structured document with:
//! - Markdown-style auto-format triggers (`# `, `* `, `** `, `*** `)
//! - Named key commands for inline styles, undo and deletion
//! - An archive of saved documents merged back into the editor at startup
//!
//! ## Architecture
//!
//! Blockpad uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Blocks, inline styles and the raw archive format
//! - [`editor`]: Editing surface, triggers and key commands
//! - [`store`]: Key-value storage and the document archive
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved flag defaults

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod store;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Block, BlockType, Document, InlineStyle};
    pub use crate::editor::{EditorOutcome, EditorState, on_before_insert, on_key_command};
    pub use crate::store::{DocumentStore, FileStorage, MemoryStorage, Storage};
    pub use crate::ui::viewport::Viewport;
}

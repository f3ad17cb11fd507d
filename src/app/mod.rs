//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use input::key_binding;
pub use model::Model;
pub use update::{Message, update};

use crate::store::DocumentStore;

/// Main application struct that owns the document store and runs the
/// event loop.
pub struct App {
    store: DocumentStore,
    triggers_enabled: bool,
}

impl App {
    /// Create a new application over a document store.
    pub const fn new(store: DocumentStore) -> Self {
        Self {
            store,
            triggers_enabled: true,
        }
    }

    /// Enable or disable the auto-format triggers.
    #[must_use]
    pub const fn with_triggers(mut self, enabled: bool) -> Self {
        self.triggers_enabled = enabled;
        self
    }

    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }
}

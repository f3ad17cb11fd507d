//! Markdown-style auto-format triggers.
//!
//! Typing a trigger prefix as the entire text of a block and then a space
//! removes the prefix and applies a formatting action instead of inserting
//! the space.

use crate::document::{BlockType, InlineStyle};

use super::{BlockPos, EditorOutcome, EditorState};

/// What a trigger does once matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    /// Toggle the caret block's type.
    Block(BlockType),
    /// Toggle an inline style for the next insertion.
    Inline(InlineStyle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub literal_prefix: &'static str,
    pub action: TriggerAction,
}

/// The fixed trigger set, in match order.
pub const TRIGGERS: [Trigger; 4] = [
    Trigger {
        literal_prefix: "#",
        action: TriggerAction::Block(BlockType::HeaderOne),
    },
    Trigger {
        literal_prefix: "*",
        action: TriggerAction::Inline(InlineStyle::Bold),
    },
    Trigger {
        literal_prefix: "**",
        action: TriggerAction::Inline(InlineStyle::Red),
    },
    Trigger {
        literal_prefix: "***",
        action: TriggerAction::Inline(InlineStyle::Underline),
    },
];

/// Find the trigger whose prefix equals `text` exactly.
pub fn match_trigger(text: &str) -> Option<&'static Trigger> {
    TRIGGERS.iter().find(|t| t.literal_prefix == text)
}

/// Hook run before `chars` is inserted at the caret.
///
/// Only a single space at a collapsed caret can fire a trigger, and only
/// when the block text from its start to the caret is exactly a prefix.
/// On a match the prefix is removed and the action applied; the space is
/// never inserted. On [`EditorOutcome::NotHandled`] the state is untouched
/// and the caller inserts `chars` itself.
pub fn on_before_insert(chars: &str, state: &mut EditorState) -> EditorOutcome {
    if chars != " " || !state.selection().is_collapsed() {
        return EditorOutcome::NotHandled;
    }
    let Some(trigger) = match_trigger(state.text_before_caret()) else {
        return EditorOutcome::NotHandled;
    };

    let caret = state.caret();
    state.transact(|state| {
        state.remove_range(BlockPos::new(caret.block, 0), caret);
        match trigger.action {
            TriggerAction::Block(block_type) => state.toggle_block_type(block_type),
            TriggerAction::Inline(style) => state.toggle_inline_style(style),
        }
    });
    tracing::debug!(prefix = trigger.literal_prefix, "auto-format trigger fired");
    EditorOutcome::Handled
}

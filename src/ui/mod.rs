//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`layout`]: Wrapping blocks into terminal rows
//! - [`style`]: Theming and colors

pub mod layout;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use render::{body_height, render, split_screen};

pub const DOCUMENT_LEFT_PADDING: u16 = 2;

#[cfg(test)]
mod tests;

//! Viewport management for scrolling.
//!
//! The [`Viewport`] struct tracks the visible rows of the document body and
//! follows the caret as it moves.

use std::ops::Range;

/// Manages the visible portion of a document.
///
/// The viewport tracks:
/// - Terminal dimensions (width, height of the body area)
/// - Current scroll offset (in rows)
/// - Total number of laid-out rows
///
/// # Example
///
/// ```
/// use blockpad::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 10, 100);
/// assert_eq!(vp.visible_range(), 0..10);
///
/// vp.reveal(42);
/// assert_eq!(vp.visible_range(), 33..43);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Terminal width in columns
    /// * `height` - Rows available to the document body
    /// * `total_lines` - Total rows in the laid-out document
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Get the range of visible rows, clamped to the document bounds.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Scroll the minimum distance that brings `row` into view.
    pub fn reveal(&mut self, row: usize) {
        if self.height == 0 {
            return;
        }
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + self.height as usize {
            self.offset = row + 1 - self.height as usize;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the total number of rows (e.g. after an edit re-wraps).
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

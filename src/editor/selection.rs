/// A caret position: block index plus char offset within the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct BlockPos {
    pub block: usize,
    pub offset: usize,
}

impl BlockPos {
    pub const fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Selection between an anchor and a focus (where the caret is drawn).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: BlockPos,
    pub focus: BlockPos,
}

impl Selection {
    /// A collapsed selection (plain caret) at `pos`.
    pub const fn collapsed(pos: BlockPos) -> Self {
        Self {
            anchor: pos,
            focus: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The earlier of anchor and focus.
    pub fn start(&self) -> BlockPos {
        self.anchor.min(self.focus)
    }

    /// The later of anchor and focus.
    pub fn end(&self) -> BlockPos {
        self.anchor.max(self.focus)
    }
}

/// Caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    DocStart,
    DocEnd,
}

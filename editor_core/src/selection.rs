//! Selections over a document

use core::fmt;

use crate::block::BlockKey;

/// A (block key, char offset) position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub key: BlockKey,
    pub offset: usize,
}

impl Position {
    pub fn new(key: BlockKey, offset: usize) -> Self {
        Self { key, offset }
    }

    /// Start of the given block
    pub fn start_of(key: BlockKey) -> Self {
        Self { key, offset: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.offset)
    }
}

/// Anchor and focus positions
///
/// The anchor is where the selection started, the focus where it ends; the
/// focus may precede the anchor. Use `Document::selection_bounds` to get them
/// in document order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// Cursor at `offset` in block `key`
    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        let at = Position::new(key, offset);
        Self {
            anchor: at.clone(),
            focus: at,
        }
    }

    /// Selection of `[start, end)` within one block
    pub fn within(key: BlockKey, start: usize, end: usize) -> Self {
        Self {
            anchor: Position::new(key.clone(), start),
            focus: Position::new(key, end),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// True when anchor and focus lie in the same block
    pub fn is_single_block(&self) -> bool {
        self.anchor.key == self.focus.key
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collapsed() {
            write!(f, "{}", self.anchor)
        } else {
            write!(f, "{}..{}", self.anchor, self.focus)
        }
    }
}

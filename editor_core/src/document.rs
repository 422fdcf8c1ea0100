//! Immutable block-structured documents
//!
//! Every operation returns a new `Document`; the receiver is never touched.
//! Operations that reference a block key absent from the document fail with
//! `DocumentError::InvalidReference` and produce nothing.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::block::{Block, BlockKey, BlockType};
use crate::selection::{Position, Selection};
use crate::style::{InlineStyle, StyleSet};
use crate::style_ranges::Span;

/// Result type for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors raised by document operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Block key does not exist in the document
    InvalidReference(BlockKey),
    /// Offset lies past the end of the block
    OffsetOutOfRange {
        key: BlockKey,
        offset: usize,
        len: usize,
    },
    /// Two blocks share a key
    DuplicateKey(BlockKey),
    /// A document needs at least one block
    Empty,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::InvalidReference(key) => write!(f, "No block with key {}", key),
            DocumentError::OffsetOutOfRange { key, offset, len } => write!(
                f,
                "Offset {} out of range for block {} of length {}",
                offset, key, len
            ),
            DocumentError::DuplicateKey(key) => write!(f, "Duplicate block key {}", key),
            DocumentError::Empty => write!(f, "Document has no blocks"),
        }
    }
}

impl core::error::Error for DocumentError {}

/// Ordered sequence of blocks with unique keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Document holding a single empty unstyled block
    pub fn new() -> Self {
        Self {
            blocks: alloc::vec![Block::empty()],
        }
    }

    /// Builds a document, checking that it is non-empty and keys are unique
    pub fn from_blocks(blocks: Vec<Block>) -> DocumentResult<Self> {
        if blocks.is_empty() {
            return Err(DocumentError::Empty);
        }
        let mut seen = BTreeSet::new();
        for block in &blocks {
            if !seen.insert(block.key()) {
                return Err(DocumentError::DuplicateKey(block.key().clone()));
            }
        }
        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a document has at least one block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn first_block(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Index of the block with `key`
    pub fn index_of(&self, key: &BlockKey) -> DocumentResult<usize> {
        self.blocks
            .iter()
            .position(|block| block.key() == key)
            .ok_or_else(|| DocumentError::InvalidReference(key.clone()))
    }

    pub fn block_at(&self, key: &BlockKey) -> DocumentResult<&Block> {
        let index = self.index_of(key)?;
        Ok(&self.blocks[index])
    }

    /// Block the position points into, checking the offset
    pub fn block_containing(&self, position: &Position) -> DocumentResult<&Block> {
        let block = self.block_at(&position.key)?;
        let len = block.len();
        if position.offset > len {
            return Err(DocumentError::OffsetOutOfRange {
                key: position.key.clone(),
                offset: position.offset,
                len,
            });
        }
        Ok(block)
    }

    pub fn block_before(&self, key: &BlockKey) -> Option<&Block> {
        let index = self.index_of(key).ok()?;
        index.checked_sub(1).map(|i| &self.blocks[i])
    }

    pub fn block_after(&self, key: &BlockKey) -> Option<&Block> {
        let index = self.index_of(key).ok()?;
        self.blocks.get(index + 1)
    }

    /// Orders anchor and focus into `(start, end)` by document order
    pub fn selection_bounds(&self, selection: &Selection) -> DocumentResult<(Position, Position)> {
        self.block_containing(&selection.anchor)?;
        self.block_containing(&selection.focus)?;
        let anchor = self.index_of(&selection.anchor.key)?;
        let focus = self.index_of(&selection.focus.key)?;
        let backward = focus < anchor
            || (focus == anchor && selection.focus.offset < selection.anchor.offset);
        if backward {
            Ok((selection.focus.clone(), selection.anchor.clone()))
        } else {
            Ok((selection.anchor.clone(), selection.focus.clone()))
        }
    }

    pub fn with_block_type(&self, key: &BlockKey, block_type: BlockType) -> DocumentResult<Self> {
        let index = self.index_of(key)?;
        let mut doc = self.clone();
        doc.blocks[index] = self.blocks[index].with_type(block_type);
        Ok(doc)
    }

    /// True when every selected character carries `style`
    ///
    /// A collapsed selection never carries a style.
    pub fn range_has_style(&self, selection: &Selection, style: InlineStyle) -> DocumentResult<bool> {
        let segments = self.segments(selection)?;
        let mut any = false;
        for (index, span) in segments {
            if span.is_empty() {
                continue;
            }
            any = true;
            if !self.blocks[index].has_style(style, span) {
                return Ok(false);
            }
        }
        Ok(any)
    }

    pub fn with_inline_style_applied(
        &self,
        selection: &Selection,
        style: InlineStyle,
    ) -> DocumentResult<Self> {
        let segments = self.segments(selection)?;
        let mut doc = self.clone();
        for (index, span) in segments {
            doc.blocks[index] = self.blocks[index].with_style_applied(style, span);
        }
        Ok(doc)
    }

    pub fn with_inline_style_removed(
        &self,
        selection: &Selection,
        style: InlineStyle,
    ) -> DocumentResult<Self> {
        let segments = self.segments(selection)?;
        let mut doc = self.clone();
        for (index, span) in segments {
            doc.blocks[index] = self.blocks[index].with_style_removed(style, span);
        }
        Ok(doc)
    }

    /// Removes `style` from the whole range if it already covers all of it,
    /// otherwise applies it to the whole range
    pub fn with_inline_style_toggled(
        &self,
        selection: &Selection,
        style: InlineStyle,
    ) -> DocumentResult<Self> {
        if self.range_has_style(selection, style)? {
            self.with_inline_style_removed(selection, style)
        } else {
            self.with_inline_style_applied(selection, style)
        }
    }

    /// Inserts `text` at `at`; the new characters carry exactly `styles`
    pub fn with_text_inserted(
        &self,
        at: &Position,
        text: &str,
        styles: StyleSet,
    ) -> DocumentResult<Self> {
        self.block_containing(at)?;
        let index = self.index_of(&at.key)?;
        let mut doc = self.clone();
        doc.blocks[index] = self.blocks[index].with_text_inserted(at.offset, text, styles);
        Ok(doc)
    }

    /// Removes the selected characters, joining the end block into the start
    /// block when the range spans several
    pub fn with_range_removed(&self, selection: &Selection) -> DocumentResult<Self> {
        let (start, end) = self.selection_bounds(selection)?;
        let first = self.index_of(&start.key)?;
        let last = self.index_of(&end.key)?;

        if first == last {
            let mut doc = self.clone();
            doc.blocks[first] = self.blocks[first]
                .with_span_removed(Span::new(start.offset, end.offset));
            return Ok(doc);
        }

        let head = &self.blocks[first];
        let tail = &self.blocks[last];
        let head = head.with_span_removed(Span::new(start.offset, head.len()));
        let tail = tail.with_span_removed(Span::new(0, end.offset));
        let joined = head.joined_with(&tail);

        let mut blocks = Vec::with_capacity(self.blocks.len() - (last - first));
        blocks.extend_from_slice(&self.blocks[..first]);
        blocks.push(joined);
        blocks.extend_from_slice(&self.blocks[last + 1..]);
        Ok(Self { blocks })
    }

    /// Splits the block at `at`; the tail becomes a new block keyed `new_key`
    ///
    /// Splitting at the end of a header yields an unstyled block; every other
    /// split keeps the block type.
    pub fn with_block_split(&self, at: &Position, new_key: BlockKey) -> DocumentResult<Self> {
        let block = self.block_containing(at)?;
        if self.index_of(&new_key).is_ok() {
            return Err(DocumentError::DuplicateKey(new_key));
        }
        let index = self.index_of(&at.key)?;
        let tail_type = if block.block_type().is_header() && at.offset == block.len() {
            BlockType::Unstyled
        } else {
            block.block_type()
        };
        let (head, tail) = block.split_at(at.offset, new_key, tail_type);

        let mut doc = self.clone();
        doc.blocks[index] = head;
        doc.blocks.insert(index + 1, tail);
        Ok(doc)
    }

    /// Block texts joined with newlines
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(block.text());
        }
        text
    }

    /// Per-block spans covered by `selection`, in document order
    fn segments(&self, selection: &Selection) -> DocumentResult<Vec<(usize, Span)>> {
        let (start, end) = self.selection_bounds(selection)?;
        let first = self.index_of(&start.key)?;
        let last = self.index_of(&end.key)?;
        Ok((first..=last)
            .map(|index| {
                let from = if index == first { start.offset } else { 0 };
                let to = if index == last {
                    end.offset
                } else {
                    self.blocks[index].len()
                };
                (index, Span::new(from, to))
            })
            .collect())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn block(key: &str, text: &str) -> Block {
        Block::new(key.into(), BlockType::Unstyled, text)
    }

    fn doc(blocks: Vec<Block>) -> Document {
        Document::from_blocks(blocks).unwrap()
    }

    #[test]
    fn test_new_document_has_one_empty_block() {
        let doc = Document::new();
        assert_eq!(doc.len(), 1);
        assert!(doc.first_block().is_empty());
        assert_eq!(doc.first_block().block_type(), BlockType::Unstyled);
    }

    #[test]
    fn test_from_blocks_validates() {
        assert_eq!(Document::from_blocks(vec![]), Err(DocumentError::Empty));
        assert_eq!(
            Document::from_blocks(vec![block("a", "x"), block("a", "y")]),
            Err(DocumentError::DuplicateKey("a".into()))
        );
    }

    #[test]
    fn test_block_at_missing_key() {
        let d = doc(vec![block("a", "x")]);
        assert_eq!(
            d.block_at(&"zz".into()),
            Err(DocumentError::InvalidReference("zz".into()))
        );
    }

    #[test]
    fn test_block_containing_checks_offset() {
        let d = doc(vec![block("a", "abc")]);
        assert!(d.block_containing(&Position::new("a".into(), 3)).is_ok());
        assert_eq!(
            d.block_containing(&Position::new("a".into(), 4)),
            Err(DocumentError::OffsetOutOfRange {
                key: "a".into(),
                offset: 4,
                len: 3
            })
        );
    }

    #[test]
    fn test_with_block_type_leaves_others_alone() {
        let d = doc(vec![block("a", "one"), block("b", "two"), block("c", "three")]);
        let changed = d.with_block_type(&"b".into(), BlockType::HeaderOne).unwrap();
        assert_eq!(
            changed.block_at(&"b".into()).unwrap().block_type(),
            BlockType::HeaderOne
        );
        assert_eq!(changed.blocks()[0], d.blocks()[0]);
        assert_eq!(changed.blocks()[2], d.blocks()[2]);
        assert_eq!(d.blocks()[1].block_type(), BlockType::Unstyled);
    }

    #[test]
    fn test_with_block_type_invalid_reference() {
        let d = doc(vec![block("a", "one")]);
        assert_eq!(
            d.with_block_type(&"x".into(), BlockType::HeaderOne),
            Err(DocumentError::InvalidReference("x".into()))
        );
    }

    #[test]
    fn test_selection_bounds_orders_backward_selection() {
        let d = doc(vec![block("a", "one"), block("b", "two")]);
        let sel = Selection::new(Position::new("b".into(), 1), Position::new("a".into(), 2));
        let (start, end) = d.selection_bounds(&sel).unwrap();
        assert_eq!(start, Position::new("a".into(), 2));
        assert_eq!(end, Position::new("b".into(), 1));
    }

    #[test]
    fn test_toggle_applies_when_partially_styled() {
        let d = doc(vec![block("a", "hello")]);
        let d = d
            .with_inline_style_applied(&Selection::within("a".into(), 0, 2), InlineStyle::Bold)
            .unwrap();
        let sel = Selection::within("a".into(), 0, 5);
        assert!(!d.range_has_style(&sel, InlineStyle::Bold).unwrap());
        let toggled = d.with_inline_style_toggled(&sel, InlineStyle::Bold).unwrap();
        assert!(toggled.range_has_style(&sel, InlineStyle::Bold).unwrap());
    }

    #[test]
    fn test_toggle_twice_restores_document() {
        let d = doc(vec![block("a", "hello"), block("b", "world")]);
        let sel = Selection::new(Position::new("a".into(), 2), Position::new("b".into(), 3));
        let once = d.with_inline_style_toggled(&sel, InlineStyle::Underline).unwrap();
        assert_ne!(once, d);
        let twice = once.with_inline_style_toggled(&sel, InlineStyle::Underline).unwrap();
        assert_eq!(twice, d);
    }

    #[test]
    fn test_collapsed_selection_never_has_style() {
        let d = doc(vec![block("a", "hi")]);
        let d = d
            .with_inline_style_applied(&Selection::within("a".into(), 0, 2), InlineStyle::Bold)
            .unwrap();
        assert!(!d
            .range_has_style(&Selection::collapsed("a".into(), 1), InlineStyle::Bold)
            .unwrap());
    }

    #[test]
    fn test_insert_text() {
        let d = doc(vec![block("a", "held")]);
        let d = d
            .with_text_inserted(&Position::new("a".into(), 3), "lo wor", StyleSet::EMPTY)
            .unwrap();
        assert_eq!(d.first_block().text(), "hello word");
    }

    #[test]
    fn test_remove_range_across_blocks_joins_them() {
        let d = doc(vec![block("a", "hello"), block("b", "big"), block("c", "world")]);
        let sel = Selection::new(Position::new("a".into(), 4), Position::new("c".into(), 1));
        let d = d.with_range_removed(&sel).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d.first_block().key().as_str(), "a");
        assert_eq!(d.first_block().text(), "hellorld");
    }

    #[test]
    fn test_split_header_at_end_makes_unstyled_block() {
        let d = doc(vec![Block::new("a".into(), BlockType::HeaderOne, "Title")]);
        let d = d
            .with_block_split(&Position::new("a".into(), 5), "b".into())
            .unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d.blocks()[0].block_type(), BlockType::HeaderOne);
        assert_eq!(d.blocks()[1].block_type(), BlockType::Unstyled);
        assert!(d.blocks()[1].is_empty());
    }

    #[test]
    fn test_split_mid_block_keeps_type() {
        let d = doc(vec![Block::new("a".into(), BlockType::HeaderOne, "Title")]);
        let d = d
            .with_block_split(&Position::new("a".into(), 2), "b".into())
            .unwrap();
        assert_eq!(d.blocks()[0].text(), "Ti");
        assert_eq!(d.blocks()[1].text(), "tle");
        assert_eq!(d.blocks()[1].block_type(), BlockType::HeaderOne);
    }

    #[test]
    fn test_split_rejects_existing_key() {
        let d = doc(vec![block("a", "one"), block("b", "two")]);
        assert_eq!(
            d.with_block_split(&Position::new("a".into(), 1), "b".into()),
            Err(DocumentError::DuplicateKey("b".into()))
        );
    }

    #[test]
    fn test_neighbours_and_plain_text() {
        let d = doc(vec![block("a", "one"), block("b", "two")]);
        assert_eq!(d.block_before(&"b".into()).map(|b| b.text()), Some("one"));
        assert!(d.block_before(&"a".into()).is_none());
        assert_eq!(d.block_after(&"a".into()).map(|b| b.text()), Some("two"));
        assert_eq!(d.plain_text(), "one\ntwo");
    }
}

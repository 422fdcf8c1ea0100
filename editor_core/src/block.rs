//! Blocks: the structural units of a document

use alloc::string::{String, ToString};
use core::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::style::{InlineStyle, StyleSet};
use crate::style_ranges::{Span, StyleRanges};

/// Unique key of a block within a document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    const GENERATED_LEN: usize = 8;

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Fresh random key
    pub fn generate() -> Self {
        let mut key = Uuid::new_v4().simple().to_string();
        key.truncate(Self::GENERATED_LEN);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Structural type of a block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    Blockquote,
    CodeBlock,
    UnorderedListItem,
    OrderedListItem,
}

impl BlockType {
    pub const ALL: [BlockType; 8] = [
        BlockType::Unstyled,
        BlockType::HeaderOne,
        BlockType::HeaderTwo,
        BlockType::HeaderThree,
        BlockType::Blockquote,
        BlockType::CodeBlock,
        BlockType::UnorderedListItem,
        BlockType::OrderedListItem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::Blockquote => "blockquote",
            BlockType::CodeBlock => "code-block",
            BlockType::UnorderedListItem => "unordered-list-item",
            BlockType::OrderedListItem => "ordered-list-item",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }

    pub fn is_header(&self) -> bool {
        matches!(
            self,
            BlockType::HeaderOne | BlockType::HeaderTwo | BlockType::HeaderThree
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One block: key, type, immutable text, and its style ranges
///
/// Offsets are char offsets into `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    key: BlockKey,
    block_type: BlockType,
    text: String,
    styles: StyleRanges,
    depth: u8,
}

impl Block {
    /// Empty unstyled block with a fresh key
    pub fn empty() -> Self {
        Self::new(BlockKey::generate(), BlockType::Unstyled, "")
    }

    pub fn new(key: BlockKey, block_type: BlockType, text: impl Into<String>) -> Self {
        Self {
            key,
            block_type,
            text: text.into(),
            styles: StyleRanges::new(),
            depth: 0,
        }
    }

    /// Replaces the style ranges, clipped to the text
    pub fn with_styles(mut self, mut styles: StyleRanges) -> Self {
        styles.clamp(self.len());
        self.styles = styles;
        self
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_type(&self, block_type: BlockType) -> Self {
        Self {
            block_type,
            ..self.clone()
        }
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn styles(&self) -> &StyleRanges {
        &self.styles
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn styles_at(&self, offset: usize) -> StyleSet {
        self.styles.styles_at(offset)
    }

    pub fn has_style(&self, style: InlineStyle, span: Span) -> bool {
        self.styles.covers(style, span)
    }

    pub(crate) fn with_style_applied(&self, style: InlineStyle, span: Span) -> Self {
        let mut block = self.clone();
        block.styles.apply(style, span);
        block
    }

    pub(crate) fn with_style_removed(&self, style: InlineStyle, span: Span) -> Self {
        let mut block = self.clone();
        block.styles.remove(style, span);
        block
    }

    pub(crate) fn with_text_inserted(&self, offset: usize, text: &str, styles: StyleSet) -> Self {
        let byte = byte_offset(&self.text, offset);
        let mut block = self.clone();
        block.text.insert_str(byte, text);
        block.styles.insert(offset, text.chars().count(), styles);
        block
    }

    pub(crate) fn with_span_removed(&self, span: Span) -> Self {
        let start = byte_offset(&self.text, span.start);
        let end = byte_offset(&self.text, span.end);
        let mut block = self.clone();
        block.text.replace_range(start..end, "");
        block.styles.delete(span);
        block
    }

    /// Splits at `offset`; the tail becomes a new block under `tail_key`
    pub(crate) fn split_at(&self, offset: usize, tail_key: BlockKey, tail_type: BlockType) -> (Self, Self) {
        let byte = byte_offset(&self.text, offset);
        let (left_styles, right_styles) = self.styles.split(offset);
        let head = Self {
            text: self.text[..byte].to_string(),
            styles: left_styles,
            ..self.clone()
        };
        let tail = Self {
            key: tail_key,
            block_type: tail_type,
            text: self.text[byte..].to_string(),
            styles: right_styles,
            depth: self.depth,
        };
        (head, tail)
    }

    /// This block followed by the text and styles of `other`
    pub(crate) fn joined_with(&self, other: &Block) -> Self {
        let offset = self.len();
        let mut block = self.clone();
        block.text.push_str(&other.text);
        block.styles.append(&other.styles, offset);
        block
    }

    /// Char index of the last occurrence of `needle`
    pub fn last_index_of(&self, needle: &str) -> Option<usize> {
        self.text
            .rfind(needle)
            .map(|byte| self.text[..byte].chars().count())
    }
}

/// Byte index of char `offset`, clamped to the end of `text`
fn byte_offset(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_distinct() {
        let a = BlockKey::generate();
        let b = BlockKey::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 8);
    }

    #[test]
    fn test_block_type_names() {
        assert_eq!(BlockType::HeaderOne.as_str(), "header-one");
        assert_eq!(BlockType::from_name("unstyled"), Some(BlockType::Unstyled));
        assert_eq!(BlockType::from_name("atomic"), None);
        assert!(BlockType::HeaderTwo.is_header());
        assert!(!BlockType::Blockquote.is_header());
    }

    #[test]
    fn test_block_type_serializes_kebab_case() {
        let json = serde_json::to_string(&BlockType::UnorderedListItem).unwrap();
        assert_eq!(json, "\"unordered-list-item\"");
    }

    #[test]
    fn test_len_counts_chars() {
        let block = Block::new("k".into(), BlockType::Unstyled, "héllo");
        assert_eq!(block.len(), 5);
    }

    #[test]
    fn test_insert_multibyte_text() {
        let block = Block::new("k".into(), BlockType::Unstyled, "añb");
        let block = block.with_text_inserted(2, "é", StyleSet::of(InlineStyle::Bold));
        assert_eq!(block.text(), "añéb");
        assert!(block.styles_at(2).contains(InlineStyle::Bold));
        assert!(block.styles_at(3).is_empty());
    }

    #[test]
    fn test_span_removed() {
        let block = Block::new("k".into(), BlockType::Unstyled, "hello world");
        let block = block.with_span_removed(Span::new(5, 11));
        assert_eq!(block.text(), "hello");
    }

    #[test]
    fn test_split_and_join() {
        let block = Block::new("k".into(), BlockType::HeaderOne, "abcdef")
            .with_style_applied(InlineStyle::Bold, Span::new(1, 5));
        let (head, tail) = block.split_at(3, "t".into(), BlockType::Unstyled);
        assert_eq!(head.text(), "abc");
        assert_eq!(head.key().as_str(), "k");
        assert_eq!(tail.text(), "def");
        assert_eq!(tail.block_type(), BlockType::Unstyled);
        assert!(tail.styles_at(0).contains(InlineStyle::Bold));
        assert!(!tail.styles_at(2).contains(InlineStyle::Bold));

        assert_eq!(head.joined_with(&tail), block);
    }

    #[test]
    fn test_last_index_of_is_char_based() {
        let block = Block::new("k".into(), BlockType::Unstyled, "é```x```");
        assert_eq!(block.last_index_of("```"), Some(5));
        assert_eq!(block.last_index_of("~~"), None);
    }

    #[test]
    fn test_with_styles_clamps_to_text() {
        let mut styles = StyleRanges::new();
        styles.apply(InlineStyle::Underline, Span::new(0, 10));
        let block = Block::new("k".into(), BlockType::Unstyled, "abc").with_styles(styles);
        assert_eq!(block.styles().spans(InlineStyle::Underline), &[Span::new(0, 3)]);
    }
}

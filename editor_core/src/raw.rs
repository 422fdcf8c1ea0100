//! Raw serialization of documents
//!
//! The persisted shape is the block-list JSON of the rich-text engine:
//!
//! ```json
//! {"blocks":[{"key":"a1b2c3d4","text":"Title","type":"header-one","depth":0,
//!   "inlineStyleRanges":[{"offset":0,"length":5,"style":"BOLD"}],
//!   "entityRanges":[],"data":{}}],"entityMap":{}}
//! ```
//!
//! Offsets and lengths count chars. Loading is lenient: unknown block types
//! load as unstyled, unknown style names are skipped, and ranges running past
//! the text are clipped.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block::{Block, BlockKey, BlockType};
use crate::document::{Document, DocumentError};
use crate::style::InlineStyle;
use crate::style_ranges::{Span, StyleRanges};

/// Result type for raw conversion
pub type RawResult<T> = Result<T, RawError>;

/// Errors raised while converting to or from the raw format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawError {
    /// Malformed JSON or wrong shape
    Json(String),
    /// Well-formed content that does not make a valid document
    Document(DocumentError),
}

impl fmt::Display for RawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawError::Json(msg) => write!(f, "Malformed document content: {}", msg),
            RawError::Document(err) => write!(f, "Invalid document content: {}", err),
        }
    }
}

impl core::error::Error for RawError {}

impl From<DocumentError> for RawError {
    fn from(err: DocumentError) -> Self {
        RawError::Document(err)
    }
}

/// Serialized document as handed to persistence
///
/// Opaque to everything but this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedDocument(String);

impl SerializedDocument {
    pub fn from_json(json: impl Into<String>) -> Self {
        Self(json.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SerializedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContent {
    blocks: Vec<RawBlock>,
    #[serde(default)]
    entity_map: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlock {
    key: String,
    #[serde(default)]
    text: String,
    #[serde(rename = "type", default = "unstyled_name")]
    block_type: String,
    #[serde(default)]
    depth: u8,
    #[serde(default)]
    inline_style_ranges: Vec<RawStyleRange>,
    #[serde(default)]
    entity_ranges: Vec<Value>,
    #[serde(default)]
    data: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawStyleRange {
    offset: usize,
    length: usize,
    style: String,
}

fn unstyled_name() -> String {
    BlockType::Unstyled.as_str().to_string()
}

/// Encodes `document` in the raw format
pub fn serialize(document: &Document) -> RawResult<SerializedDocument> {
    let blocks = document
        .blocks()
        .iter()
        .map(|block| RawBlock {
            key: block.key().as_str().to_string(),
            text: block.text().to_string(),
            block_type: block.block_type().as_str().to_string(),
            depth: block.depth(),
            inline_style_ranges: block
                .styles()
                .iter()
                .map(|(style, span)| RawStyleRange {
                    offset: span.start,
                    length: span.len(),
                    style: style.as_str().to_string(),
                })
                .collect(),
            entity_ranges: Vec::new(),
            data: BTreeMap::new(),
        })
        .collect();

    let raw = RawContent {
        blocks,
        entity_map: BTreeMap::new(),
    };
    serde_json::to_string(&raw)
        .map(SerializedDocument)
        .map_err(|e| RawError::Json(e.to_string()))
}

/// Decodes a document from the raw format
pub fn deserialize(serialized: &SerializedDocument) -> RawResult<Document> {
    let raw: RawContent =
        serde_json::from_str(serialized.as_str()).map_err(|e| RawError::Json(e.to_string()))?;

    let blocks = raw
        .blocks
        .into_iter()
        .map(block_from_raw)
        .collect::<Vec<_>>();
    Ok(Document::from_blocks(blocks)?)
}

/// Decodes `serialized`, falling back to an empty document
///
/// Missing or unreadable content never fails; it just starts fresh.
pub fn load_or_empty(serialized: Option<&SerializedDocument>) -> Document {
    load_with_fallback(serialized, |_| {})
}

/// Like [`load_or_empty`], reporting unreadable content to `on_error`
///
/// `on_error` is not called for missing content.
pub fn load_with_fallback(
    serialized: Option<&SerializedDocument>,
    on_error: impl FnOnce(&RawError),
) -> Document {
    let Some(serialized) = serialized else {
        return Document::new();
    };
    match deserialize(serialized) {
        Ok(document) => document,
        Err(err) => {
            log::warn!("discarding saved content: {}", err);
            on_error(&err);
            Document::new()
        }
    }
}

fn block_from_raw(raw: RawBlock) -> Block {
    let block_type = BlockType::from_name(&raw.block_type).unwrap_or_else(|| {
        log::warn!(
            "unknown block type {:?} in block {}, loading as unstyled",
            raw.block_type,
            raw.key
        );
        BlockType::Unstyled
    });

    let mut styles = StyleRanges::new();
    for range in &raw.inline_style_ranges {
        match InlineStyle::from_name(&range.style) {
            Some(style) => styles.apply(
                style,
                Span::new(range.offset, range.offset.saturating_add(range.length)),
            ),
            None => log::warn!(
                "skipping unknown inline style {:?} in block {}",
                range.style,
                raw.key
            ),
        }
    }

    Block::new(BlockKey::new(raw.key), block_type, raw.text)
        .with_depth(raw.depth)
        .with_styles(styles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use alloc::vec;

    fn sample() -> Document {
        let doc = Document::from_blocks(vec![
            Block::new("a".into(), BlockType::HeaderOne, "Title"),
            Block::new("b".into(), BlockType::Unstyled, "some ```code``` here").with_depth(1),
        ])
        .unwrap();
        let doc = doc
            .with_inline_style_applied(&Selection::within("a".into(), 0, 5), InlineStyle::Bold)
            .unwrap();
        doc.with_inline_style_applied(&Selection::within("b".into(), 5, 15), InlineStyle::Highlight)
            .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let doc = sample();
        let serialized = serialize(&doc).unwrap();
        assert_eq!(deserialize(&serialized).unwrap(), doc);
    }

    #[test]
    fn test_json_shape() {
        let serialized = serialize(&sample()).unwrap();
        let value: Value = serde_json::from_str(serialized.as_str()).unwrap();
        let first = &value["blocks"][0];
        assert_eq!(first["key"], "a");
        assert_eq!(first["type"], "header-one");
        assert_eq!(first["inlineStyleRanges"][0]["style"], "BOLD");
        assert_eq!(first["inlineStyleRanges"][0]["length"], 5);
        assert!(value["entityMap"].is_object());
        assert_eq!(value["blocks"][1]["depth"], 1);
    }

    #[test]
    fn test_lenient_load() {
        let json = r#"{"blocks":[{"key":"x","text":"abc","type":"atomic",
            "inlineStyleRanges":[{"offset":1,"length":9,"style":"BOLD"},
                                 {"offset":0,"length":1,"style":"ITALIC"}],
            "extra":true}]}"#;
        let doc = deserialize(&SerializedDocument::from_json(json)).unwrap();
        let block = doc.first_block();
        assert_eq!(block.block_type(), BlockType::Unstyled);
        assert_eq!(block.styles().spans(InlineStyle::Bold), &[Span::new(1, 3)]);
        assert_eq!(block.styles().iter().count(), 1);
    }

    #[test]
    fn test_malformed_content() {
        let err = deserialize(&SerializedDocument::from_json("{not json")).unwrap_err();
        assert!(matches!(err, RawError::Json(_)));

        let err = deserialize(&SerializedDocument::from_json(r#"{"blocks":[]}"#)).unwrap_err();
        assert_eq!(err, RawError::Document(DocumentError::Empty));
    }

    #[test]
    fn test_load_or_empty_falls_back() {
        let empty = load_or_empty(None);
        assert_eq!(empty.len(), 1);
        assert!(empty.first_block().is_empty());

        let broken = SerializedDocument::from_json("[]");
        assert_eq!(load_or_empty(Some(&broken)).len(), 1);

        let good = serialize(&sample()).unwrap();
        assert_eq!(load_or_empty(Some(&good)), sample());
    }

    #[test]
    fn test_load_with_fallback_reports_unreadable_content() {
        let mut reported = None;
        let broken = SerializedDocument::from_json("{not json");
        let doc = load_with_fallback(Some(&broken), |err| reported = Some(err.clone()));
        assert_eq!(doc.len(), 1);
        assert!(matches!(reported, Some(RawError::Json(_))));

        let mut called = false;
        load_with_fallback(None, |_| called = true);
        assert!(!called);
    }
}

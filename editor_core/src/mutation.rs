//! Mutation descriptors and the applier
//!
//! The shortcut engine describes a change; the applier turns the description
//! into the next document version. Application is all-or-nothing: on error the
//! caller keeps its current document.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::block::{BlockKey, BlockType};
use crate::document::{Document, DocumentResult};
use crate::selection::Selection;
use crate::style::InlineStyle;

/// A document change produced by a shortcut rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationDescriptor {
    SetBlockType {
        block: BlockKey,
        block_type: BlockType,
    },
    ToggleInlineStyle {
        selection: Selection,
        style: InlineStyle,
    },
    /// Applies `style` to `[start, end)` of one block; bounds may be given
    /// in either order
    ApplyInlineStyleToRange {
        block: BlockKey,
        start: usize,
        end: usize,
        style: InlineStyle,
    },
}

impl MutationDescriptor {
    /// Change type the descriptor records in history
    pub fn change_type(&self) -> ChangeType {
        match self {
            MutationDescriptor::SetBlockType { .. } => ChangeType::ChangeBlockType,
            MutationDescriptor::ToggleInlineStyle { .. }
            | MutationDescriptor::ApplyInlineStyleToRange { .. } => ChangeType::ChangeInlineStyle,
        }
    }
}

impl fmt::Display for MutationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationDescriptor::SetBlockType { block, block_type } => {
                write!(f, "set-block-type({}, {})", block, block_type)
            }
            MutationDescriptor::ToggleInlineStyle { selection, style } => {
                write!(f, "toggle-inline-style({}, {})", selection, style)
            }
            MutationDescriptor::ApplyInlineStyleToRange {
                block,
                start,
                end,
                style,
            } => write!(
                f,
                "apply-inline-style({}, {}..{}, {})",
                block, start, end, style
            ),
        }
    }
}

/// Kind of change recorded in editor history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    ChangeBlockType,
    ChangeInlineStyle,
    InsertCharacters,
    SplitBlock,
    RemoveRange,
    BackspaceCharacter,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::ChangeBlockType => "change-block-type",
            ChangeType::ChangeInlineStyle => "change-inline-style",
            ChangeType::InsertCharacters => "insert-characters",
            ChangeType::SplitBlock => "split-block",
            ChangeType::RemoveRange => "remove-range",
            ChangeType::BackspaceCharacter => "backspace-character",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub document: Document,
    pub change: ChangeType,
}

/// Applies `descriptor` to `document`
pub fn apply(document: &Document, descriptor: &MutationDescriptor) -> DocumentResult<Applied> {
    let result = match descriptor {
        MutationDescriptor::SetBlockType { block, block_type } => {
            document.with_block_type(block, *block_type)
        }
        MutationDescriptor::ToggleInlineStyle { selection, style } => {
            document.with_inline_style_toggled(selection, *style)
        }
        MutationDescriptor::ApplyInlineStyleToRange {
            block,
            start,
            end,
            style,
        } => document.with_inline_style_applied(
            &Selection::within(block.clone(), *start.min(end), *start.max(end)),
            *style,
        ),
    };

    match result {
        Ok(document) => {
            let change = descriptor.change_type();
            log::debug!("applied {} as {}", descriptor, change);
            Ok(Applied { document, change })
        }
        Err(err) => {
            log::error!("aborted {}: {}", descriptor, err);
            Err(err)
        }
    }
}

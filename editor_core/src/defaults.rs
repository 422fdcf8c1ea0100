//! Default key-command handling
//!
//! The editing surface's own command handling runs before any shortcut rule.
//! When it claims a command, the rules never see it.

use crate::block::BlockType;
use crate::document::Document;
use crate::mutation::MutationDescriptor;
use crate::selection::Selection;
use crate::style::InlineStyle;

/// Built-in handling of named key commands
pub trait KeyCommandHandler {
    /// Mutation for `command`, or `None` when the command is not handled here
    fn handle(
        &self,
        document: &Document,
        selection: &Selection,
        command: &str,
    ) -> Option<MutationDescriptor>;
}

/// Standard rich-text command handling
///
/// Style commands toggle the matching style when it is one the document
/// supports; backspace at the very start of a styled block resets it to
/// unstyled.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichTextDefaults;

impl RichTextDefaults {
    fn style_for(command: &str) -> Option<InlineStyle> {
        match command {
            "bold" => Some(InlineStyle::Bold),
            "underline" => Some(InlineStyle::Underline),
            _ => None,
        }
    }

    fn remove_block_style(document: &Document, selection: &Selection) -> Option<MutationDescriptor> {
        if !selection.is_collapsed() || selection.anchor.offset != 0 {
            return None;
        }
        let key = &selection.anchor.key;
        let block = document.block_at(key).ok()?;
        let block_type = block.block_type();

        if block_type == BlockType::CodeBlock {
            if let Some(before) = document.block_before(key) {
                if before.block_type() == BlockType::CodeBlock && !before.is_empty() {
                    return None;
                }
            }
        }
        if block_type == BlockType::Unstyled {
            return None;
        }
        Some(MutationDescriptor::SetBlockType {
            block: key.clone(),
            block_type: BlockType::Unstyled,
        })
    }
}

impl KeyCommandHandler for RichTextDefaults {
    fn handle(
        &self,
        document: &Document,
        selection: &Selection,
        command: &str,
    ) -> Option<MutationDescriptor> {
        match command {
            "backspace" | "backspace-word" | "backspace-to-start-of-line" => {
                Self::remove_block_style(document, selection)
            }
            _ => Self::style_for(command).map(|style| MutationDescriptor::ToggleInlineStyle {
                selection: selection.clone(),
                style,
            }),
        }
    }
}

/// Handler that never claims a command
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaults;

impl KeyCommandHandler for NoDefaults {
    fn handle(&self, _: &Document, _: &Selection, _: &str) -> Option<MutationDescriptor> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use alloc::vec;

    fn doc(blocks: alloc::vec::Vec<Block>) -> Document {
        Document::from_blocks(blocks).unwrap()
    }

    #[test]
    fn test_bold_and_underline_toggle() {
        let d = Document::new();
        let sel = Selection::collapsed(d.first_block().key().clone(), 0);
        assert_eq!(
            RichTextDefaults.handle(&d, &sel, "bold"),
            Some(MutationDescriptor::ToggleInlineStyle {
                selection: sel.clone(),
                style: InlineStyle::Bold
            })
        );
        assert!(matches!(
            RichTextDefaults.handle(&d, &sel, "underline"),
            Some(MutationDescriptor::ToggleInlineStyle {
                style: InlineStyle::Underline,
                ..
            })
        ));
    }

    #[test]
    fn test_unsupported_styles_are_not_handled() {
        let d = Document::new();
        let sel = Selection::collapsed(d.first_block().key().clone(), 0);
        for command in ["italic", "code", "strikethrough", "space"] {
            assert_eq!(RichTextDefaults.handle(&d, &sel, command), None);
        }
    }

    #[test]
    fn test_backspace_resets_header_at_start() {
        let d = doc(vec![Block::new("a".into(), BlockType::HeaderOne, "#")]);
        assert_eq!(
            RichTextDefaults.handle(&d, &Selection::collapsed("a".into(), 0), "backspace"),
            Some(MutationDescriptor::SetBlockType {
                block: "a".into(),
                block_type: BlockType::Unstyled
            })
        );
        assert_eq!(
            RichTextDefaults.handle(&d, &Selection::collapsed("a".into(), 1), "backspace"),
            None
        );
    }

    #[test]
    fn test_backspace_in_unstyled_block_is_not_handled() {
        let d = doc(vec![Block::new("a".into(), BlockType::Unstyled, "x")]);
        assert_eq!(
            RichTextDefaults.handle(&d, &Selection::collapsed("a".into(), 0), "backspace"),
            None
        );
    }

    #[test]
    fn test_backspace_keeps_code_block_after_code_block() {
        let d = doc(vec![
            Block::new("a".into(), BlockType::CodeBlock, "let x = 1;"),
            Block::new("b".into(), BlockType::CodeBlock, ""),
        ]);
        assert_eq!(
            RichTextDefaults.handle(&d, &Selection::collapsed("b".into(), 0), "backspace"),
            None
        );
    }

    #[test]
    fn test_no_defaults() {
        let d = Document::new();
        let sel = Selection::collapsed(d.first_block().key().clone(), 0);
        assert_eq!(NoDefaults.handle(&d, &sel, "bold"), None);
    }
}

//! Shortcut rules
//!
//! A rule is a trigger (what the current block and cursor must look like when
//! a given event arrives) paired with an effect. Rules only look at the block
//! holding the start of the selection and at the selection's start offset;
//! they never inspect neighbouring blocks or history.
//!
//! The standard tables are ordered. The engine evaluates them first-match-wins.

use input_types::InputEvent;

use crate::block::{Block, BlockType};
use crate::document::{Document, DocumentResult};
use crate::mutation::MutationDescriptor;
use crate::selection::Selection;
use crate::style::InlineStyle;

/// What a rule does once triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Change the current block's type
    SetBlockType(BlockType),
    /// Toggle a style over the current selection
    ToggleStyle(InlineStyle),
    /// Apply a style from the last fence in the block up to the cursor
    StyleSinceFence(InlineStyle),
}

/// Trigger condition of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Key command `command` while the trimmed block text is exactly `text`
    /// and the cursor sits exactly at `offset`
    CommandOnExactText {
        command: &'static str,
        text: &'static str,
        offset: usize,
    },
    /// Character `ch` typed exactly at `offset`
    CharAtOffset { ch: char, offset: usize },
    /// Character `ch` typed while the trimmed block text starts with a run of
    /// exactly `count` `marker` characters
    LeadingRun { ch: char, marker: char, count: usize },
    /// Character `ch` typed while the block text already ends with `fence`
    FenceClose { ch: char, fence: &'static str },
}

/// A named trigger and its effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub kind: RuleKind,
    pub effect: Effect,
}

/// Everything a rule may inspect
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub block: &'a Block,
    pub selection: &'a Selection,
    /// Start offset of the selection within `block`
    pub offset: usize,
}

impl<'a> RuleContext<'a> {
    /// Context for the block holding the start of `selection`
    pub fn new(document: &'a Document, selection: &'a Selection) -> DocumentResult<Self> {
        let (start, _) = document.selection_bounds(selection)?;
        let block = document.block_at(&start.key)?;
        Ok(Self {
            block,
            selection,
            offset: start.offset,
        })
    }

    pub fn trimmed_text(&self) -> &'a str {
        self.block.text().trim()
    }
}

impl Rule {
    pub const fn new(name: &'static str, kind: RuleKind, effect: Effect) -> Self {
        Self { name, kind, effect }
    }

    /// True when the rule fires for `event` in `ctx`
    pub fn matches(&self, ctx: &RuleContext<'_>, event: &InputEvent) -> bool {
        match (self.kind, event) {
            (
                RuleKind::CommandOnExactText {
                    command,
                    text,
                    offset,
                },
                InputEvent::KeyCommand(name),
            ) => name == command && ctx.trimmed_text() == text && ctx.offset == offset,
            (RuleKind::CharAtOffset { ch, offset }, InputEvent::BeforeInput(typed)) => {
                *typed == ch && ctx.offset == offset
            }
            (RuleKind::LeadingRun { ch, marker, count }, InputEvent::BeforeInput(typed)) => {
                *typed == ch && leading_run(ctx.trimmed_text(), marker) == count
            }
            (RuleKind::FenceClose { ch, fence }, InputEvent::BeforeInput(typed)) => {
                *typed == ch && ctx.block.text().ends_with(fence)
            }
            _ => false,
        }
    }

    /// Descriptor the rule produces in `ctx`
    pub fn descriptor(&self, ctx: &RuleContext<'_>) -> MutationDescriptor {
        match self.effect {
            Effect::SetBlockType(block_type) => MutationDescriptor::SetBlockType {
                block: ctx.block.key().clone(),
                block_type,
            },
            Effect::ToggleStyle(style) => MutationDescriptor::ToggleInlineStyle {
                selection: ctx.selection.clone(),
                style,
            },
            Effect::StyleSinceFence(style) => {
                let start = match self.kind {
                    RuleKind::FenceClose { fence, .. } => ctx.block.last_index_of(fence),
                    _ => None,
                };
                MutationDescriptor::ApplyInlineStyleToRange {
                    block: ctx.block.key().clone(),
                    start: start.unwrap_or(ctx.offset),
                    end: ctx.offset,
                    style,
                }
            }
        }
    }

    /// Evaluates the rule, producing a descriptor when it fires
    pub fn evaluate(&self, ctx: &RuleContext<'_>, event: &InputEvent) -> Option<MutationDescriptor> {
        self.matches(ctx, event).then(|| self.descriptor(ctx))
    }
}

/// Number of leading `marker` characters in `text`
fn leading_run(text: &str, marker: char) -> usize {
    text.chars().take_while(|&c| c == marker).count()
}

/// Rules run on a `space` key command once the default handler declined it
pub const KEY_COMMAND_RULES: &[Rule] = &[
    Rule::new(
        "hash-space-header",
        RuleKind::CommandOnExactText {
            command: "space",
            text: "#",
            offset: 1,
        },
        Effect::SetBlockType(BlockType::HeaderOne),
    ),
    Rule::new(
        "star-space-bold",
        RuleKind::CommandOnExactText {
            command: "space",
            text: "*",
            offset: 1,
        },
        Effect::ToggleStyle(InlineStyle::Bold),
    ),
    Rule::new(
        "double-star-space-red",
        RuleKind::CommandOnExactText {
            command: "space",
            text: "**",
            offset: 2,
        },
        Effect::ToggleStyle(InlineStyle::ColorRed),
    ),
    Rule::new(
        "triple-star-space-underline",
        RuleKind::CommandOnExactText {
            command: "space",
            text: "***",
            offset: 3,
        },
        Effect::ToggleStyle(InlineStyle::Underline),
    ),
];

/// Rules run on every character about to be inserted
pub const BEFORE_INPUT_RULES: &[Rule] = &[
    Rule::new(
        "hash-at-start-header",
        RuleKind::CharAtOffset { ch: '#', offset: 0 },
        Effect::SetBlockType(BlockType::HeaderOne),
    ),
    Rule::new(
        "star-run-bold",
        RuleKind::LeadingRun {
            ch: ' ',
            marker: '*',
            count: 1,
        },
        Effect::ToggleStyle(InlineStyle::Bold),
    ),
    Rule::new(
        "star-run-red",
        RuleKind::LeadingRun {
            ch: ' ',
            marker: '*',
            count: 2,
        },
        Effect::ToggleStyle(InlineStyle::ColorRed),
    ),
    Rule::new(
        "star-run-underline",
        RuleKind::LeadingRun {
            ch: ' ',
            marker: '*',
            count: 3,
        },
        Effect::ToggleStyle(InlineStyle::Underline),
    ),
    Rule::new(
        "backtick-fence-highlight",
        RuleKind::FenceClose {
            ch: '`',
            fence: "```",
        },
        Effect::StyleSinceFence(InlineStyle::Highlight),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use alloc::vec;

    fn doc(text: &str) -> Document {
        Document::from_blocks(vec![Block::new("a".into(), BlockType::Unstyled, text)]).unwrap()
    }

    #[test]
    fn test_context_uses_selection_start() {
        let d = doc("hello");
        let sel = Selection::within("a".into(), 4, 1);
        let ctx = RuleContext::new(&d, &sel).unwrap();
        assert_eq!(ctx.offset, 1);
    }

    #[test]
    fn test_context_rejects_unknown_block() {
        let d = doc("hello");
        let sel = Selection::collapsed("zz".into(), 0);
        assert!(RuleContext::new(&d, &sel).is_err());
    }

    #[test]
    fn test_trimmed_text_equality_is_exact() {
        let rule = KEY_COMMAND_RULES[0];
        let space = InputEvent::key_command("space");

        let d = doc(" # ");
        let sel = Selection::collapsed("a".into(), 1);
        let ctx = RuleContext::new(&d, &sel).unwrap();
        assert!(rule.matches(&ctx, &space));

        let d = doc("a#");
        let ctx = RuleContext::new(&d, &sel).unwrap();
        assert!(!rule.matches(&ctx, &space));
    }

    #[test]
    fn test_offset_is_exact() {
        let rule = KEY_COMMAND_RULES[2];
        let d = doc("**");
        for offset in 0..=2 {
            let sel = Selection::collapsed("a".into(), offset);
            let ctx = RuleContext::new(&d, &sel).unwrap();
            assert_eq!(
                rule.matches(&ctx, &InputEvent::key_command("space")),
                offset == 2
            );
        }
    }

    #[test]
    fn test_rule_ignores_other_event_kind() {
        let d = doc("#");
        let sel = Selection::collapsed("a".into(), 1);
        let ctx = RuleContext::new(&d, &sel).unwrap();
        assert!(!KEY_COMMAND_RULES[0].matches(&ctx, &InputEvent::before_input(' ')));
        assert!(!BEFORE_INPUT_RULES[1].matches(&ctx, &InputEvent::key_command("space")));
    }

    #[test]
    fn test_leading_run_counts_after_trim() {
        assert_eq!(leading_run("**x*", '*'), 2);
        assert_eq!(leading_run("x**", '*'), 0);
        assert_eq!(leading_run("", '*'), 0);
    }

    #[test]
    fn test_fence_descriptor_spans_from_last_fence() {
        let d = doc("a```b```");
        let sel = Selection::collapsed("a".into(), 8);
        let ctx = RuleContext::new(&d, &sel).unwrap();
        let rule = BEFORE_INPUT_RULES[4];
        assert_eq!(
            rule.evaluate(&ctx, &InputEvent::before_input('`')),
            Some(MutationDescriptor::ApplyInlineStyleToRange {
                block: "a".into(),
                start: 5,
                end: 8,
                style: InlineStyle::Highlight,
            })
        );
    }

    #[test]
    fn test_rule_names_are_unique() {
        let names: alloc::collections::BTreeSet<_> = KEY_COMMAND_RULES
            .iter()
            .chain(BEFORE_INPUT_RULES)
            .map(|rule| rule.name)
            .collect();
        assert_eq!(names.len(), KEY_COMMAND_RULES.len() + BEFORE_INPUT_RULES.len());
    }
}

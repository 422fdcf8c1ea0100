//! Shortcut rule engine
//!
//! Stateless dispatch from (document, selection, event) to an optional
//! mutation. Key commands go to the default handler first; only a command it
//! declines reaches the key-command rules. Characters go straight to the
//! before-input rules. Within a table the first matching rule wins.

use alloc::vec::Vec;

use input_types::InputEvent;

use crate::defaults::{KeyCommandHandler, RichTextDefaults};
use crate::document::{Document, DocumentResult};
use crate::mutation::MutationDescriptor;
use crate::rules::{Rule, RuleContext, BEFORE_INPUT_RULES, KEY_COMMAND_RULES};
use crate::selection::Selection;

/// Rule name reported when the default handler claims a command
pub const DEFAULT_HANDLER_RULE: &str = "default-key-command";

/// Result of running the engine on one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Matched {
        rule: &'static str,
        descriptor: MutationDescriptor,
    },
    NoMatch,
}

impl RuleOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, RuleOutcome::Matched { .. })
    }

    pub fn rule(&self) -> Option<&'static str> {
        match self {
            RuleOutcome::Matched { rule, .. } => Some(*rule),
            RuleOutcome::NoMatch => None,
        }
    }

    pub fn descriptor(&self) -> Option<&MutationDescriptor> {
        match self {
            RuleOutcome::Matched { descriptor, .. } => Some(descriptor),
            RuleOutcome::NoMatch => None,
        }
    }

    pub fn into_descriptor(self) -> Option<MutationDescriptor> {
        match self {
            RuleOutcome::Matched { descriptor, .. } => Some(descriptor),
            RuleOutcome::NoMatch => None,
        }
    }
}

/// Ordered rule tables plus the default key-command handler
#[derive(Debug, Clone)]
pub struct ShortcutEngine<D = RichTextDefaults> {
    defaults: D,
    key_command_rules: Vec<Rule>,
    before_input_rules: Vec<Rule>,
}

impl ShortcutEngine<RichTextDefaults> {
    /// Engine with the standard rules and rich-text defaults
    pub fn new() -> Self {
        Self::with_defaults(RichTextDefaults)
    }
}

impl Default for ShortcutEngine<RichTextDefaults> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: KeyCommandHandler> ShortcutEngine<D> {
    /// Engine with the standard rules and a custom default handler
    pub fn with_defaults(defaults: D) -> Self {
        Self::with_rules(defaults, KEY_COMMAND_RULES.to_vec(), BEFORE_INPUT_RULES.to_vec())
    }

    pub fn with_rules(
        defaults: D,
        key_command_rules: Vec<Rule>,
        before_input_rules: Vec<Rule>,
    ) -> Self {
        Self {
            defaults,
            key_command_rules,
            before_input_rules,
        }
    }

    pub fn key_command_rules(&self) -> &[Rule] {
        &self.key_command_rules
    }

    pub fn before_input_rules(&self) -> &[Rule] {
        &self.before_input_rules
    }

    /// Runs a named key command
    pub fn on_key_command(
        &self,
        document: &Document,
        selection: &Selection,
        command: &str,
    ) -> DocumentResult<RuleOutcome> {
        if let Some(descriptor) = self.defaults.handle(document, selection, command) {
            log::debug!("{} claimed by default handler: {}", command, descriptor);
            return Ok(RuleOutcome::Matched {
                rule: DEFAULT_HANDLER_RULE,
                descriptor,
            });
        }
        let event = InputEvent::key_command(command);
        Self::first_match(&self.key_command_rules, document, selection, &event)
    }

    /// Runs a character about to be inserted
    pub fn on_before_input(
        &self,
        document: &Document,
        selection: &Selection,
        ch: char,
    ) -> DocumentResult<RuleOutcome> {
        let event = InputEvent::before_input(ch);
        Self::first_match(&self.before_input_rules, document, selection, &event)
    }

    /// Routes `event` to the matching entry point
    pub fn evaluate(
        &self,
        document: &Document,
        selection: &Selection,
        event: &InputEvent,
    ) -> DocumentResult<RuleOutcome> {
        match event {
            InputEvent::KeyCommand(command) => self.on_key_command(document, selection, command),
            InputEvent::BeforeInput(ch) => self.on_before_input(document, selection, *ch),
        }
    }

    /// Every custom rule that would fire for `event`, ignoring order
    pub fn matching_rules(
        &self,
        document: &Document,
        selection: &Selection,
        event: &InputEvent,
    ) -> DocumentResult<Vec<&Rule>> {
        let ctx = RuleContext::new(document, selection)?;
        let table = match event {
            InputEvent::KeyCommand(_) => &self.key_command_rules,
            InputEvent::BeforeInput(_) => &self.before_input_rules,
        };
        Ok(table.iter().filter(|rule| rule.matches(&ctx, event)).collect())
    }

    fn first_match(
        rules: &[Rule],
        document: &Document,
        selection: &Selection,
        event: &InputEvent,
    ) -> DocumentResult<RuleOutcome> {
        let ctx = RuleContext::new(document, selection)?;
        for rule in rules {
            if let Some(descriptor) = rule.evaluate(&ctx, event) {
                log::debug!("{} matched rule {}: {}", event, rule.name, descriptor);
                return Ok(RuleOutcome::Matched {
                    rule: rule.name,
                    descriptor,
                });
            }
        }
        Ok(RuleOutcome::NoMatch)
    }
}

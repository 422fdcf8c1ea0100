#![no_std]

//! # Editor Core
//!
//! Rich-text document model and markdown-like autoformatting.
//!
//! ## Philosophy
//!
//! - **No_std compatible**: Uses alloc but not std
//! - **Immutable documents**: Every change produces a new `Document` value
//! - **Stateless rules**: Shortcut matching reads only the document and selection it is given
//! - **Mechanism over policy**: Core decides what changes, hosts decide rendering and storage
//!
//! ## Design
//!
//! The core provides:
//! - Document: blocks with types, text and inline style ranges
//! - ShortcutEngine: ordered trigger rules, first match wins
//! - mutation::apply: turns a `MutationDescriptor` into the next document
//! - EditorState: current document, selection, style override and history
//! - raw: round-trippable JSON encoding for persistence

extern crate alloc;

pub mod block;
pub mod defaults;
pub mod document;
pub mod engine;
pub mod mutation;
pub mod raw;
pub mod rules;
pub mod selection;
pub mod state;
pub mod style;
pub mod style_ranges;

pub use block::{Block, BlockKey, BlockType};
pub use defaults::{KeyCommandHandler, NoDefaults, RichTextDefaults};
pub use document::{Document, DocumentError, DocumentResult};
pub use engine::{RuleOutcome, ShortcutEngine, DEFAULT_HANDLER_RULE};
pub use mutation::{apply, Applied, ChangeType, MutationDescriptor};
pub use raw::{RawError, RawResult, SerializedDocument};
pub use rules::{Effect, Rule, RuleContext, RuleKind};
pub use selection::{Position, Selection};
pub use state::{EditorState, DEFAULT_HISTORY_LIMIT};
pub use style::{InlineStyle, StyleSet};
pub use style_ranges::{Span, StyleRanges};

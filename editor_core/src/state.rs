//! Editor state: the current document, its selection, and history
//!
//! `EditorState` is the single owner of the current document version. Every
//! accepted change replaces the document wholesale and records the previous
//! version for undo.

use alloc::string::String;
use alloc::vec::Vec;

use crate::block::BlockKey;
use crate::document::{Document, DocumentResult};
use crate::mutation::{self, ChangeType, MutationDescriptor};
use crate::selection::{Position, Selection};
use crate::style::StyleSet;

/// Undo depth used unless configured otherwise
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Snapshot for undo/redo
#[derive(Debug, Clone)]
struct HistoryEntry {
    document: Document,
    selection: Selection,
    change: ChangeType,
}

/// Current document, selection and undo history
#[derive(Debug, Clone)]
pub struct EditorState {
    document: Document,
    selection: Selection,
    style_override: Option<StyleSet>,
    version: u64,
    last_change: Option<ChangeType>,
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    history_limit: usize,
}

impl EditorState {
    /// Empty document with the cursor in its only block
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Starts editing `document` with the cursor at its very start
    pub fn with_document(document: Document) -> Self {
        let selection = Selection::collapsed(document.first_block().key().clone(), 0);
        Self {
            document,
            selection,
            style_override: None,
            version: 0,
            last_change: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Bumped on every document replacement
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn last_change(&self) -> Option<ChangeType> {
        self.last_change
    }

    pub fn style_override(&self) -> Option<StyleSet> {
        self.style_override
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Moves the selection; clears any pending style override
    pub fn set_selection(&mut self, selection: Selection) -> DocumentResult<()> {
        self.document.selection_bounds(&selection)?;
        self.selection = selection;
        self.style_override = None;
        self.last_change = None;
        Ok(())
    }

    /// Styles the next inserted characters will carry
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(styles) = self.style_override {
            return styles;
        }
        let Ok((start, _)) = self.document.selection_bounds(&self.selection) else {
            return StyleSet::EMPTY;
        };
        let Ok(block) = self.document.block_at(&start.key) else {
            return StyleSet::EMPTY;
        };
        if start.offset > 0 {
            return block.styles_at(start.offset - 1);
        }
        if !block.is_empty() {
            return block.styles_at(0);
        }
        self.document
            .blocks()
            .iter()
            .take_while(|b| b.key() != block.key())
            .filter(|b| !b.is_empty())
            .last()
            .map(|b| b.styles_at(b.len() - 1))
            .unwrap_or(StyleSet::EMPTY)
    }

    /// Applies a mutation produced by the shortcut engine
    ///
    /// Toggling a style on a collapsed selection leaves the document alone and
    /// flips the style in the pending override instead.
    pub fn apply(&mut self, descriptor: &MutationDescriptor) -> DocumentResult<ChangeType> {
        if let MutationDescriptor::ToggleInlineStyle { selection, style } = descriptor {
            if selection.is_collapsed() {
                self.document.block_containing(&selection.anchor)?;
                let styles = self.current_inline_style().toggled(*style);
                self.style_override = Some(styles);
                log::debug!("style override now {}", styles);
                return Ok(ChangeType::ChangeInlineStyle);
            }
        }
        let applied = mutation::apply(&self.document, descriptor)?;
        let selection = self.selection.clone();
        self.push(applied.document, selection, applied.change);
        Ok(applied.change)
    }

    /// Replaces the selection with `text` in the current inline style
    pub fn insert_text(&mut self, text: &str) -> DocumentResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let styles = self.current_inline_style();
        let (start, _) = self.document.selection_bounds(&self.selection)?;
        let base = if self.selection.is_collapsed() {
            self.document.clone()
        } else {
            self.document.with_range_removed(&self.selection)?
        };
        let document = base.with_text_inserted(&start, text, styles)?;
        let cursor = Selection::collapsed(start.key, start.offset + text.chars().count());
        self.push(document, cursor, ChangeType::InsertCharacters);
        Ok(())
    }

    /// Splits the current block at the cursor; the cursor moves to the new block
    pub fn split_block(&mut self) -> DocumentResult<()> {
        let (start, _) = self.document.selection_bounds(&self.selection)?;
        let base = if self.selection.is_collapsed() {
            self.document.clone()
        } else {
            self.document.with_range_removed(&self.selection)?
        };
        let key = fresh_key(&base);
        let document = base.with_block_split(&start, key.clone())?;
        self.push(document, Selection::collapsed(key, 0), ChangeType::SplitBlock);
        Ok(())
    }

    /// Removes the selection, or the character before the cursor
    ///
    /// At the start of a block the block joins the one above. Returns false
    /// when there is nothing to remove.
    pub fn backspace(&mut self) -> DocumentResult<bool> {
        if !self.selection.is_collapsed() {
            self.remove_selection()?;
            return Ok(true);
        }
        let at = self.selection.focus.clone();
        self.document.block_containing(&at)?;
        if at.offset > 0 {
            self.remove_back_to(at.offset - 1)?;
            return Ok(true);
        }
        let Some(before) = self.document.block_before(&at.key) else {
            return Ok(false);
        };
        let joined_at = Position::new(before.key().clone(), before.len());
        let range = Selection::new(joined_at.clone(), at);
        let document = self.document.with_range_removed(&range)?;
        self.push(
            document,
            Selection::collapsed(joined_at.key, joined_at.offset),
            ChangeType::BackspaceCharacter,
        );
        Ok(true)
    }

    /// Removes back to the start of the previous word
    pub fn backspace_word(&mut self) -> DocumentResult<bool> {
        if !self.selection.is_collapsed() || self.selection.focus.offset == 0 {
            return self.backspace();
        }
        let at = self.selection.focus.clone();
        let block = self.document.block_containing(&at)?;
        let chars: Vec<char> = block.text().chars().collect();
        let mut start = at.offset;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !chars[start - 1].is_whitespace() {
            start -= 1;
        }
        self.remove_back_to(start)?;
        Ok(true)
    }

    /// Removes back to the start of the block
    pub fn backspace_to_start_of_line(&mut self) -> DocumentResult<bool> {
        if !self.selection.is_collapsed() || self.selection.focus.offset == 0 {
            return self.backspace();
        }
        self.remove_back_to(0)?;
        Ok(true)
    }

    /// Removes the selection, or the character after the cursor
    ///
    /// At the end of a block the next block joins this one.
    pub fn delete_forward(&mut self) -> DocumentResult<bool> {
        if !self.selection.is_collapsed() {
            self.remove_selection()?;
            return Ok(true);
        }
        let at = self.selection.focus.clone();
        let block = self.document.block_containing(&at)?;
        let end = if at.offset < block.len() {
            Position::new(at.key.clone(), at.offset + 1)
        } else {
            match self.document.block_after(&at.key) {
                Some(after) => Position::start_of(after.key().clone()),
                None => return Ok(false),
            }
        };
        let document = self
            .document
            .with_range_removed(&Selection::new(at.clone(), end))?;
        self.push(
            document,
            Selection::collapsed(at.key, at.offset),
            ChangeType::RemoveRange,
        );
        Ok(true)
    }

    pub fn move_left(&mut self) -> DocumentResult<()> {
        let (start, _) = self.document.selection_bounds(&self.selection)?;
        if !self.selection.is_collapsed() {
            return self.set_selection(Selection::collapsed(start.key, start.offset));
        }
        let target = if start.offset > 0 {
            Position::new(start.key, start.offset - 1)
        } else {
            match self.document.block_before(&start.key) {
                Some(before) => Position::new(before.key().clone(), before.len()),
                None => start,
            }
        };
        self.set_selection(Selection::collapsed(target.key, target.offset))
    }

    pub fn move_right(&mut self) -> DocumentResult<()> {
        let (_, end) = self.document.selection_bounds(&self.selection)?;
        if !self.selection.is_collapsed() {
            return self.set_selection(Selection::collapsed(end.key, end.offset));
        }
        let len = self.document.block_at(&end.key)?.len();
        let target = if end.offset < len {
            Position::new(end.key, end.offset + 1)
        } else {
            match self.document.block_after(&end.key) {
                Some(after) => Position::start_of(after.key().clone()),
                None => end,
            }
        };
        self.set_selection(Selection::collapsed(target.key, target.offset))
    }

    pub fn move_up(&mut self) -> DocumentResult<()> {
        let at = self.selection.focus.clone();
        let target = match self.document.block_before(&at.key) {
            Some(before) => Position::new(before.key().clone(), at.offset.min(before.len())),
            None => Position::start_of(at.key),
        };
        self.set_selection(Selection::collapsed(target.key, target.offset))
    }

    pub fn move_down(&mut self) -> DocumentResult<()> {
        let at = self.selection.focus.clone();
        let target = match self.document.block_after(&at.key) {
            Some(after) => Position::new(after.key().clone(), at.offset.min(after.len())),
            None => {
                let len = self.document.block_at(&at.key)?.len();
                Position::new(at.key, len)
            }
        };
        self.set_selection(Selection::collapsed(target.key, target.offset))
    }

    pub fn move_to_start_of_block(&mut self) -> DocumentResult<()> {
        let key = self.selection.focus.key.clone();
        self.set_selection(Selection::collapsed(key, 0))
    }

    pub fn move_to_end_of_block(&mut self) -> DocumentResult<()> {
        let key = self.selection.focus.key.clone();
        let len = self.document.block_at(&key)?.len();
        self.set_selection(Selection::collapsed(key, len))
    }

    /// Restores the previous document version; false if there is none
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.undo_stack.pop() else {
            return false;
        };
        let current = HistoryEntry {
            document: core::mem::replace(&mut self.document, entry.document),
            selection: core::mem::replace(&mut self.selection, entry.selection),
            change: entry.change,
        };
        self.redo_stack.push(current);
        self.after_history_jump();
        true
    }

    /// Re-applies the last undone version; false if there is none
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        let current = HistoryEntry {
            document: core::mem::replace(&mut self.document, entry.document),
            selection: core::mem::replace(&mut self.selection, entry.selection),
            change: entry.change,
        };
        self.undo_stack.push(current);
        self.after_history_jump();
        true
    }

    /// Plain text of the document, one line per block
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    fn remove_back_to(&mut self, start: usize) -> DocumentResult<()> {
        let at = self.selection.focus.clone();
        let range = Selection::within(at.key.clone(), start, at.offset);
        let document = self.document.with_range_removed(&range)?;
        self.push(
            document,
            Selection::collapsed(at.key, start),
            ChangeType::BackspaceCharacter,
        );
        Ok(())
    }

    fn remove_selection(&mut self) -> DocumentResult<()> {
        let (start, _) = self.document.selection_bounds(&self.selection)?;
        let document = self.document.with_range_removed(&self.selection)?;
        self.push(
            document,
            Selection::collapsed(start.key, start.offset),
            ChangeType::RemoveRange,
        );
        Ok(())
    }

    /// Installs a new document version and records the old one
    fn push(&mut self, document: Document, selection: Selection, change: ChangeType) {
        let coalesce = self.last_change == Some(change)
            && matches!(
                change,
                ChangeType::InsertCharacters | ChangeType::BackspaceCharacter
            )
            && !self.undo_stack.is_empty();

        let previous = core::mem::replace(&mut self.document, document);
        let previous_selection = core::mem::replace(&mut self.selection, selection);
        if !coalesce {
            self.undo_stack.push(HistoryEntry {
                document: previous,
                selection: previous_selection,
                change,
            });
            self.trim_history();
        }
        self.redo_stack.clear();

        if !matches!(change, ChangeType::ChangeBlockType | ChangeType::SplitBlock) {
            self.style_override = None;
        }
        self.last_change = Some(change);
        self.version += 1;
    }

    fn after_history_jump(&mut self) {
        self.style_override = None;
        self.last_change = None;
        self.version += 1;
    }

    fn trim_history(&mut self) {
        if self.undo_stack.len() > self.history_limit {
            let excess = self.undo_stack.len() - self.history_limit;
            self.undo_stack.drain(..excess);
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Block key not yet used in `document`
fn fresh_key(document: &Document) -> BlockKey {
    loop {
        let key = BlockKey::generate();
        if document.index_of(&key).is_err() {
            return key;
        }
    }
}

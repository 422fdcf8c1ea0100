//! Main editor implementation

use editor_core::raw::{self, RawError};
use editor_core::{
    Document, DocumentError, EditorState, MutationDescriptor, RichTextDefaults, RuleOutcome,
    Selection, ShortcutEngine,
};
use input_types::{keymap, HandleResult, InputEvent, KeyEvent};
use services_settings::EditorConfig;
use services_storage::{DocumentStore, StorageError};
use thiserror::Error;

use crate::notice::{Notice, NoticeLog};

/// Acknowledgment shown after a successful user save
pub const SAVE_SUCCESS_MESSAGE: &str = "Content saved successfully!";

/// Editor error
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Raw(#[from] RawError),

    #[error("No storage configured")]
    NoStore,
}

/// Editor result
pub type EditorResult<T> = Result<T, EditorError>;

/// The rich-text editing session
///
/// Owns the current document version. Every accepted change replaces it and
/// notifies the autosave observer. With deferred autosave the observer only
/// marks the session dirty and the host decides when to call
/// [`RichEditor::flush_autosave`].
pub struct RichEditor {
    state: EditorState,
    engine: ShortcutEngine,
    store: Option<Box<dyn DocumentStore>>,
    notices: NoticeLog,
    config: EditorConfig,
    defer_autosave: bool,
    autosave_pending: bool,
}

impl RichEditor {
    /// Opens a session, loading the saved document from `store` if any
    ///
    /// Unreadable saved content starts an empty document.
    pub fn open(store: Option<Box<dyn DocumentStore>>, config: EditorConfig) -> Self {
        let mut notices = NoticeLog::new();
        let saved = store.as_ref().and_then(|store| store.load());
        let document = raw::load_with_fallback(saved.as_ref(), |_| {
            notices.push(Notice::info(
                "Saved content could not be read; starting with an empty document",
                0,
            ));
        });
        if saved.is_some() && notices.is_empty() {
            log::info!("loaded {} blocks from {}", document.len(), config.storage_key);
        }

        let engine = if config.shortcuts {
            ShortcutEngine::new()
        } else {
            ShortcutEngine::with_rules(RichTextDefaults, Vec::new(), Vec::new())
        };

        Self {
            state: EditorState::with_document(document).with_history_limit(config.history_limit),
            engine,
            store,
            notices,
            config,
            defer_autosave: false,
            autosave_pending: false,
        }
    }

    /// Leaves autosave writes to [`RichEditor::flush_autosave`]
    pub fn with_deferred_autosave(mut self) -> Self {
        self.defer_autosave = true;
        self
    }

    /// True when a change is waiting for autosave
    pub fn has_unsaved_changes(&self) -> bool {
        self.autosave_pending
    }

    /// Writes the pending autosave, if any
    ///
    /// Returns true when something was written. A failed write is recorded as
    /// an error notice and stays pending.
    pub fn flush_autosave(&mut self) -> bool {
        if !self.autosave_pending {
            return false;
        }
        match self.persist() {
            Ok(()) => {
                self.autosave_pending = false;
                true
            }
            Err(err) => {
                log::warn!("autosave failed: {}", err);
                self.notify(Notice::error(
                    format!("Autosave failed: {}", err),
                    self.state.version(),
                ));
                false
            }
        }
    }

    /// Session without persistence
    pub fn in_memory(config: EditorConfig) -> Self {
        Self::open(None, config)
    }

    /// Get current editor state
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        self.state.document()
    }

    pub fn selection(&self) -> &Selection {
        self.state.selection()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    pub fn store(&self) -> Option<&dyn DocumentStore> {
        self.store.as_deref()
    }

    /// Moves the cursor or selection
    pub fn set_selection(&mut self, selection: Selection) -> EditorResult<()> {
        self.state.set_selection(selection)?;
        Ok(())
    }

    /// Runs a named key command through the shortcut engine
    pub fn handle_key_command(&mut self, command: &str) -> EditorResult<HandleResult> {
        let outcome =
            self.engine
                .on_key_command(self.state.document(), self.state.selection(), command)?;
        self.accept(outcome)
    }

    /// Runs a character about to be inserted through the shortcut engine
    pub fn handle_before_input(&mut self, ch: char) -> EditorResult<HandleResult> {
        let outcome = self
            .engine
            .on_before_input(self.state.document(), self.state.selection(), ch)?;
        self.accept(outcome)
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> EditorResult<HandleResult> {
        match event {
            InputEvent::KeyCommand(command) => self.handle_key_command(command),
            InputEvent::BeforeInput(ch) => self.handle_before_input(*ch),
        }
    }

    /// Processes a raw key press the way the text widget would
    ///
    /// The bound command goes to the engine first, then to the built-in
    /// editing commands. A printable key then goes through before-input and,
    /// if nothing claims it, is inserted in the current inline style.
    pub fn process_key(&mut self, event: &KeyEvent) -> EditorResult<HandleResult> {
        if !event.is_press() {
            return Ok(HandleResult::NotHandled);
        }

        if let Some(command) = keymap::key_command(event) {
            if self.handle_key_command(command)?.is_handled() {
                return Ok(HandleResult::Handled);
            }
            if self.run_builtin(command)? {
                return Ok(HandleResult::Handled);
            }
        }

        let Some(ch) = keymap::text_for(event) else {
            return Ok(HandleResult::NotHandled);
        };
        if self.handle_before_input(ch)?.is_handled() {
            return Ok(HandleResult::Handled);
        }
        self.insert_text(&ch.to_string())?;
        Ok(HandleResult::Handled)
    }

    /// Inserts `text` at the cursor without consulting the shortcut rules
    pub fn insert_text(&mut self, text: &str) -> EditorResult<()> {
        let before = self.state.version();
        self.state.insert_text(text)?;
        self.after_change(before);
        Ok(())
    }

    /// Types `text` one character at a time through before-input
    pub fn type_text(&mut self, text: &str) -> EditorResult<()> {
        for ch in text.chars() {
            if !self.handle_before_input(ch)?.is_handled() {
                self.insert_text(&ch.to_string())?;
            }
        }
        Ok(())
    }

    /// Applies a mutation directly, bypassing the rules
    pub fn apply(&mut self, descriptor: &MutationDescriptor) -> EditorResult<()> {
        let before = self.state.version();
        self.state.apply(descriptor)?;
        self.after_change(before);
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        let before = self.state.version();
        let undone = self.state.undo();
        self.after_change(before);
        undone
    }

    pub fn redo(&mut self) -> bool {
        let before = self.state.version();
        let redone = self.state.redo();
        self.after_change(before);
        redone
    }

    /// The user save action
    ///
    /// Records a success notice, or an error notice before returning the
    /// error. The in-memory document is untouched either way.
    pub fn save(&mut self) -> EditorResult<()> {
        match self.persist() {
            Ok(()) => {
                self.autosave_pending = false;
                log::info!("saved version {}", self.state.version());
                self.notify(Notice::success(SAVE_SUCCESS_MESSAGE, self.state.version()));
                Ok(())
            }
            Err(err) => {
                log::warn!("save failed: {}", err);
                self.notify(Notice::error(
                    format!("Save failed: {}", err),
                    self.state.version(),
                ));
                Err(err)
            }
        }
    }

    fn persist(&mut self) -> EditorResult<()> {
        let serialized = raw::serialize(self.state.document())?;
        let store = self.store.as_mut().ok_or(EditorError::NoStore)?;
        store.save(&serialized)?;
        Ok(())
    }

    fn accept(&mut self, outcome: RuleOutcome) -> EditorResult<HandleResult> {
        let RuleOutcome::Matched { rule, descriptor } = outcome else {
            return Ok(HandleResult::NotHandled);
        };
        let before = self.state.version();
        match self.state.apply(&descriptor) {
            Ok(change) => {
                log::debug!("{} applied {} ({})", rule, descriptor, change);
                self.after_change(before);
                Ok(HandleResult::Handled)
            }
            Err(err) => {
                log::error!("aborting {} from {}: {}", descriptor, rule, err);
                Err(err.into())
            }
        }
    }

    /// Editing commands the widget performs itself when no rule claims them
    fn run_builtin(&mut self, command: &str) -> EditorResult<bool> {
        let before = self.state.version();
        let handled = match command {
            "split-block" => {
                self.state.split_block()?;
                true
            }
            "backspace" => self.state.backspace()?,
            "backspace-word" => self.state.backspace_word()?,
            "backspace-to-start-of-line" => self.state.backspace_to_start_of_line()?,
            "delete" => self.state.delete_forward()?,
            "move-left" => {
                self.state.move_left()?;
                true
            }
            "move-right" => {
                self.state.move_right()?;
                true
            }
            "move-up" => {
                self.state.move_up()?;
                true
            }
            "move-down" => {
                self.state.move_down()?;
                true
            }
            "move-to-start-of-block" => {
                self.state.move_to_start_of_block()?;
                true
            }
            "move-to-end-of-block" => {
                self.state.move_to_end_of_block()?;
                true
            }
            "undo" => self.state.undo(),
            "redo" => self.state.redo(),
            "save" => {
                // Failure is already recorded as a notice
                let _ = self.save();
                true
            }
            _ => false,
        };
        self.after_change(before);
        Ok(handled)
    }

    /// Autosave observer, run after anything that may have changed the document
    fn after_change(&mut self, version_before: u64) {
        if self.state.version() == version_before || !self.config.autosave {
            return;
        }
        if self.store.is_none() {
            return;
        }
        self.autosave_pending = true;
        if !self.defer_autosave {
            self.flush_autosave();
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

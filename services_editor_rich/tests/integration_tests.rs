//! Integration tests for the rich-text editing session

use editor_core::raw;
use editor_core::{BlockType, InlineStyle, Selection};
use input_types::{keymap, HandleResult, InputEvent, KeyCode, KeyEvent, Modifiers};
use services_editor_rich::{EditorError, NoticeLevel, RichEditor, SAVE_SUCCESS_MESSAGE};
use services_settings::EditorConfig;
use services_storage::{
    DocumentStore, FailingStore, FailurePolicy, FileStore, KeyValueDocumentStore, MemoryStore,
};
use tempfile::tempdir;

fn memory_store() -> Box<dyn DocumentStore> {
    Box::new(KeyValueDocumentStore::new(MemoryStore::new(), "editorContent"))
}

fn failing_store(policy: FailurePolicy) -> Box<dyn DocumentStore> {
    Box::new(KeyValueDocumentStore::new(
        FailingStore::new(MemoryStore::new(), policy),
        "editorContent",
    ))
}

fn type_keys(editor: &mut RichEditor, text: &str) {
    for ch in text.chars() {
        editor.process_key(&keymap::key_for_char(ch)).unwrap();
    }
}

fn press(editor: &mut RichEditor, code: KeyCode, modifiers: Modifiers) -> HandleResult {
    editor
        .process_key(&KeyEvent::pressed(code, modifiers))
        .unwrap()
}

#[test]
fn test_user_save_reports_success() {
    let mut editor = RichEditor::open(Some(memory_store()), EditorConfig::default());
    type_keys(&mut editor, "hello");

    editor.save().unwrap();

    let latest = editor.notices().latest().unwrap();
    assert_eq!(latest.level, NoticeLevel::Success);
    assert_eq!(latest.message, SAVE_SUCCESS_MESSAGE);
}

#[test]
fn test_ctrl_s_saves() {
    let mut editor = RichEditor::open(Some(memory_store()), EditorConfig::default());
    type_keys(&mut editor, "x");
    assert!(press(&mut editor, KeyCode::S, Modifiers::CTRL).is_handled());
    assert_eq!(
        editor.notices().latest().map(|n| n.message.as_str()),
        Some(SAVE_SUCCESS_MESSAGE)
    );
}

#[test]
fn test_autosave_after_every_change() {
    let mut editor = RichEditor::open(Some(memory_store()), EditorConfig::default());
    type_keys(&mut editor, "ab");

    let saved = editor.store().and_then(|store| store.load()).unwrap();
    let loaded = raw::deserialize(&saved).unwrap();
    assert_eq!(loaded.plain_text(), "ab");
    assert!(editor.notices().is_empty());
}

#[test]
fn test_autosave_disabled() {
    let config = EditorConfig {
        autosave: false,
        ..EditorConfig::default()
    };
    let mut editor = RichEditor::open(Some(memory_store()), config);
    type_keys(&mut editor, "ab");
    assert!(editor.store().and_then(|store| store.load()).is_none());

    editor.save().unwrap();
    assert!(editor.store().and_then(|store| store.load()).is_some());
}

#[test]
fn test_deferred_autosave_waits_for_flush() {
    let mut editor =
        RichEditor::open(Some(memory_store()), EditorConfig::default()).with_deferred_autosave();
    type_keys(&mut editor, "ab");
    assert!(editor.has_unsaved_changes());
    assert!(editor.store().and_then(|store| store.load()).is_none());

    assert!(editor.flush_autosave());
    assert!(!editor.has_unsaved_changes());
    let saved = editor.store().and_then(|store| store.load()).unwrap();
    assert_eq!(raw::deserialize(&saved).unwrap().plain_text(), "ab");

    // Nothing left to write
    assert!(!editor.flush_autosave());
}

#[test]
fn test_deferred_autosave_failure_stays_pending() {
    let mut editor = RichEditor::open(
        Some(failing_store(FailurePolicy::Always)),
        EditorConfig::default(),
    )
    .with_deferred_autosave();
    type_keys(&mut editor, "kept");
    assert!(editor.notices().is_empty());

    assert!(!editor.flush_autosave());
    assert!(editor.has_unsaved_changes());
    assert_eq!(editor.notices().by_level(NoticeLevel::Error).len(), 1);
    assert_eq!(editor.document().plain_text(), "kept");
}

#[test]
fn test_user_save_clears_pending_autosave() {
    let mut editor =
        RichEditor::open(Some(memory_store()), EditorConfig::default()).with_deferred_autosave();
    type_keys(&mut editor, "x");
    editor.save().unwrap();
    assert!(!editor.has_unsaved_changes());
    assert!(!editor.flush_autosave());
}

#[test]
fn test_save_failure_keeps_document() {
    let mut editor = RichEditor::open(
        Some(failing_store(FailurePolicy::Always)),
        EditorConfig::default(),
    );
    type_keys(&mut editor, "kept");

    // Each autosave failed and said so
    assert_eq!(editor.notices().by_level(NoticeLevel::Error).len(), 4);
    assert_eq!(editor.document().plain_text(), "kept");

    let err = editor.save().unwrap_err();
    assert!(matches!(err, EditorError::Storage(_)));
    assert_eq!(editor.document().plain_text(), "kept");
    assert_eq!(
        editor.notices().latest().map(|n| n.level),
        Some(NoticeLevel::Error)
    );
}

#[test]
fn test_quota_exceeded_is_reported() {
    let mut editor = RichEditor::open(
        Some(failing_store(FailurePolicy::QuotaBytes(16))),
        EditorConfig::default(),
    );
    editor.insert_text("too big for the quota").unwrap();

    let latest = editor.notices().latest().unwrap();
    assert_eq!(latest.level, NoticeLevel::Error);
    assert!(latest.message.contains("Quota exceeded"));
}

#[test]
fn test_malformed_saved_content_starts_empty() {
    let mut store = KeyValueDocumentStore::new(MemoryStore::new(), "editorContent");
    store
        .save(&editor_core::SerializedDocument::from_json("{not json"))
        .unwrap();

    let editor = RichEditor::open(Some(Box::new(store)), EditorConfig::default());
    assert_eq!(editor.document().len(), 1);
    assert_eq!(editor.document().plain_text(), "");
    assert_eq!(
        editor.notices().latest().map(|n| n.level),
        Some(NoticeLevel::Info)
    );
    assert_eq!(editor.notices().len(), 1);
}

#[test]
fn test_saved_content_loads_without_notice() {
    let mut writer = RichEditor::open(Some(memory_store()), EditorConfig::default());
    type_keys(&mut writer, "kept");
    let saved = writer.store().and_then(|store| store.load()).unwrap();

    let mut store = KeyValueDocumentStore::new(MemoryStore::new(), "editorContent");
    store.save(&saved).unwrap();
    let editor = RichEditor::open(Some(Box::new(store)), EditorConfig::default());
    assert_eq!(editor.document().plain_text(), "kept");
    assert!(editor.notices().is_empty());
}

#[test]
fn test_session_round_trip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("editor-content.json");
    let open_file = || -> Box<dyn DocumentStore> {
        Box::new(KeyValueDocumentStore::new(
            FileStore::open(&path).unwrap(),
            "editorContent",
        ))
    };

    let document = {
        let mut editor = RichEditor::open(Some(open_file()), EditorConfig::default());
        type_keys(&mut editor, "#");
        type_keys(&mut editor, "Title");
        press(&mut editor, KeyCode::Enter, Modifiers::none());
        type_keys(&mut editor, "** red");
        editor.document().clone()
    };

    let reopened = RichEditor::open(Some(open_file()), EditorConfig::default());
    assert_eq!(reopened.document(), &document);

    let blocks = reopened.document().blocks();
    assert_eq!(blocks[0].block_type(), BlockType::HeaderOne);
    assert_eq!(blocks[0].text(), "Title");
    assert_eq!(blocks[1].block_type(), BlockType::Unstyled);
    assert_eq!(blocks[1].text(), "**red");
    assert!(blocks[1].styles_at(2).contains(InlineStyle::ColorRed));
}

#[test]
fn test_fence_highlight_through_session() {
    let mut editor = RichEditor::in_memory(EditorConfig::default());
    editor.insert_text("ab```cd```").unwrap();

    let result = editor.handle_input(&InputEvent::before_input('`')).unwrap();
    assert_eq!(result, HandleResult::Handled);

    let block = &editor.document().blocks()[0];
    assert_eq!(block.text(), "ab```cd```");
    for offset in 7..10 {
        assert!(block.styles_at(offset).contains(InlineStyle::Highlight));
    }
    assert!(!block.styles_at(6).contains(InlineStyle::Highlight));
}

#[test]
fn test_bold_toggle_over_range_and_undo() {
    let mut editor = RichEditor::in_memory(EditorConfig::default());
    editor.insert_text("word").unwrap();
    let key = editor.document().blocks()[0].key().clone();
    editor.set_selection(Selection::within(key, 0, 4)).unwrap();

    assert!(press(&mut editor, KeyCode::B, Modifiers::CTRL).is_handled());
    assert!(editor.document().blocks()[0]
        .styles_at(0)
        .contains(InlineStyle::Bold));

    assert!(press(&mut editor, KeyCode::Z, Modifiers::CTRL).is_handled());
    assert!(editor.document().blocks()[0].styles_at(0).is_empty());

    assert!(editor.redo());
    assert!(editor.document().blocks()[0]
        .styles_at(3)
        .contains(InlineStyle::Bold));
}

#[test]
fn test_backspace_resets_header() {
    let mut editor = RichEditor::in_memory(EditorConfig::default());
    type_keys(&mut editor, "#");
    assert_eq!(editor.document().blocks()[0].block_type(), BlockType::HeaderOne);

    assert!(press(&mut editor, KeyCode::Backspace, Modifiers::none()).is_handled());
    assert_eq!(editor.document().blocks()[0].block_type(), BlockType::Unstyled);
}

#[test]
fn test_invalid_selection_is_rejected() {
    let mut editor = RichEditor::in_memory(EditorConfig::default());
    let before = editor.selection().clone();
    let err = editor
        .set_selection(Selection::collapsed("missing".into(), 0))
        .unwrap_err();
    assert!(matches!(err, EditorError::Document(_)));
    assert_eq!(editor.selection(), &before);
}

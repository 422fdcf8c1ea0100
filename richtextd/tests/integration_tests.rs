//! Integration tests for the richtextd host runtime

use editor_core::raw;
use editor_core::{BlockType, InlineStyle};
use input_types::keymap;
use richtextd::{HostRuntime, HostRuntimeConfig, HostRuntimeError, ScriptedInput};
use services_storage::{DocumentStore, FileStore, KeyValueDocumentStore};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn config(script: &str, store: &Path) -> HostRuntimeConfig {
    HostRuntimeConfig {
        script: Some(script.to_string()),
        store_path: Some(store.to_path_buf()),
        config_path: None,
        plain: true,
        save_on_exit: false,
    }
}

const HEADING_AND_BOLD: &str = r##"
    # Heading, then a bold line
    "#"
    "Notes"
    Enter
    "* bold"
    save
"##;

#[test]
fn test_scripted_session_renders_and_saves() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store.json");

    let mut runtime = HostRuntime::new(config(HEADING_AND_BOLD, &store)).unwrap();
    let output = runtime.run().unwrap();

    assert!(output.starts_with("# Notes\n*bold|\n"));
    assert!(output.ends_with("[SUCCESS] Content saved successfully!\n"));
    assert_eq!(runtime.steps(), 1 + 5 + 1 + 6 + 1);

    let reopened = KeyValueDocumentStore::new(FileStore::open(&store).unwrap(), "editorContent");
    let document = raw::load_or_empty(reopened.load().as_ref());
    assert_eq!(&document, runtime.editor().document());

    let blocks = document.blocks();
    assert_eq!(blocks[0].block_type(), BlockType::HeaderOne);
    assert!(blocks[1].styles_at(1).contains(InlineStyle::Bold));
    assert!(!blocks[1].styles_at(0).contains(InlineStyle::Bold));
}

#[test]
fn test_session_resumes_from_store() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store.json");

    HostRuntime::new(config(HEADING_AND_BOLD, &store))
        .unwrap()
        .run()
        .unwrap();

    let mut runtime = HostRuntime::new(config("End\n\"!\"", &store)).unwrap();
    let output = runtime.run().unwrap();
    // Cursor starts in the first block
    assert!(output.starts_with("# Notes!|\n*bold\n"));
}

#[test]
fn test_ansi_output() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store.json");
    let mut cfg = config("\"* b\"", &store);
    cfg.plain = false;

    let output = HostRuntime::new(cfg).unwrap().run().unwrap();
    assert!(output.starts_with("*\x1b[1mb\x1b[0m|\n"));
}

#[test]
fn test_overrides_file_disables_shortcuts() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store.json");
    let settings = dir.path().join("settings.json");
    fs::write(
        &settings,
        r#"{"version": 1, "overrides": {"editor.shortcuts": false, "editor.autosave": false}}"#,
    )
    .unwrap();

    let mut cfg = config("\"# x\"", &store);
    cfg.config_path = Some(settings);
    let mut runtime = HostRuntime::new(cfg).unwrap();
    let output = runtime.run().unwrap();

    assert!(output.starts_with("# x|\n"));
    assert_eq!(
        runtime.editor().document().blocks()[0].block_type(),
        BlockType::Unstyled
    );
    // Autosave was off and nothing asked to save
    assert!(!store.exists());
}

#[test]
fn test_save_on_exit() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store.json");
    let settings = dir.path().join("settings.json");
    fs::write(
        &settings,
        r#"{"version": 1, "overrides": {"editor.autosave": false}}"#,
    )
    .unwrap();

    let mut cfg = config("\"hi\"", &store);
    cfg.config_path = Some(settings);
    cfg.save_on_exit = true;
    let output = HostRuntime::new(cfg).unwrap().run().unwrap();

    assert!(output.ends_with("[SUCCESS] Content saved successfully!\n"));
    assert!(store.exists());
}

#[test]
fn test_missing_config_file() {
    let dir = tempdir().unwrap();
    let mut cfg = config("a", &dir.path().join("store.json"));
    cfg.config_path = Some(dir.path().join("missing.json"));
    assert!(matches!(
        HostRuntime::new(cfg),
        Err(HostRuntimeError::Read { .. })
    ));
}

#[test]
fn test_bad_script() {
    let dir = tempdir().unwrap();
    let cfg = config("NotAKey", &dir.path().join("store.json"));
    assert!(matches!(
        HostRuntime::new(cfg),
        Err(HostRuntimeError::Script(_))
    ));
}

#[test]
fn test_corrupted_store_starts_empty() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store.json");
    fs::write(&store, "garbage").unwrap();

    let mut runtime = HostRuntime::new(config("\"ok\"", &store)).unwrap();
    let output = runtime.run().unwrap();
    assert!(output.starts_with("ok|\n"));

    // The autosave at the end of the run replaced the unreadable file
    assert!(FileStore::open(&store).is_ok());
}

#[test]
fn test_autosave_is_flushed_when_the_run_ends() {
    let dir = tempdir().unwrap();
    let store = dir.path().join("store.json");

    let mut runtime = HostRuntime::new(config("\"b\"", &store)).unwrap();
    runtime
        .step(&ScriptedInput::Key(keymap::key_for_char('a')))
        .unwrap();
    assert!(runtime.editor().has_unsaved_changes());
    assert!(!store.exists());

    runtime.run().unwrap();
    assert!(!runtime.editor().has_unsaved_changes());

    let reopened = KeyValueDocumentStore::new(FileStore::open(&store).unwrap(), "editorContent");
    let document = raw::load_or_empty(reopened.load().as_ref());
    assert_eq!(document.plain_text(), "ab");
}

//! # Rich-Text Editor Service
//!
//! The editing session behind a rich-text widget with markdown-like
//! autoformatting.
//!
//! ## Philosophy
//!
//! - **One owner**: The session exclusively owns the current document version
//! - **Handled or not**: Every event answers synchronously whether the widget should suppress its default
//! - **Best-effort saves**: A failed save is reported, never rolled back
//! - **Testable**: Storage is injected; sessions run headless under scripted key events
//!
//! ## Design
//!
//! - Key commands and before-input characters go through the `ShortcutEngine`
//! - Unhandled keys fall back to the built-in editing commands and plain insertion
//! - After each accepted change the autosave observer hands the document to the store
//! - User-facing outcomes are recorded as notices

pub mod editor;
pub mod notice;

pub use editor::{EditorError, EditorResult, RichEditor, SAVE_SUCCESS_MESSAGE};
pub use notice::{Notice, NoticeLevel, NoticeLog, MAX_NOTICE_HISTORY};

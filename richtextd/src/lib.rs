//! # Rich-Text Host Runtime
//!
//! Runs the rich-text editor headless: scripted key presses in, rendered
//! frames out.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: The session never prints; the host renders frames
//! - **Input is explicit events**: Scripts expand to key presses, not byte streams
//! - **Deterministic mode is first-class**: Same script, same document
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Loads settings and their overrides file
//! - Opens the file store and the editing session
//! - Feeds scripted input through the session
//! - Renders the final frame and the latest notice

pub mod input_script;
pub mod runtime;

pub use input_script::{InputScript, InputScriptError, ScriptedInput};
pub use runtime::{HostRuntime, HostRuntimeConfig, HostRuntimeError};

//! # Input Script Parser
//!
//! Provides a simple scripted input format for deterministic testing and demos.
//!
//! ## Format
//!
//! Scripts are line-based, with each line representing one input action:
//! - Key names: `Enter`, `Backspace`, `Delete`, `Tab`, `Space`, `Home`, `End`
//! - Arrow keys: `Up`, `Down`, `Left`, `Right`
//! - Single characters: `a`, `A`, `*`, `` ` ``
//! - Modifiers: `Ctrl+b`, `Alt+Backspace`, `Ctrl+Shift+z`
//! - Text strings: `"Hello World"` (expanded to individual key presses)
//! - `save`: the user save action
//! - Comments: `# This is a comment` (type a literal hash with `"#"`)
//!
//! ## Example
//!
//! ```text
//! # Heading, then a bold line
//! "#"
//! "Notes"
//! Enter
//! "* bold text"
//! save
//! ```

use input_types::{keymap, KeyCode, KeyEvent, Modifiers};
use std::collections::VecDeque;
use thiserror::Error;

/// Input script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputScriptError {
    #[error("Invalid key name: {0}")]
    InvalidKeyName(String),

    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),

    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,
}

/// A single scripted input action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedInput {
    /// A single key press
    Key(KeyEvent),
    /// The user save action
    Save,
}

impl ScriptedInput {
    fn key(code: KeyCode, modifiers: Modifiers) -> Self {
        ScriptedInput::Key(KeyEvent::pressed(code, modifiers))
    }
}

/// Input script
///
/// Parses and provides scripted input events for deterministic testing.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    inputs: VecDeque<ScriptedInput>,
}

impl InputScript {
    /// Creates a new empty input script
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, InputScriptError> {
        let mut inputs = VecDeque::new();

        for (line_num, line) in text.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            inputs.extend(Self::parse_line(line, line_num + 1)?);
        }

        if inputs.is_empty() {
            return Err(InputScriptError::EmptyScript);
        }

        Ok(Self { inputs })
    }

    /// Parses a single line of script
    fn parse_line(line: &str, line_num: usize) -> Result<Vec<ScriptedInput>, InputScriptError> {
        if line.eq_ignore_ascii_case("save") {
            return Ok(vec![ScriptedInput::Save]);
        }

        // Quoted strings
        if let Some(text) = line
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            return Ok(text
                .chars()
                .map(|ch| ScriptedInput::Key(keymap::key_for_char(ch)))
                .collect());
        }

        // Single key or key with modifiers
        let (modifiers, key_name) = Self::parse_modifiers(line)?;
        let (code, implied) =
            Self::parse_keycode(key_name).map_err(|e| InputScriptError::ParseError {
                line: line_num,
                message: e.to_string(),
            })?;

        Ok(vec![ScriptedInput::key(code, modifiers.with(implied))])
    }

    /// Parses modifiers from a key string (e.g., "Ctrl+b" → (Modifiers::CTRL, "b"))
    ///
    /// A lone `+` is the plus key, not a separator.
    fn parse_modifiers(input: &str) -> Result<(Modifiers, &str), InputScriptError> {
        let mut modifiers = Modifiers::none();
        let Some((prefix, key)) = input.rsplit_once('+') else {
            return Ok((modifiers, input));
        };
        let (prefix, key) = if key.is_empty() {
            // "Ctrl++" or "+"
            match prefix.strip_suffix('+') {
                Some(rest) => (rest, "+"),
                None if prefix.is_empty() => return Ok((modifiers, input)),
                None => (prefix, "+"),
            }
        } else {
            (prefix, key)
        };
        if prefix.is_empty() {
            return Ok((modifiers, key));
        }

        for modifier_str in prefix.split('+') {
            modifiers = match modifier_str.trim().to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.with(Modifiers::CTRL),
                "alt" | "option" => modifiers.with(Modifiers::ALT),
                "shift" => modifiers.with(Modifiers::SHIFT),
                "super" | "meta" | "cmd" => modifiers.with(Modifiers::META),
                other => return Err(InputScriptError::InvalidModifier(other.to_string())),
            };
        }

        Ok((modifiers, key.trim()))
    }

    /// Parses a key name to a KeyCode plus any modifier the key implies
    fn parse_keycode(name: &str) -> Result<(KeyCode, Modifiers), InputScriptError> {
        let none = Modifiers::none();
        let code = match name.to_lowercase().as_str() {
            // Special keys
            "enter" | "return" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "backspace" | "back" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Space,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,

            // Arrow keys
            "up" | "arrowup" => KeyCode::Up,
            "down" | "arrowdown" => KeyCode::Down,
            "left" | "arrowleft" => KeyCode::Left,
            "right" | "arrowright" => KeyCode::Right,

            // Single character
            _ => {
                let mut chars = name.chars();
                return match (chars.next(), chars.next()) {
                    (Some(ch), None) => {
                        let event = keymap::key_for_char(ch);
                        if event.code == KeyCode::Unknown {
                            Err(InputScriptError::InvalidKeyName(name.to_string()))
                        } else {
                            Ok((event.code, event.modifiers))
                        }
                    }
                    _ => Err(InputScriptError::InvalidKeyName(name.to_string())),
                };
            }
        };
        Ok((code, none))
    }

    /// Returns the next input, if any
    pub fn next_input(&mut self) -> Option<ScriptedInput> {
        self.inputs.pop_front()
    }

    /// Returns true if the script has more inputs
    pub fn has_more(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// Returns the number of remaining inputs
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

impl Iterator for InputScript {
    type Item = ScriptedInput;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_input()
    }
}

#![no_std]

//! # Input Types
//!
//! This crate defines the input events the rich-text editor reacts to.
//!
//! ## Philosophy
//!
//! - **Events, not bytes**: Input is structured events, not raw scan codes or byte streams
//! - **Two levels**: Raw [`KeyEvent`]s from the widget, and the [`InputEvent`]s
//!   derived from them (a named key command, or a character about to be inserted)
//! - **Testable**: Events are serializable and can be injected for testing
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - Raw hardware scan codes (PS/2, USB HID)
//! - IME composition
//! - Global keyboard state

extern crate alloc;

pub mod keymap;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Input event routed into the shortcut engine
///
/// The widget raises a `KeyCommand` before it finalizes default key handling,
/// and a `BeforeInput` before it inserts a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Named command derived from a key press (e.g. `"space"`, `"bold"`)
    KeyCommand(String),
    /// A single character about to be inserted
    BeforeInput(char),
}

impl InputEvent {
    /// Creates a key command event
    pub fn key_command(name: impl Into<String>) -> Self {
        Self::KeyCommand(name.into())
    }

    /// Creates a before-input event
    pub fn before_input(ch: char) -> Self {
        Self::BeforeInput(ch)
    }

    /// Returns the command name if this is a key command
    pub fn as_command(&self) -> Option<&str> {
        match self {
            Self::KeyCommand(name) => Some(name.as_str()),
            Self::BeforeInput(_) => None,
        }
    }

    /// Returns the character if this is a before-input event
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::BeforeInput(ch) => Some(*ch),
            Self::KeyCommand(_) => None,
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyCommand(name) => write!(f, "command:{}", name),
            Self::BeforeInput(ch) => write!(f, "input:{:?}", ch),
        }
    }
}

/// Answer returned to the widget for every event
///
/// `Handled` suppresses the widget's default behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleResult {
    Handled,
    NotHandled,
}

impl HandleResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Handled => "handled",
            Self::NotHandled => "not-handled",
        }
    }

    pub fn is_handled(&self) -> bool {
        *self == Self::Handled
    }
}

impl fmt::Display for HandleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyboard event
///
/// Represents a single keyboard state change (key press, release, or repeat).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that was pressed/released
    pub code: KeyCode,
    /// Modifier keys that were active
    pub modifiers: Modifiers,
    /// Event state (pressed, released, repeat)
    pub state: KeyState,
    /// Text the platform reports for this key, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl KeyEvent {
    /// Creates a new key event
    pub fn new(code: KeyCode, modifiers: Modifiers, state: KeyState) -> Self {
        Self {
            code,
            modifiers,
            state,
            text: None,
        }
    }

    /// Creates a key pressed event
    pub fn pressed(code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(code, modifiers, KeyState::Pressed)
    }

    /// Creates a key released event
    pub fn released(code: KeyCode, modifiers: Modifiers) -> Self {
        Self::new(code, modifiers, KeyState::Released)
    }

    /// Attaches platform text to this key event
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns true for press and repeat events
    pub fn is_press(&self) -> bool {
        matches!(self.state, KeyState::Pressed | KeyState::Repeat)
    }
}

/// Key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    /// Key was pressed down
    Pressed,
    /// Key was released
    Released,
    /// Key is auto-repeating
    Repeat,
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => write!(f, "pressed"),
            Self::Released => write!(f, "released"),
            Self::Repeat => write!(f, "repeat"),
        }
    }
}

/// Logical key codes, not hardware scan codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Editing keys
    Escape,
    Tab,
    Space,
    Enter,
    Backspace,
    Delete,
    Home,
    End,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Punctuation and symbols
    Minus,
    Equal,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    Grave,

    // Unknown/unmapped key
    Unknown,
}

impl KeyCode {
    /// Letter key for an ASCII letter (either case)
    pub fn letter(ch: char) -> Option<Self> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::A,
            KeyCode::B,
            KeyCode::C,
            KeyCode::D,
            KeyCode::E,
            KeyCode::F,
            KeyCode::G,
            KeyCode::H,
            KeyCode::I,
            KeyCode::J,
            KeyCode::K,
            KeyCode::L,
            KeyCode::M,
            KeyCode::N,
            KeyCode::O,
            KeyCode::P,
            KeyCode::Q,
            KeyCode::R,
            KeyCode::S,
            KeyCode::T,
            KeyCode::U,
            KeyCode::V,
            KeyCode::W,
            KeyCode::X,
            KeyCode::Y,
            KeyCode::Z,
        ];
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let index = (ch.to_ascii_lowercase() as u8 - b'a') as usize;
        Some(LETTERS[index])
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Modifier keys
///
/// Bitflags representing modifier key states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self { bits: 0 };
    /// Control key
    pub const CTRL: Self = Self { bits: 1 << 0 };
    /// Alt key
    pub const ALT: Self = Self { bits: 1 << 1 };
    /// Shift key
    pub const SHIFT: Self = Self { bits: 1 << 2 };
    /// Meta/Super/Command key
    pub const META: Self = Self { bits: 1 << 3 };

    /// Creates a new modifier set with no modifiers
    pub fn none() -> Self {
        Self::NONE
    }

    /// Adds a modifier
    pub fn with(mut self, other: Modifiers) -> Self {
        self.bits |= other.bits;
        self
    }

    /// Checks if a modifier is present
    pub fn contains(&self, other: Modifiers) -> bool {
        (self.bits & other.bits) == other.bits
    }

    pub fn is_ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    pub fn is_alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    pub fn is_shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    pub fn is_meta(&self) -> bool {
        self.contains(Self::META)
    }

    /// Ctrl on most platforms, Command on macOS
    pub fn is_command(&self) -> bool {
        self.is_ctrl() || self.is_meta()
    }

    /// Returns true if no modifiers are pressed
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }

        let mut parts = Vec::new();
        if self.is_ctrl() {
            parts.push("Ctrl");
        }
        if self.is_alt() {
            parts.push("Alt");
        }
        if self.is_shift() {
            parts.push("Shift");
        }
        if self.is_meta() {
            parts.push("Meta");
        }
        write!(f, "{}", parts.join("+"))
    }
}

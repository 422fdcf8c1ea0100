//! Default key bindings
//!
//! Maps raw key presses to the named commands and inserted characters the
//! editor sees. Layout is US QWERTY.

use crate::{KeyCode, KeyEvent, Modifiers};

/// Named command for a key press, if the key is bound to one
pub fn key_command(event: &KeyEvent) -> Option<&'static str> {
    let mods = event.modifiers;

    if mods.is_command() {
        return match event.code {
            KeyCode::B => Some("bold"),
            KeyCode::I => Some("italic"),
            KeyCode::U => Some("underline"),
            KeyCode::J => Some("code"),
            KeyCode::S => Some("save"),
            KeyCode::Y => Some("redo"),
            KeyCode::Z if mods.is_shift() => Some("redo"),
            KeyCode::Z => Some("undo"),
            KeyCode::Backspace => Some("backspace-to-start-of-line"),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Space => Some("space"),
        KeyCode::Enter => Some("split-block"),
        KeyCode::Backspace if mods.is_alt() => Some("backspace-word"),
        KeyCode::Backspace => Some("backspace"),
        KeyCode::Delete => Some("delete"),
        KeyCode::Left => Some("move-left"),
        KeyCode::Right => Some("move-right"),
        KeyCode::Up => Some("move-up"),
        KeyCode::Down => Some("move-down"),
        KeyCode::Home => Some("move-to-start-of-block"),
        KeyCode::End => Some("move-to-end-of-block"),
        _ => None,
    }
}

/// Character a key press inserts, if any
///
/// Platform-reported text wins over the layout table. Keys held with Ctrl,
/// Alt or Meta never insert text.
pub fn text_for(event: &KeyEvent) -> Option<char> {
    if let Some(text) = &event.text {
        let mut chars = text.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Some(ch);
        }
    }

    let mods = event.modifiers;
    if mods.is_ctrl() || mods.is_alt() || mods.is_meta() {
        return None;
    }
    let shift = mods.is_shift();

    let ch = match event.code {
        KeyCode::A => 'a',
        KeyCode::B => 'b',
        KeyCode::C => 'c',
        KeyCode::D => 'd',
        KeyCode::E => 'e',
        KeyCode::F => 'f',
        KeyCode::G => 'g',
        KeyCode::H => 'h',
        KeyCode::I => 'i',
        KeyCode::J => 'j',
        KeyCode::K => 'k',
        KeyCode::L => 'l',
        KeyCode::M => 'm',
        KeyCode::N => 'n',
        KeyCode::O => 'o',
        KeyCode::P => 'p',
        KeyCode::Q => 'q',
        KeyCode::R => 'r',
        KeyCode::S => 's',
        KeyCode::T => 't',
        KeyCode::U => 'u',
        KeyCode::V => 'v',
        KeyCode::W => 'w',
        KeyCode::X => 'x',
        KeyCode::Y => 'y',
        KeyCode::Z => 'z',

        KeyCode::Num0 => return Some(if shift { ')' } else { '0' }),
        KeyCode::Num1 => return Some(if shift { '!' } else { '1' }),
        KeyCode::Num2 => return Some(if shift { '@' } else { '2' }),
        KeyCode::Num3 => return Some(if shift { '#' } else { '3' }),
        KeyCode::Num4 => return Some(if shift { '$' } else { '4' }),
        KeyCode::Num5 => return Some(if shift { '%' } else { '5' }),
        KeyCode::Num6 => return Some(if shift { '^' } else { '6' }),
        KeyCode::Num7 => return Some(if shift { '&' } else { '7' }),
        KeyCode::Num8 => return Some(if shift { '*' } else { '8' }),
        KeyCode::Num9 => return Some(if shift { '(' } else { '9' }),

        KeyCode::Space => return Some(' '),
        KeyCode::Tab => return Some('\t'),

        KeyCode::Period => return Some(if shift { '>' } else { '.' }),
        KeyCode::Comma => return Some(if shift { '<' } else { ',' }),
        KeyCode::Slash => return Some(if shift { '?' } else { '/' }),
        KeyCode::Semicolon => return Some(if shift { ':' } else { ';' }),
        KeyCode::Quote => return Some(if shift { '"' } else { '\'' }),
        KeyCode::LeftBracket => return Some(if shift { '{' } else { '[' }),
        KeyCode::RightBracket => return Some(if shift { '}' } else { ']' }),
        KeyCode::Backslash => return Some(if shift { '|' } else { '\\' }),
        KeyCode::Minus => return Some(if shift { '_' } else { '-' }),
        KeyCode::Equal => return Some(if shift { '+' } else { '=' }),
        KeyCode::Grave => return Some(if shift { '~' } else { '`' }),

        _ => return None,
    };

    Some(if shift { ch.to_ascii_uppercase() } else { ch })
}

/// Key press that types `ch` on a US layout
///
/// Characters outside the layout come back as an `Unknown` key carrying the
/// character as platform text, so [`text_for`] still yields it.
pub fn key_for_char(ch: char) -> KeyEvent {
    let plain = Modifiers::none();
    let shift = Modifiers::SHIFT;

    let (code, mods) = match ch {
        'a'..='z' => (KeyCode::letter(ch).unwrap_or(KeyCode::Unknown), plain),
        'A'..='Z' => (KeyCode::letter(ch).unwrap_or(KeyCode::Unknown), shift),
        '0' => (KeyCode::Num0, plain),
        '1' => (KeyCode::Num1, plain),
        '2' => (KeyCode::Num2, plain),
        '3' => (KeyCode::Num3, plain),
        '4' => (KeyCode::Num4, plain),
        '5' => (KeyCode::Num5, plain),
        '6' => (KeyCode::Num6, plain),
        '7' => (KeyCode::Num7, plain),
        '8' => (KeyCode::Num8, plain),
        '9' => (KeyCode::Num9, plain),
        ')' => (KeyCode::Num0, shift),
        '!' => (KeyCode::Num1, shift),
        '@' => (KeyCode::Num2, shift),
        '#' => (KeyCode::Num3, shift),
        '$' => (KeyCode::Num4, shift),
        '%' => (KeyCode::Num5, shift),
        '^' => (KeyCode::Num6, shift),
        '&' => (KeyCode::Num7, shift),
        '*' => (KeyCode::Num8, shift),
        '(' => (KeyCode::Num9, shift),
        ' ' => (KeyCode::Space, plain),
        '\t' => (KeyCode::Tab, plain),
        '\n' => (KeyCode::Enter, plain),
        '.' => (KeyCode::Period, plain),
        '>' => (KeyCode::Period, shift),
        ',' => (KeyCode::Comma, plain),
        '<' => (KeyCode::Comma, shift),
        '/' => (KeyCode::Slash, plain),
        '?' => (KeyCode::Slash, shift),
        ';' => (KeyCode::Semicolon, plain),
        ':' => (KeyCode::Semicolon, shift),
        '\'' => (KeyCode::Quote, plain),
        '"' => (KeyCode::Quote, shift),
        '[' => (KeyCode::LeftBracket, plain),
        '{' => (KeyCode::LeftBracket, shift),
        ']' => (KeyCode::RightBracket, plain),
        '}' => (KeyCode::RightBracket, shift),
        '\\' => (KeyCode::Backslash, plain),
        '|' => (KeyCode::Backslash, shift),
        '-' => (KeyCode::Minus, plain),
        '_' => (KeyCode::Minus, shift),
        '=' => (KeyCode::Equal, plain),
        '+' => (KeyCode::Equal, shift),
        '`' => (KeyCode::Grave, plain),
        '~' => (KeyCode::Grave, shift),
        other => {
            let mut buf = [0u8; 4];
            return KeyEvent::pressed(KeyCode::Unknown, plain)
                .with_text(&*other.encode_utf8(&mut buf));
        }
    };

    KeyEvent::pressed(code, mods)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, mods: Modifiers) -> KeyEvent {
        KeyEvent::pressed(code, mods)
    }

    #[test]
    fn test_space_is_a_command_and_a_character() {
        let event = press(KeyCode::Space, Modifiers::none());
        assert_eq!(key_command(&event), Some("space"));
        assert_eq!(text_for(&event), Some(' '));
    }

    #[test]
    fn test_style_commands() {
        assert_eq!(key_command(&press(KeyCode::B, Modifiers::CTRL)), Some("bold"));
        assert_eq!(key_command(&press(KeyCode::U, Modifiers::META)), Some("underline"));
        assert_eq!(key_command(&press(KeyCode::I, Modifiers::CTRL)), Some("italic"));
    }

    #[test]
    fn test_history_commands() {
        assert_eq!(key_command(&press(KeyCode::Z, Modifiers::CTRL)), Some("undo"));
        assert_eq!(
            key_command(&press(KeyCode::Z, Modifiers::CTRL.with(Modifiers::SHIFT))),
            Some("redo")
        );
        assert_eq!(key_command(&press(KeyCode::Y, Modifiers::CTRL)), Some("redo"));
    }

    #[test]
    fn test_editing_commands() {
        assert_eq!(key_command(&press(KeyCode::Enter, Modifiers::none())), Some("split-block"));
        assert_eq!(key_command(&press(KeyCode::Backspace, Modifiers::none())), Some("backspace"));
        assert_eq!(
            key_command(&press(KeyCode::Backspace, Modifiers::ALT)),
            Some("backspace-word")
        );
        assert_eq!(key_command(&press(KeyCode::A, Modifiers::none())), None);
    }

    #[test]
    fn test_shifted_symbols() {
        assert_eq!(text_for(&press(KeyCode::Num3, Modifiers::SHIFT)), Some('#'));
        assert_eq!(text_for(&press(KeyCode::Num8, Modifiers::SHIFT)), Some('*'));
        assert_eq!(text_for(&press(KeyCode::Grave, Modifiers::none())), Some('`'));
        assert_eq!(text_for(&press(KeyCode::H, Modifiers::SHIFT)), Some('H'));
    }

    #[test]
    fn test_ctrl_keys_insert_nothing() {
        assert_eq!(text_for(&press(KeyCode::B, Modifiers::CTRL)), None);
    }

    #[test]
    fn test_key_for_char_inverts_text_for() {
        for ch in "aZ09#*` ~{}|\"".chars() {
            assert_eq!(text_for(&key_for_char(ch)), Some(ch), "char {:?}", ch);
        }
    }

    #[test]
    fn test_key_for_char_outside_layout() {
        let event = key_for_char('é');
        assert_eq!(event.code, KeyCode::Unknown);
        assert_eq!(text_for(&event), Some('é'));
    }
}

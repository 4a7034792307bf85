#![forbid(unsafe_code)]

//! Key and pointer triggers used by keybinding layers.
//!
//! A [`Key`] is the trigger half of a binding: a [`KeyCode`] plus held
//! [`Modifiers`]. Keys can be parsed from the compact labels used in user
//! keymaps (`q`, `<c-s>`, `<esc>`, `<a-enter>`) and render back to the same
//! label, so help screens and option maps show exactly what the user typed.
//!
//! # Label grammar
//!
//! | Label | Key |
//! |-------|-----|
//! | `q` | `Char('q')` |
//! | `<space>` | `Char(' ')` |
//! | `<c-s>` | `Char('s')` + CTRL |
//! | `<a-x>` | `Char('x')` + ALT |
//! | `<s-tab>` | `BackTab` |
//! | `<f5>` | `F(5)` |

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::ParseKeyError;

/// Key codes that can trigger a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Backspace key.
    Backspace,
    /// Tab key.
    Tab,
    /// Shift+Tab (back-tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Function key (F1-F24).
    F(u8),
}

bitflags! {
    /// Modifier keys that can be held while a trigger fires.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A keyboard trigger: key code plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    /// The key code.
    pub code: KeyCode,
    /// Modifier keys that must be held.
    pub modifiers: Modifiers,
}

impl Key {
    /// Create a key without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a plain character key.
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// Create a key with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

fn named_code(name: &str) -> Option<KeyCode> {
    let code = match name {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Escape,
        "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "delete" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" => KeyCode::PageUp,
        "pgdown" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        _ => {
            let n = name.strip_prefix('f')?.parse::<u8>().ok()?;
            if (1..=24).contains(&n) {
                KeyCode::F(n)
            } else {
                return None;
            }
        }
    };
    Some(code)
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let mut chars = label.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::char(c));
        }

        let inner = label
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .filter(|inner| !inner.is_empty())
            .ok_or_else(|| ParseKeyError::new(label))?;

        let mut modifiers = Modifiers::NONE;
        let mut rest = inner;
        while let Some((prefix, tail)) = rest.split_once('-') {
            if tail.is_empty() {
                break;
            }
            let flag = match prefix {
                "c" => Modifiers::CTRL,
                "a" => Modifiers::ALT,
                "s" => Modifiers::SHIFT,
                _ => return Err(ParseKeyError::new(label)),
            };
            modifiers |= flag;
            rest = tail;
        }

        let mut chars = rest.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => named_code(rest).ok_or_else(|| ParseKeyError::new(label))?,
        };

        // `<s-tab>` is how terminals report back-tab.
        if code == KeyCode::Tab && modifiers == Modifiers::SHIFT {
            return Ok(Key::new(KeyCode::BackTab));
        }

        Ok(Key { code, modifiers })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(c) if self.modifiers.is_empty() => return write!(f, "{c}"),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "enter".into(),
            KeyCode::Escape => "esc".into(),
            KeyCode::Backspace => "backspace".into(),
            KeyCode::Tab => "tab".into(),
            KeyCode::BackTab => "backtab".into(),
            KeyCode::Delete => "delete".into(),
            KeyCode::Home => "home".into(),
            KeyCode::End => "end".into(),
            KeyCode::PageUp => "pgup".into(),
            KeyCode::PageDown => "pgdown".into(),
            KeyCode::Up => "up".into(),
            KeyCode::Down => "down".into(),
            KeyCode::Left => "left".into(),
            KeyCode::Right => "right".into(),
            KeyCode::F(n) => format!("f{n}"),
        };
        f.write_str("<")?;
        if self.modifiers.contains(Modifiers::CTRL) {
            f.write_str("c-")?;
        }
        if self.modifiers.contains(Modifiers::ALT) {
            f.write_str("a-")?;
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            f.write_str("s-")?;
        }
        write!(f, "{name}>")
    }
}

/// Pointer triggers for mouse keybinding layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseTrigger {
    /// Left mouse button pressed.
    Left,
    /// Right mouse button pressed.
    Right,
    /// Middle mouse button pressed.
    Middle,
    /// Wheel scrolled up.
    WheelUp,
    /// Wheel scrolled down.
    WheelDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(label: &str) -> Key {
        label.parse().unwrap()
    }

    #[test]
    fn single_char_label() {
        assert_eq!(parse("q"), Key::char('q'));
        assert_eq!(parse("<"), Key::char('<'));
    }

    #[test]
    fn named_keys() {
        assert_eq!(parse("<esc>"), Key::new(KeyCode::Escape));
        assert_eq!(parse("<space>"), Key::char(' '));
        assert_eq!(parse("<f5>"), Key::new(KeyCode::F(5)));
        assert_eq!(parse("<pgdown>"), Key::new(KeyCode::PageDown));
    }

    #[test]
    fn modifiers_stack() {
        let k = parse("<c-a-x>");
        assert_eq!(k.code, KeyCode::Char('x'));
        assert_eq!(k.modifiers, Modifiers::CTRL | Modifiers::ALT);
    }

    #[test]
    fn shift_tab_is_backtab() {
        assert_eq!(parse("<s-tab>"), Key::new(KeyCode::BackTab));
    }

    #[test]
    fn dash_is_a_key() {
        assert_eq!(parse("-"), Key::char('-'));
        assert_eq!(parse("<c-->").code, KeyCode::Char('-'));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Key>().is_err());
        assert!("<>".parse::<Key>().is_err());
        assert!("<x-q>".parse::<Key>().is_err());
        assert!("<f99>".parse::<Key>().is_err());
        assert!("ab".parse::<Key>().is_err());
    }

    #[test]
    fn display_matches_label() {
        for label in ["q", "<c-s>", "<esc>", "<space>", "<a-enter>", "<f12>", "<backtab>"] {
            assert_eq!(parse(label).to_string(), label);
        }
    }
}

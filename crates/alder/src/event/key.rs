//! This module contains the core primitives to represent keyboard input.
use std::ops::Add;

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
}

impl Mods {
    /// True if no modifier is active.
    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }
}

impl Add<KeyCode> for Mods {
    type Output = Key;

    fn add(self, key: KeyCode) -> Self::Output {
        Key { mods: self, key }
    }
}

impl Add<char> for Mods {
    type Output = Key;

    fn add(self, other: char) -> Self::Output {
        Key {
            mods: self,
            key: other.into(),
        }
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
        }
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ctrl: false,
    alt: false,
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods {
    shift: false,
    ctrl: true,
    alt: false,
};

/// Alt-only modifier state.
#[allow(non_upper_case_globals)]
pub const Alt: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: true,
};

/// Key codes for non-character keys.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeyCode {
    /// Backspace key.
    Backspace,
    /// Enter key.
    Enter,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page up key.
    PageUp,
    /// Page down key.
    PageDown,
    /// Tab key.
    Tab,
    /// Delete key.
    Delete,
    /// Insert key.
    Insert,
    /// Escape key.
    Esc,
    /// A character key.
    Char(char),
    /// A function key.
    F(u8),
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

/// A key press with modifier state.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Active modifiers.
    pub mods: Mods,
    /// The pressed key.
    pub key: KeyCode,
}

impl Key {
    /// Construct a key press with no modifiers.
    pub fn new(key: KeyCode) -> Self {
        Self { mods: Empty, key }
    }
}

impl From<KeyCode> for Key {
    fn from(key: KeyCode) -> Self {
        Self::new(key)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::new(c.into())
    }
}

/// A key event delivered through a handler callback slot.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct KeyEvent {
    /// The key press.
    pub key: Key,
    /// Set by a subscriber to stop further default handling.
    pub handled: bool,
}

impl KeyEvent {
    /// Construct an unhandled key event.
    pub fn new(key: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            handled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mods_sugar() {
        let k = Ctrl + 'a';
        assert_eq!(k.key, KeyCode::Char('a'));
        assert!(k.mods.ctrl);
        assert!((Ctrl + Shift).shift);
        assert!(Empty.is_empty());
        assert!(!Shift.is_empty());
    }

    #[test]
    fn key_from_char() {
        assert_eq!(Key::from('x'), Key::new(KeyCode::Char('x')));
    }
}

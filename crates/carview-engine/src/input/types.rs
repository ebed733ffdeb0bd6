use std::fmt;

/// Keyboard key identifier.
///
/// Printable keys are identified by the character they produce under the
/// active keyboard layout, lowercased, so a binding on `'z'` follows the
/// key labelled Z on QWERTY and AZERTY alike. Non-printable keys the engine
/// cares about get named variants.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    /// Printable key, lowercased.
    Character(char),

    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    /// Platform-dependent key not represented here (stable physical code).
    Unknown(u32),
}

impl Key {
    /// Builds a character key, normalizing case.
    pub fn character(c: char) -> Self {
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) => Key::Character(l),
            // Multi-char lowercase forms are rare; keep the original char.
            _ => Key::Character(c),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// Stable platform code when available (e.g. scancode).
        code: u32,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Window focus change.
    Focused(bool),
}

impl InputEvent {
    /// Returns the key if this is a press (including OS key-repeat presses).
    pub fn pressed_key(&self) -> Option<Key> {
        match self {
            InputEvent::Key { key, state: KeyState::Pressed, .. } => Some(*key),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Character(c) => write!(f, "'{c}'"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, code: 0, repeat }
    }

    #[test]
    fn character_is_lowercased() {
        assert_eq!(Key::character('Z'), Key::Character('z'));
        assert_eq!(Key::character('s'), Key::Character('s'));
        assert_eq!(Key::character('7'), Key::Character('7'));
    }

    #[test]
    fn pressed_key_reports_presses_and_repeats() {
        let z = Key::Character('z');
        assert_eq!(key_event(z, KeyState::Pressed, false).pressed_key(), Some(z));
        assert_eq!(key_event(z, KeyState::Pressed, true).pressed_key(), Some(z));
    }

    #[test]
    fn pressed_key_ignores_releases_and_focus() {
        let z = Key::Character('z');
        assert_eq!(key_event(z, KeyState::Released, false).pressed_key(), None);
        assert_eq!(InputEvent::Focused(true).pressed_key(), None);
    }

    #[test]
    fn display_quotes_characters() {
        assert_eq!(Key::Character('z').to_string(), "'z'");
        assert_eq!(Key::ArrowLeft.to_string(), "ArrowLeft");
    }
}

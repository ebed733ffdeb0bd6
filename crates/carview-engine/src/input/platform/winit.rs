use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key as LogicalKey, NamedKey, PhysicalKey};

use crate::input::{InputEvent, Key, KeyState};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Returns `None` for events not represented by the input subsystem.
pub(crate) fn translate_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            let (key, code) = map_key(&event.logical_key, event.physical_key);

            Some(InputEvent::Key {
                key,
                state,
                code,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

/// Maps a key to the engine representation.
///
/// The layout-aware logical key wins; the physical code is kept as the stable
/// `code` and as the payload of `Key::Unknown`.
fn map_key(logical: &LogicalKey, physical: PhysicalKey) -> (Key, u32) {
    let code = match physical {
        PhysicalKey::Code(code) => code as u32,
        // NativeKeyCode is not a u32 in winit 0.30; no stable numeric.
        PhysicalKey::Unidentified(_) => 0,
    };

    let key = match logical {
        LogicalKey::Character(text) => single_char(text).map(|c| match c {
            ' ' => Key::Space,
            c => Key::character(c),
        }),
        LogicalKey::Named(named) => map_named(*named),
        _ => None,
    };

    (key.unwrap_or(Key::Unknown(code)), code)
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn map_named(named: NamedKey) -> Option<Key> {
    let key = match named {
        NamedKey::Escape => Key::Escape,
        NamedKey::Enter => Key::Enter,
        NamedKey::Tab => Key::Tab,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Space => Key::Space,
        NamedKey::ArrowUp => Key::ArrowUp,
        NamedKey::ArrowDown => Key::ArrowDown,
        NamedKey::ArrowLeft => Key::ArrowLeft,
        NamedKey::ArrowRight => Key::ArrowRight,
        _ => return None,
    };
    Some(key)
}

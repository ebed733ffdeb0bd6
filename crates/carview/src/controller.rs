//! Keyboard control of the car's horizontal position.

use carview_engine::input::{InputEvent, Key};

/// Key bindings and step size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControllerConfig {
    pub forward: Key,
    pub backward: Key,
    /// Distance moved per key press, in scene units.
    pub step: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            forward: Key::Character('z'),
            backward: Key::Character('s'),
            step: 0.01,
        }
    }
}

/// Direction of an accepted key press.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Motion {
    Forward,
    Backward,
}

/// Owns the car position and applies key presses to it.
///
/// Each press is one discrete jump; there is no clamping, easing or debouncing.
/// OS key-repeat presses count as presses.
#[derive(Debug, Clone)]
pub struct InputController {
    config: ControllerConfig,
    position: f32,
}

impl InputController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            position: 0.0,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Applies `event`; returns the motion when it moved the car.
    pub fn handle(&mut self, event: &InputEvent) -> Option<Motion> {
        let key = event.pressed_key()?;

        let motion = if key == self.config.forward {
            self.position += self.config.step;
            Motion::Forward
        } else if key == self.config.backward {
            self.position -= self.config.step;
            Motion::Backward
        } else {
            return None;
        };

        log::debug!("{motion:?} on {key}: car at {:.3}", self.position);
        Some(motion)
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carview_engine::input::KeyState;

    fn press(c: char) -> InputEvent {
        InputEvent::Key {
            key: Key::Character(c),
            state: KeyState::Pressed,
            code: 0,
            repeat: false,
        }
    }

    fn release(c: char) -> InputEvent {
        InputEvent::Key {
            key: Key::Character(c),
            state: KeyState::Released,
            code: 0,
            repeat: false,
        }
    }

    #[test]
    fn starts_at_origin() {
        assert_eq!(InputController::default().position(), 0.0);
    }

    #[test]
    fn forward_press_moves_one_step_right() {
        let mut c = InputController::default();
        assert_eq!(c.handle(&press('z')), Some(Motion::Forward));
        assert_eq!(c.position(), 0.01);
    }

    #[test]
    fn backward_press_moves_one_step_left() {
        let mut c = InputController::default();
        assert_eq!(c.handle(&press('s')), Some(Motion::Backward));
        assert_eq!(c.position(), -0.01);
    }

    #[test]
    fn presses_accumulate_without_clamping() {
        let mut c = InputController::new(ControllerConfig {
            step: 0.5,
            ..ControllerConfig::default()
        });
        for _ in 0..10 {
            c.handle(&press('s'));
        }
        assert_eq!(c.position(), -5.0);
        c.handle(&press('z'));
        assert_eq!(c.position(), -4.5);
    }

    #[test]
    fn key_repeat_counts_as_a_press() {
        let mut c = InputController::default();
        let repeat = InputEvent::Key {
            key: Key::Character('z'),
            state: KeyState::Pressed,
            code: 0,
            repeat: true,
        };
        assert_eq!(c.handle(&repeat), Some(Motion::Forward));
    }

    #[test]
    fn other_keys_releases_and_focus_are_ignored() {
        let mut c = InputController::default();
        assert_eq!(c.handle(&press('q')), None);
        assert_eq!(c.handle(&release('z')), None);
        assert_eq!(c.handle(&InputEvent::Focused(false)), None);
        assert_eq!(
            c.handle(&InputEvent::Key {
                key: Key::ArrowRight,
                state: KeyState::Pressed,
                code: 0,
                repeat: false,
            }),
            None
        );
        assert_eq!(c.position(), 0.0);
    }

    #[test]
    fn custom_bindings_are_honored() {
        let mut c = InputController::new(ControllerConfig {
            forward: Key::ArrowRight,
            backward: Key::ArrowLeft,
            step: 0.25,
        });
        let ev = InputEvent::Key {
            key: Key::ArrowLeft,
            state: KeyState::Pressed,
            code: 0,
            repeat: false,
        };
        assert_eq!(c.handle(&ev), Some(Motion::Backward));
        assert_eq!(c.position(), -0.25);
        assert_eq!(c.handle(&press('z')), None);
    }
}

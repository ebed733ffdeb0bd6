use anyhow::Result;

use carview_engine::core::{App, AppControl, FrameCtx};
use carview_engine::device::Gpu;
use carview_engine::input::InputEvent;

use crate::controller::{ControllerConfig, InputController};
use crate::resources::SceneResources;
use crate::scene::{self, TransformState, CLEAR_COLOR};

/// The car viewer: one car, two keys.
///
/// All mutable state lives here and is only touched from runtime callbacks,
/// which the event loop delivers one at a time.
pub struct CarApp {
    controller: InputController,
    transforms: TransformState,
    resources: Option<SceneResources>,
}

impl CarApp {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            controller: InputController::new(config),
            transforms: TransformState::new(),
            resources: None,
        }
    }

    pub fn car_position(&self) -> f32 {
        self.controller.position()
    }

    pub fn controls(&self) -> &ControllerConfig {
        self.controller.config()
    }
}

impl Default for CarApp {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl App for CarApp {
    fn on_start(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        self.resources = Some(SceneResources::init(gpu)?);
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        match self.controller.handle(event) {
            Some(_) => {
                self.transforms.reset();
                AppControl::Redraw
            }
            None => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let car_position = self.car_position();
        let plan = scene::plan_frame(&self.transforms, car_position);
        let frame_index = ctx.frame_index;

        let Some(resources) = self.resources.as_mut() else {
            return AppControl::Continue;
        };

        ctx.render(CLEAR_COLOR, |rctx, target| {
            let draws = resources.render(rctx, target, &plan);
            log::trace!("frame {frame_index}: {draws} draw calls, car at {car_position:.3}");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carview_engine::input::{Key, KeyState};

    fn press(key: Key) -> InputEvent {
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            code: 0,
            repeat: false,
        }
    }

    #[test]
    fn bound_keys_move_the_car_and_request_a_redraw() {
        let mut app = CarApp::default();

        assert_eq!(app.on_input(&press(Key::Character('z'))), AppControl::Redraw);
        assert_eq!(app.car_position(), 0.01);

        assert_eq!(app.on_input(&press(Key::Character('s'))), AppControl::Redraw);
        assert_eq!(app.car_position(), 0.0);
    }

    #[test]
    fn unbound_keys_do_not_redraw() {
        let mut app = CarApp::default();
        assert_eq!(app.on_input(&press(Key::Character('x'))), AppControl::Continue);
        assert_eq!(app.on_input(&InputEvent::Focused(true)), AppControl::Continue);
        assert_eq!(app.car_position(), 0.0);
    }

    #[test]
    fn transforms_are_rebuilt_not_accumulated() {
        let mut app = CarApp::default();
        for _ in 0..5 {
            app.on_input(&press(Key::Character('z')));
        }
        assert_eq!(app.transforms, TransformState::new());
    }
}

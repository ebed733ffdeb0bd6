use anyhow::Result;

use crate::device::Gpu;
use crate::input::InputEvent;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    /// Nothing changed; keep waiting for events.
    Continue,
    /// State changed; draw a new frame.
    Redraw,
    Exit,
}

/// Application contract implemented by the viewer.
///
/// The runtime never redraws on its own schedule: frames are produced on
/// startup, on surface changes, and whenever a callback returns
/// [`AppControl::Redraw`].
pub trait App {
    /// Called once after the window and GPU context exist.
    ///
    /// An error here is fatal: the runtime logs it, stops the event loop and
    /// returns it from `Runtime::run`.
    fn on_start(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let _ = gpu;
        Ok(())
    }

    /// Called for every translated input event.
    ///
    /// Returning [`AppControl::Redraw`] renders a frame synchronously before the
    /// next event is delivered.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called for every frame the runtime draws.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}

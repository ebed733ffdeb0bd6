//! carview: a car body and two wheels, moved left and right with Z and S.

mod app;
mod controller;
mod geometry;
mod resources;
mod scene;

use anyhow::Result;

use carview_engine::device::GpuInit;
use carview_engine::logging::{init_logging, LoggingConfig};
use carview_engine::window::{Runtime, RuntimeConfig};

use app::CarApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig::default();

    // Write shader colors to the surface unchanged.
    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    let app = CarApp::default();
    let keys = app.controls();
    log::info!(
        "carview starting; {} moves forward, {} moves backward",
        keys.forward,
        keys.backward
    );

    Runtime::run(config, gpu_init, app)
}

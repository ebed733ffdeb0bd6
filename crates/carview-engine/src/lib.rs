//! carview engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the car viewer:
//! window loop, device/surface management, key input and the flat-color
//! render path.

pub mod device;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;
pub mod render;

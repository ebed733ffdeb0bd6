//! Logging utilities.
//!
//! This module centralizes logger initialization. Engine and app code log
//! through the `log` facade; `env_logger` is the only backend installed.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};

#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod status;
pub mod telemetry;

use serde::Deserialize;

pub use status::*;
pub use telemetry::*;

/// Top-level Ferry configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Status middleware configuration
    #[serde(default)]
    pub status: StatusConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

//! Solid rocket motor internal-ballistics toolkit.
//!
//! Grain regression, propellant and nozzle models, the time-stepped solver and
//! the exporters live in focused crates under `crates/`; this façade re-exports
//! them so front-ends (CLI, GUI, batch tools) share one entry point.

pub use srocket_ballistics as ballistics;
pub use srocket_config as config;
pub use srocket_core as primitives;
pub use srocket_export as export;
pub use srocket_geometry as geometry;
pub use srocket_propulsion as propulsion;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

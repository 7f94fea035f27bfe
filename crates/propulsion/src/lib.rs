//! Propellant chemistry and nozzle models.

mod nozzle;
mod propellant;

pub use nozzle::{DEFAULT_NOZZLE_EFFICIENCY, NozzleSpec, ideal_thrust_coefficient};
pub use propellant::{CombustionProducts, PropellantParams, PropellantSpec};

use thiserror::Error;

/// Validation failures for propellant and nozzle parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropulsionError {
    #[error("{field} must be positive and finite (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("specific heat ratio must exceed 1 (got {0})")]
    InvalidSpecificHeatRatio(f64),
    #[error("pressure range is empty: min {min} MPa must be below max {max} MPa")]
    InvalidPressureRange { min: f64, max: f64 },
    #[error(
        "propellant '{0}' needs a characteristic velocity or combustion temperature and exhaust molar mass"
    )]
    MissingCombustionData(String),
    #[error("exit diameter {exit} mm must not be smaller than throat diameter {throat} mm")]
    ExitSmallerThanThroat { throat: f64, exit: f64 },
    #[error("nozzle efficiency must lie in (0, 1] (got {0})")]
    InvalidEfficiency(f64),
    #[error("could not resolve nozzle exit pressure for expansion ratio {0}")]
    ExitPressure(f64),
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64, PropulsionError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(PropulsionError::NonPositive { field, value })
    }
}

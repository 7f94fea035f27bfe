//! Quasi-steady chamber pressure from the mass balance between propellant
//! gas generation and choked nozzle outflow.

use srocket_core::numeric::{RootError, bisect_log};
use srocket_core::units::{mm3_to_m3, mm_s_to_m_s, mm2_to_m2, mpa_to_pa};
use srocket_propulsion::PropellantSpec;
use thiserror::Error;

/// Lowest pressure the solve will bracket (MPa).
pub const PRESSURE_FLOOR_MPA: f64 = 1.0e-9;
/// Highest pressure the solve will bracket (MPa); anything above is treated as runaway.
pub const PRESSURE_CEILING_MPA: f64 = 1.0e3;

const LOG_TOLERANCE: f64 = 1.0e-12;
const MAX_ITERATIONS: usize = 200;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PressureError {
    #[error("Kn must be positive and finite (got {0})")]
    InvalidKn(f64),
    #[error("burn-rate exponent {0} >= 1 has no stable chamber pressure")]
    Unstable(f64),
    #[error("mass balance did not converge: {0}")]
    Solve(#[from] RootError),
}

/// Generated minus discharged mass flow per unit throat area (kg/s per m²).
fn residual(propellant: &PropellantSpec, kn: f64, pressure_mpa: f64) -> f64 {
    // ρ·Kn·r(P) with r in m/s; the mm² in Kn cancel.
    let generated = propellant.density_kg_m3() * kn * mm_s_to_m_s(propellant.burn_rate(pressure_mpa));
    let discharged = mpa_to_pa(pressure_mpa) / propellant.characteristic_velocity_m_s();
    generated - discharged
}

/// Chamber pressure (MPa) at which gas generation equals choked nozzle flow.
pub fn equilibrium_pressure(propellant: &PropellantSpec, kn: f64) -> Result<f64, PressureError> {
    if !(kn > 0.0 && kn.is_finite()) {
        return Err(PressureError::InvalidKn(kn));
    }
    let exponent = propellant.burn_rate_exponent();
    if exponent >= 1.0 {
        return Err(PressureError::Unstable(exponent));
    }
    Ok(bisect_log(
        |pressure| residual(propellant, kn, pressure),
        PRESSURE_FLOOR_MPA,
        PRESSURE_CEILING_MPA,
        LOG_TOLERANCE,
        MAX_ITERATIONS,
    )?)
}

/// Propellant mass flow (kg/s) leaving a surface of `burn_area_mm2` at `burn_rate_mm_s`.
pub fn generated_mass_flow(
    propellant: &PropellantSpec,
    burn_area_mm2: f64,
    burn_rate_mm_s: f64,
) -> f64 {
    propellant.density_kg_m3() * mm3_to_m3(burn_area_mm2 * burn_rate_mm_s)
}

/// Mass flux (kg/(m²·s)) through a port of `port_area_mm2`.
pub fn mass_flux(mass_flow_kg_s: f64, port_area_mm2: f64) -> f64 {
    if port_area_mm2 > 0.0 {
        mass_flow_kg_s / mm2_to_m2(port_area_mm2)
    } else {
        0.0
    }
}

//! Performance summary derived from a finished sample log.

use serde::Serialize;
use srocket_core::constants::G0;
use srocket_core::numeric::trapezoid;
use srocket_core::units::mm3_to_m3;
use srocket_geometry as geometry;
use thiserror::Error;
use tracing::warn;

use crate::Motor;
use crate::solver::Sample;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    #[error("sample log is empty")]
    EmptyLog,
}

/// Conditions that do not stop a run but make its numbers suspect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelingWarning {
    /// Peak chamber pressure exceeds the burn-rate fit's upper bound.
    PressureAboveRange { peak_mpa: f64, limit_mpa: f64 },
    /// Burning pressure dropped below the burn-rate fit's lower bound.
    PressureBelowRange { lowest_mpa: f64, limit_mpa: f64 },
}

/// Summary metrics of one run. Pressures in MPa, areas in mm².
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub max_thrust_n: f64,
    pub average_thrust_n: f64,
    pub total_impulse_ns: f64,
    pub burn_time_s: f64,
    pub max_pressure_mpa: f64,
    pub average_pressure_mpa: f64,
    pub specific_impulse_s: f64,
    pub propellant_mass_kg: f64,
    pub propellant_mass_consumed_kg: f64,
    pub propellant_length_mm: f64,
    pub volumetric_loading_percent: f64,
    pub initial_kn: f64,
    pub peak_kn: f64,
    pub ideal_thrust_coefficient: f64,
    pub delivered_thrust_coefficient: f64,
    pub throat_to_port_ratio: f64,
    pub peak_mass_flux_kg_m2_s: f64,
    pub motor_class: String,
    pub designation: String,
    pub warnings: Vec<ModelingWarning>,
}

impl SimulationResult {
    /// Derive the summary from `samples`; `final_regression_mm` locates the unburned remainder.
    pub fn from_samples(
        motor: &Motor,
        samples: &[Sample],
        final_regression_mm: f64,
    ) -> Result<Self, SummaryError> {
        let first = samples.first().ok_or(SummaryError::EmptyLog)?;
        let last = samples.last().ok_or(SummaryError::EmptyLog)?;

        let times: Vec<f64> = samples.iter().map(|s| s.time_s).collect();
        let thrusts: Vec<f64> = samples.iter().map(|s| s.thrust_n).collect();
        let total_impulse = trapezoid(&times, &thrusts);
        let burn_time = last.time_s - first.time_s;

        let burning: Vec<&Sample> = samples.iter().filter(|s| s.burn_area_mm2 > 0.0).collect();
        let mean = |f: fn(&Sample) -> f64| -> f64 {
            if burning.is_empty() {
                0.0
            } else {
                burning.iter().map(|s| f(s)).sum::<f64>() / burning.len() as f64
            }
        };
        let max_of = |f: fn(&Sample) -> f64| samples.iter().map(f).fold(0.0_f64, f64::max);

        let density = motor.propellant.density_kg_m3();
        let initial = geometry::regress(&motor.grain, 0.0);
        let remaining = geometry::regress(&motor.grain, final_regression_mm);
        let propellant_mass = density * mm3_to_m3(initial.propellant_volume);
        let consumed = density * mm3_to_m3(initial.propellant_volume - remaining.propellant_volume);

        let specific_impulse = if consumed > 0.0 {
            total_impulse / (consumed * G0)
        } else {
            0.0
        };
        let average_thrust = if burn_time > 0.0 {
            total_impulse / burn_time
        } else {
            0.0
        };
        let throat_area = motor.nozzle.throat_area_mm2();
        let throat_to_port_ratio = if initial.port_area > 0.0 {
            throat_area / initial.port_area
        } else {
            0.0
        };

        let max_pressure = burning
            .iter()
            .map(|s| s.chamber_pressure_mpa)
            .fold(0.0_f64, f64::max);
        let warnings = pressure_warnings(motor, &burning);
        for warning in &warnings {
            warn!(motor = %motor.name, ?warning, "pressure outside propellant burn-rate range");
        }

        let motor_class = motor_class(total_impulse);
        let designation = format!("{}{}", motor_class, average_thrust.round() as i64);

        Ok(SimulationResult {
            max_thrust_n: max_of(|s| s.thrust_n),
            average_thrust_n: average_thrust,
            total_impulse_ns: total_impulse,
            burn_time_s: burn_time,
            max_pressure_mpa: max_pressure,
            average_pressure_mpa: mean(|s| s.chamber_pressure_mpa),
            specific_impulse_s: specific_impulse,
            propellant_mass_kg: propellant_mass,
            propellant_mass_consumed_kg: consumed,
            propellant_length_mm: motor.grain.total_length(),
            volumetric_loading_percent: 100.0 * initial.propellant_volume
                / motor.grain.envelope_volume(),
            initial_kn: first.kn,
            peak_kn: max_of(|s| s.kn),
            ideal_thrust_coefficient: mean(|s| s.ideal_thrust_coefficient),
            delivered_thrust_coefficient: mean(|s| s.thrust_coefficient),
            throat_to_port_ratio,
            peak_mass_flux_kg_m2_s: max_of(|s| s.mass_flux_kg_m2_s),
            motor_class,
            designation,
            warnings,
        })
    }
}

fn pressure_warnings(motor: &Motor, burning: &[&Sample]) -> Vec<ModelingWarning> {
    let propellant = &motor.propellant;
    let (min_limit, max_limit) = propellant.pressure_range_mpa();
    let outside: Vec<f64> = burning
        .iter()
        .map(|s| s.chamber_pressure_mpa)
        .filter(|&p| !propellant.within_pressure_range(p))
        .collect();

    let mut warnings = Vec::new();
    if let Some(peak) = outside.iter().copied().filter(|&p| p > max_limit).reduce(f64::max) {
        warnings.push(ModelingWarning::PressureAboveRange {
            peak_mpa: peak,
            limit_mpa: max_limit,
        });
    }
    if let Some(lowest) = outside.iter().copied().filter(|&p| p < min_limit).reduce(f64::min) {
        warnings.push(ModelingWarning::PressureBelowRange {
            lowest_mpa: lowest,
            limit_mpa: min_limit,
        });
    }
    warnings
}

/// Impulse class letter; each class doubles the previous one, `A` tops out at 2.5 N·s.
pub fn motor_class(total_impulse_ns: f64) -> String {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if total_impulse_ns <= 0.3125 {
        return "1/8A".to_string();
    }
    if total_impulse_ns <= 0.625 {
        return "1/4A".to_string();
    }
    if total_impulse_ns <= 1.25 {
        return "1/2A".to_string();
    }
    let mut upper = 2.5;
    for letter in LETTERS {
        if total_impulse_ns <= upper {
            return (*letter as char).to_string();
        }
        upper *= 2.0;
    }
    "Z+".to_string()
}

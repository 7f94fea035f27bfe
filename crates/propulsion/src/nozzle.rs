use srocket_core::area;
use srocket_core::numeric::bisect_log;

use crate::{PropulsionError, positive};

/// Delivered-to-ideal thrust coefficient ratio used when none is given.
pub const DEFAULT_NOZZLE_EFFICIENCY: f64 = 0.92;

/// Immutable, validated converging-diverging nozzle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NozzleSpec {
    throat_diameter_mm: f64,
    exit_diameter_mm: f64,
    efficiency: f64,
}

impl NozzleSpec {
    /// Nozzle with [`DEFAULT_NOZZLE_EFFICIENCY`].
    pub fn new(throat_diameter_mm: f64, exit_diameter_mm: f64) -> Result<Self, PropulsionError> {
        positive("throat_diameter_mm", throat_diameter_mm)?;
        positive("exit_diameter_mm", exit_diameter_mm)?;
        if exit_diameter_mm < throat_diameter_mm {
            return Err(PropulsionError::ExitSmallerThanThroat {
                throat: throat_diameter_mm,
                exit: exit_diameter_mm,
            });
        }
        Ok(Self {
            throat_diameter_mm,
            exit_diameter_mm,
            efficiency: DEFAULT_NOZZLE_EFFICIENCY,
        })
    }

    pub fn with_efficiency(mut self, efficiency: f64) -> Result<Self, PropulsionError> {
        if !(efficiency > 0.0 && efficiency <= 1.0) {
            return Err(PropulsionError::InvalidEfficiency(efficiency));
        }
        self.efficiency = efficiency;
        Ok(self)
    }

    pub fn throat_diameter_mm(&self) -> f64 {
        self.throat_diameter_mm
    }

    pub fn exit_diameter_mm(&self) -> f64 {
        self.exit_diameter_mm
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn throat_area_mm2(&self) -> f64 {
        area::circle(0.5 * self.throat_diameter_mm)
    }

    pub fn exit_area_mm2(&self) -> f64 {
        area::circle(0.5 * self.exit_diameter_mm)
    }

    /// Exit-to-throat area ratio ε.
    pub fn expansion_ratio(&self) -> f64 {
        self.exit_area_mm2() / self.throat_area_mm2()
    }

    /// Exit-to-chamber pressure ratio Pe/Pc for isentropic supersonic flow.
    pub fn exit_pressure_ratio(&self, gamma: f64) -> Result<f64, PropulsionError> {
        let expansion = self.expansion_ratio();
        let critical = (2.0 / (gamma + 1.0)).powf(gamma / (gamma - 1.0));
        if expansion <= 1.0 + 1e-12 {
            return Ok(critical);
        }
        // Area ratio falls monotonically from infinity to 1 as Pe/Pc rises to critical.
        bisect_log(
            |ratio| area_ratio_at(gamma, ratio) - expansion,
            1e-12,
            critical,
            1e-12,
            200,
        )
        .map_err(|_| PropulsionError::ExitPressure(expansion))
    }

    /// Ideal thrust coefficient at the given chamber and ambient pressures (MPa).
    pub fn ideal_thrust_coefficient(
        &self,
        gamma: f64,
        chamber_pressure_mpa: f64,
        ambient_pressure_mpa: f64,
    ) -> Result<f64, PropulsionError> {
        let exit_ratio = self.exit_pressure_ratio(gamma)?;
        Ok(ideal_thrust_coefficient(
            gamma,
            exit_ratio,
            chamber_pressure_mpa,
            ambient_pressure_mpa,
            self.expansion_ratio(),
        ))
    }

    /// Ideal coefficient scaled by the nozzle efficiency.
    pub fn delivered_thrust_coefficient(
        &self,
        gamma: f64,
        chamber_pressure_mpa: f64,
        ambient_pressure_mpa: f64,
    ) -> Result<f64, PropulsionError> {
        Ok(self.efficiency
            * self.ideal_thrust_coefficient(gamma, chamber_pressure_mpa, ambient_pressure_mpa)?)
    }
}

/// Isentropic thrust coefficient: momentum term plus pressure-thrust term.
///
/// With `exit_ratio · Pc == Pa` the pressure term vanishes and this is the
/// optimum-expansion coefficient. Never negative.
pub fn ideal_thrust_coefficient(
    gamma: f64,
    exit_ratio: f64,
    chamber_pressure_mpa: f64,
    ambient_pressure_mpa: f64,
    expansion_ratio: f64,
) -> f64 {
    if !(chamber_pressure_mpa > 0.0) {
        return 0.0;
    }
    let momentum = (2.0 * gamma * gamma / (gamma - 1.0)
        * (2.0 / (gamma + 1.0)).powf((gamma + 1.0) / (gamma - 1.0))
        * (1.0 - exit_ratio.powf((gamma - 1.0) / gamma)))
    .max(0.0)
    .sqrt();
    let pressure = (exit_ratio - ambient_pressure_mpa / chamber_pressure_mpa) * expansion_ratio;
    (momentum + pressure).max(0.0)
}

fn area_ratio_at(gamma: f64, pressure_ratio: f64) -> f64 {
    let numerator =
        (2.0 / (gamma + 1.0)).powf(1.0 / (gamma - 1.0)) * pressure_ratio.powf(-1.0 / gamma);
    let denominator = ((gamma + 1.0) / (gamma - 1.0)
        * (1.0 - pressure_ratio.powf((gamma - 1.0) / gamma)))
    .sqrt();
    numerator / denominator
}

use srocket_core::constants::UNIVERSAL_GAS_CONSTANT;

use crate::{PropulsionError, positive};

/// Combustion product properties used to derive c*.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombustionProducts {
    pub temperature_k: f64,
    /// Exhaust molar mass (kg/kmol).
    pub molar_mass: f64,
}

/// Raw, unvalidated propellant parameters.
///
/// Burn rate follows Saint-Robert's law `r = a·Pⁿ` with `r` in mm/s and `P` in MPa.
#[derive(Debug, Clone, PartialEq)]
pub struct PropellantParams {
    pub name: String,
    pub density_kg_m3: f64,
    pub burn_rate_coefficient: f64,
    pub burn_rate_exponent: f64,
    pub min_pressure_mpa: f64,
    pub max_pressure_mpa: f64,
    pub specific_heat_ratio: f64,
    pub combustion: Option<CombustionProducts>,
    pub characteristic_velocity_m_s: Option<f64>,
}

/// Immutable, validated propellant.
#[derive(Debug, Clone, PartialEq)]
pub struct PropellantSpec {
    name: String,
    density_kg_m3: f64,
    burn_rate_coefficient: f64,
    burn_rate_exponent: f64,
    pressure_range_mpa: (f64, f64),
    specific_heat_ratio: f64,
    characteristic_velocity_m_s: f64,
}

impl PropellantSpec {
    pub fn new(params: PropellantParams) -> Result<Self, PropulsionError> {
        positive("density_kg_m3", params.density_kg_m3)?;
        positive("burn_rate_coefficient", params.burn_rate_coefficient)?;
        positive("burn_rate_exponent", params.burn_rate_exponent)?;
        positive("max_pressure_mpa", params.max_pressure_mpa)?;
        if !(params.min_pressure_mpa >= 0.0 && params.min_pressure_mpa < params.max_pressure_mpa)
        {
            return Err(PropulsionError::InvalidPressureRange {
                min: params.min_pressure_mpa,
                max: params.max_pressure_mpa,
            });
        }
        let gamma = params.specific_heat_ratio;
        if !(gamma > 1.0 && gamma.is_finite()) {
            return Err(PropulsionError::InvalidSpecificHeatRatio(gamma));
        }
        if let Some(products) = &params.combustion {
            positive("combustion_temperature_k", products.temperature_k)?;
            positive("exhaust_molar_mass", products.molar_mass)?;
        }

        let characteristic_velocity_m_s = match (params.characteristic_velocity_m_s, params.combustion)
        {
            (Some(c_star), _) => positive("characteristic_velocity_m_s", c_star)?,
            (None, Some(products)) => ideal_characteristic_velocity(gamma, &products),
            (None, None) => return Err(PropulsionError::MissingCombustionData(params.name)),
        };

        Ok(Self {
            name: params.name,
            density_kg_m3: params.density_kg_m3,
            burn_rate_coefficient: params.burn_rate_coefficient,
            burn_rate_exponent: params.burn_rate_exponent,
            pressure_range_mpa: (params.min_pressure_mpa, params.max_pressure_mpa),
            specific_heat_ratio: gamma,
            characteristic_velocity_m_s,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn density_kg_m3(&self) -> f64 {
        self.density_kg_m3
    }

    pub fn burn_rate_coefficient(&self) -> f64 {
        self.burn_rate_coefficient
    }

    pub fn burn_rate_exponent(&self) -> f64 {
        self.burn_rate_exponent
    }

    pub fn specific_heat_ratio(&self) -> f64 {
        self.specific_heat_ratio
    }

    /// Characteristic velocity c* (m/s), explicit or derived from combustion products.
    pub fn characteristic_velocity_m_s(&self) -> f64 {
        self.characteristic_velocity_m_s
    }

    /// Pressure window (MPa) over which the burn-rate fit was measured.
    pub fn pressure_range_mpa(&self) -> (f64, f64) {
        self.pressure_range_mpa
    }

    pub fn within_pressure_range(&self, pressure_mpa: f64) -> bool {
        let (min, max) = self.pressure_range_mpa;
        (min..=max).contains(&pressure_mpa)
    }

    /// Saint-Robert burn rate (mm/s) at the given chamber pressure (MPa).
    pub fn burn_rate(&self, pressure_mpa: f64) -> f64 {
        if pressure_mpa <= 0.0 {
            return 0.0;
        }
        self.burn_rate_coefficient * pressure_mpa.powf(self.burn_rate_exponent)
    }
}

/// Ideal c* from frozen combustion products.
fn ideal_characteristic_velocity(gamma: f64, products: &CombustionProducts) -> f64 {
    let gas_constant = UNIVERSAL_GAS_CONSTANT / products.molar_mass;
    let vandenkerckhove =
        gamma.sqrt() * (2.0 / (gamma + 1.0)).powf((gamma + 1.0) / (2.0 * (gamma - 1.0)));
    (gas_constant * products.temperature_k).sqrt() / vandenkerckhove
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knsb(combustion: Option<CombustionProducts>, c_star: Option<f64>) -> PropellantParams {
        PropellantParams {
            name: "KNSB".to_string(),
            density_kg_m3: 1841.0,
            burn_rate_coefficient: 8.26,
            burn_rate_exponent: 0.319,
            min_pressure_mpa: 0.69,
            max_pressure_mpa: 13.79,
            specific_heat_ratio: 1.131,
            combustion,
            characteristic_velocity_m_s: c_star,
        }
    }

    #[test]
    fn derives_c_star_from_combustion_products() {
        let spec = PropellantSpec::new(knsb(
            Some(CombustionProducts {
                temperature_k: 1720.0,
                molar_mass: 23.9,
            }),
            None,
        ))
        .unwrap();
        let c_star = spec.characteristic_velocity_m_s();
        assert!((c_star - 1218.6).abs() < 2.0, "c* = {c_star}");
    }

    #[test]
    fn explicit_c_star_wins() {
        let spec = PropellantSpec::new(knsb(
            Some(CombustionProducts {
                temperature_k: 1720.0,
                molar_mass: 23.9,
            }),
            Some(900.0),
        ))
        .unwrap();
        assert_eq!(spec.characteristic_velocity_m_s(), 900.0);
    }

    #[test]
    fn requires_some_combustion_data() {
        let err = PropellantSpec::new(knsb(None, None)).unwrap_err();
        assert_eq!(err, PropulsionError::MissingCombustionData("KNSB".into()));
    }

    #[test]
    fn rejects_inverted_pressure_window() {
        let mut params = knsb(None, Some(900.0));
        params.min_pressure_mpa = 20.0;
        assert!(matches!(
            PropellantSpec::new(params),
            Err(PropulsionError::InvalidPressureRange { .. })
        ));
    }

    #[test]
    fn pressure_window_is_inclusive() {
        let spec = PropellantSpec::new(knsb(None, Some(900.0))).unwrap();
        assert!(spec.within_pressure_range(0.69));
        assert!(spec.within_pressure_range(13.79));
        assert!(!spec.within_pressure_range(0.5));
        assert!(!spec.within_pressure_range(14.0));
    }

    #[test]
    fn saint_robert_rate() {
        let spec = PropellantSpec::new(knsb(None, Some(900.0))).unwrap();
        assert!((spec.burn_rate(1.0) - 8.26).abs() < 1e-12);
        assert_eq!(spec.burn_rate(0.0), 0.0);
        assert!(spec.burn_rate(10.0) > spec.burn_rate(5.0));
    }
}

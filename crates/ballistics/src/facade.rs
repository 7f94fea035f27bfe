//! Conversions from configuration records into validated motor specs.

pub mod propellant {
    use srocket_config::PropellantConfig;
    use srocket_propulsion::{CombustionProducts, PropellantParams, PropellantSpec, PropulsionError};
    use thiserror::Error;

    /// Errors surfaced when selecting or converting propellants.
    #[derive(Debug, Error)]
    pub enum PropellantError {
        #[error("propellant '{0}' not found in catalog")]
        NotFound(String),
        #[error("propellant catalog is empty")]
        EmptyCatalog,
        #[error("combustion temperature and exhaust molar mass must be given together")]
        IncompleteCombustion,
        #[error("invalid propellant: {0}")]
        Invalid(#[from] PropulsionError),
    }

    /// Convert a `PropellantConfig` into a validated `PropellantSpec`.
    pub fn from_config(config: &PropellantConfig) -> Result<PropellantSpec, PropellantError> {
        let combustion = match (config.combustion_temperature_k, config.exhaust_molar_mass) {
            (Some(temperature_k), Some(molar_mass)) => Some(CombustionProducts {
                temperature_k,
                molar_mass,
            }),
            (None, None) => None,
            _ => return Err(PropellantError::IncompleteCombustion),
        };

        Ok(PropellantSpec::new(PropellantParams {
            name: config.name.clone(),
            density_kg_m3: config.density_kg_m3,
            burn_rate_coefficient: config.burn_rate_coefficient,
            burn_rate_exponent: config.burn_rate_exponent,
            min_pressure_mpa: config.min_pressure_mpa,
            max_pressure_mpa: config.max_pressure_mpa,
            specific_heat_ratio: config.specific_heat_ratio,
            combustion,
            characteristic_velocity_m_s: config.characteristic_velocity_m_s,
        })?)
    }

    /// Select a propellant from the catalog by case-insensitive name.
    pub fn select(
        configs: &[PropellantConfig],
        requested: &str,
    ) -> Result<PropellantSpec, PropellantError> {
        if configs.is_empty() {
            return Err(PropellantError::EmptyCatalog);
        }
        let upper = requested.to_uppercase();
        let chosen = configs
            .iter()
            .find(|cfg| cfg.name.to_uppercase() == upper)
            .ok_or_else(|| PropellantError::NotFound(requested.to_string()))?;
        from_config(chosen)
    }
}

pub mod motor {
    use srocket_config::{GrainConfig, MotorConfig, PropellantConfig, PropellantSource};
    use srocket_geometry::{
        Bates, EndBurner, Finocyl, GeometryError, GrainShape, GrainSpec, OffsetCore, RodAndTube,
        Star,
    };
    use srocket_propulsion::{NozzleSpec, PropulsionError};
    use thiserror::Error;

    use super::propellant::{self, PropellantError};
    use crate::Motor;
    use crate::solver::SimulationConfig;

    /// Errors surfaced when building a motor from its definition.
    #[derive(Debug, Error)]
    pub enum MotorError {
        #[error("motor '{0}' not found in catalog")]
        NotFound(String),
        #[error("invalid grain: {0}")]
        Grain(#[from] GeometryError),
        #[error("invalid nozzle: {0}")]
        Nozzle(#[from] PropulsionError),
        #[error(transparent)]
        Propellant(#[from] PropellantError),
    }

    /// Build a validated `GrainSpec` from a grain definition.
    pub fn grain_from_config(config: &GrainConfig) -> Result<GrainSpec, GeometryError> {
        let shape = match *config {
            GrainConfig::CylindricalPerforated {
                outer_diameter_mm,
                core_diameter_mm,
                length_mm,
                segments,
            } => GrainShape::CylindricalPerforated(Bates {
                outer_diameter: outer_diameter_mm,
                core_diameter: core_diameter_mm,
                length: length_mm,
                segments,
            }),
            GrainConfig::FinnedCylindrical {
                outer_diameter_mm,
                core_diameter_mm,
                length_mm,
                fin_count,
                fin_width_mm,
                fin_height_mm,
            } => GrainShape::FinnedCylindrical(Finocyl {
                outer_diameter: outer_diameter_mm,
                core_diameter: core_diameter_mm,
                length: length_mm,
                fin_count,
                fin_width: fin_width_mm,
                fin_height: fin_height_mm,
            }),
            GrainConfig::Star {
                outer_diameter_mm,
                length_mm,
                point_count,
                point_depth_mm,
                point_half_angle_deg,
            } => GrainShape::Star(Star {
                outer_diameter: outer_diameter_mm,
                length: length_mm,
                point_count,
                point_depth: point_depth_mm,
                point_half_angle_deg,
            }),
            GrainConfig::OffsetCore {
                outer_diameter_mm,
                core_diameter_mm,
                core_offset_mm,
                length_mm,
            } => GrainShape::OffsetCore(OffsetCore {
                outer_diameter: outer_diameter_mm,
                core_diameter: core_diameter_mm,
                core_offset: core_offset_mm,
                length: length_mm,
            }),
            GrainConfig::RodAndTube {
                outer_diameter_mm,
                inner_diameter_mm,
                rod_diameter_mm,
                length_mm,
            } => GrainShape::RodAndTube(RodAndTube {
                outer_diameter: outer_diameter_mm,
                inner_diameter: inner_diameter_mm,
                rod_diameter: rod_diameter_mm,
                length: length_mm,
            }),
            GrainConfig::EndBurner {
                diameter_mm,
                length_mm,
            } => GrainShape::EndBurner(EndBurner {
                diameter: diameter_mm,
                length: length_mm,
            }),
        };
        GrainSpec::new(shape)
    }

    /// Convert a `MotorConfig` into a runtime `Motor`, resolving preset propellants in `catalog`.
    pub fn from_config(
        config: &MotorConfig,
        catalog: &[PropellantConfig],
    ) -> Result<Motor, MotorError> {
        let grain = grain_from_config(&config.grain)?;
        let mut nozzle =
            NozzleSpec::new(config.nozzle.throat_diameter_mm, config.nozzle.exit_diameter_mm)?;
        if let Some(efficiency) = config.nozzle.efficiency {
            nozzle = nozzle.with_efficiency(efficiency)?;
        }
        let propellant = match &config.propellant {
            PropellantSource::Preset(name) => propellant::select(catalog, name)?,
            PropellantSource::Inline(inline) => propellant::from_config(inline)?,
        };

        Ok(Motor {
            name: config.name.clone(),
            grain,
            propellant,
            nozzle,
        })
    }

    /// Select a motor definition by case-insensitive name and convert it.
    pub fn select(
        configs: &[MotorConfig],
        requested: &str,
        catalog: &[PropellantConfig],
    ) -> Result<Motor, MotorError> {
        let upper = requested.to_uppercase();
        let chosen = configs
            .iter()
            .find(|cfg| cfg.name.to_uppercase() == upper)
            .ok_or_else(|| MotorError::NotFound(requested.to_string()))?;
        from_config(chosen, catalog)
    }

    /// Solver settings from the motor file, with defaults for anything unset.
    pub fn simulation_config(config: &MotorConfig) -> SimulationConfig {
        let defaults = SimulationConfig::default();
        let Some(settings) = &config.simulation else {
            return defaults;
        };
        SimulationConfig {
            ambient_pressure_mpa: settings
                .ambient_pressure_mpa
                .unwrap_or(defaults.ambient_pressure_mpa),
            time_step_s: settings.time_step_s.unwrap_or(defaults.time_step_s),
            max_steps: settings.max_steps.unwrap_or(defaults.max_steps),
            max_time_s: settings.max_time_s.unwrap_or(defaults.max_time_s),
        }
    }
}

//! Configuration models and loaders for propellant presets and motor definitions.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Propellant preset parsed from the propellant catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PropellantConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub density_kg_m3: f64,
    /// Saint-Robert coefficient `a` (mm/s/MPaⁿ).
    pub burn_rate_coefficient: f64,
    /// Saint-Robert exponent `n`.
    pub burn_rate_exponent: f64,
    pub specific_heat_ratio: f64,
    pub min_pressure_mpa: f64,
    pub max_pressure_mpa: f64,
    #[serde(default)]
    pub combustion_temperature_k: Option<f64>,
    /// kg/kmol
    #[serde(default)]
    pub exhaust_molar_mass: Option<f64>,
    #[serde(default)]
    pub characteristic_velocity_m_s: Option<f64>,
}

/// Motor definition: grain, nozzle, propellant reference and optional run settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MotorConfig {
    pub name: String,
    pub propellant: PropellantSource,
    pub grain: GrainConfig,
    pub nozzle: NozzleConfig,
    #[serde(default)]
    pub simulation: Option<SimulationSettings>,
}

/// Either the name of a catalog preset or a full inline propellant.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PropellantSource {
    Preset(String),
    Inline(PropellantConfig),
}

/// Grain geometry in motor files, tagged by `shape`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "shape")]
pub enum GrainConfig {
    #[serde(rename = "cylindrical-perforated", alias = "bates")]
    CylindricalPerforated {
        outer_diameter_mm: f64,
        core_diameter_mm: f64,
        length_mm: f64,
        #[serde(default = "default_segments")]
        segments: u32,
    },
    #[serde(rename = "finned-cylindrical", alias = "finocyl")]
    FinnedCylindrical {
        outer_diameter_mm: f64,
        core_diameter_mm: f64,
        length_mm: f64,
        fin_count: u32,
        fin_width_mm: f64,
        fin_height_mm: f64,
    },
    #[serde(rename = "star")]
    Star {
        outer_diameter_mm: f64,
        length_mm: f64,
        point_count: u32,
        point_depth_mm: f64,
        point_half_angle_deg: f64,
    },
    #[serde(rename = "offset-core", alias = "moonburner")]
    OffsetCore {
        outer_diameter_mm: f64,
        core_diameter_mm: f64,
        core_offset_mm: f64,
        length_mm: f64,
    },
    #[serde(rename = "rod-and-tube")]
    RodAndTube {
        outer_diameter_mm: f64,
        inner_diameter_mm: f64,
        rod_diameter_mm: f64,
        length_mm: f64,
    },
    #[serde(rename = "end-burner")]
    EndBurner { diameter_mm: f64, length_mm: f64 },
}

fn default_segments() -> u32 {
    1
}

/// Nozzle dimensions in motor files.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NozzleConfig {
    pub throat_diameter_mm: f64,
    pub exit_diameter_mm: f64,
    #[serde(default)]
    pub efficiency: Option<f64>,
}

/// Optional per-motor solver settings; unset fields fall back to solver defaults.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SimulationSettings {
    #[serde(default)]
    pub time_step_s: Option<f64>,
    #[serde(default)]
    pub ambient_pressure_mpa: Option<f64>,
    #[serde(default)]
    pub max_steps: Option<usize>,
    #[serde(default)]
    pub max_time_s: Option<f64>,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to serialize TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

/// Load propellant presets from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_propellants<P: AsRef<Path>>(path: P) -> Result<Vec<PropellantConfig>, ConfigError> {
    load_records(path)
}

/// Load motor definitions from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_motor_configs<P: AsRef<Path>>(path: P) -> Result<Vec<MotorConfig>, ConfigError> {
    load_records(path)
}

/// Parse a single motor definition from TOML text.
pub fn parse_motor(contents: &str) -> Result<MotorConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Render a motor definition as TOML, the save format for motor files.
pub fn motor_to_toml(motor: &MotorConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(motor)?)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

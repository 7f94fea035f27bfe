//! Shared plumbing for the `simulate`, `sweep` and `propellants` binaries.

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Args, ValueEnum};
use srocket::ballistics::{Motor, SimulationConfig, motor};
use srocket::config::{self, MotorConfig, PropellantConfig};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Output style for diagnostics written to stderr.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    // A subscriber already installed (e.g. by a test harness) keeps precedence.
    if let Err(err) = result {
        tracing::debug!(%err, "global subscriber already set");
    }
}

/// Where to find the motor and the catalogs it may reference.
#[derive(Args, Debug, Clone)]
pub struct MotorArgs {
    /// Motor name from the motor catalog (case-insensitive)
    #[arg(long, conflicts_with = "motor_file")]
    pub motor: Option<String>,

    /// Motor definition file (TOML)
    #[arg(long)]
    pub motor_file: Option<PathBuf>,

    /// Motor catalog: a TOML file, a directory of TOML files, or a YAML list
    #[arg(long, default_value = "configs/motors")]
    pub motors: PathBuf,

    /// Propellant catalog: a TOML file, a directory of TOML files, or a YAML list
    #[arg(long, default_value = "configs/propellants")]
    pub propellants: PathBuf,

    /// Override the solver time step in seconds
    #[arg(long)]
    pub time_step: Option<f64>,

    /// Override the ambient pressure in MPa
    #[arg(long)]
    pub ambient: Option<f64>,

    /// Override the step ceiling
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Override the simulated-time ceiling in seconds
    #[arg(long)]
    pub max_time: Option<f64>,
}

/// A motor definition resolved into runtime specs plus its solver settings.
#[derive(Debug, Clone)]
pub struct LoadedMotor {
    pub definition: MotorConfig,
    pub motor: Motor,
    pub config: SimulationConfig,
}

impl MotorArgs {
    /// Resolve the selected motor against the catalogs and apply CLI overrides.
    pub fn load(&self) -> anyhow::Result<LoadedMotor> {
        let definition = self.definition()?;
        let catalog = load_propellant_catalog(&self.propellants)?;
        let motor = motor::from_config(&definition, &catalog)
            .with_context(|| format!("motor '{}' is invalid", definition.name))?;

        let mut config = motor::simulation_config(&definition);
        if let Some(time_step) = self.time_step {
            config.time_step_s = time_step;
        }
        if let Some(ambient) = self.ambient {
            config.ambient_pressure_mpa = ambient;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(max_time) = self.max_time {
            config.max_time_s = max_time;
        }

        Ok(LoadedMotor {
            definition,
            motor,
            config,
        })
    }

    fn definition(&self) -> anyhow::Result<MotorConfig> {
        if let Some(path) = &self.motor_file {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return config::parse_motor(&contents)
                .with_context(|| format!("failed to parse {}", path.display()));
        }
        let name = self
            .motor
            .as_deref()
            .ok_or_else(|| anyhow!("pass --motor <NAME> or --motor-file <PATH>"))?;
        let motors = config::load_motor_configs(&self.motors)
            .with_context(|| format!("failed to load motors from {}", self.motors.display()))?;
        find_motor(&motors, name)
    }
}

/// Load the propellant catalog, tolerating a missing default directory.
pub fn load_propellant_catalog(path: &Path) -> anyhow::Result<Vec<PropellantConfig>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "propellant catalog not found; presets unavailable");
        return Ok(Vec::new());
    }
    config::load_propellants(path)
        .with_context(|| format!("failed to load propellants from {}", path.display()))
}

fn find_motor(motors: &[MotorConfig], name: &str) -> anyhow::Result<MotorConfig> {
    let upper = name.to_uppercase();
    motors
        .iter()
        .find(|m| m.name.to_uppercase() == upper)
        .cloned()
        .ok_or_else(|| anyhow!("Motor '{}' not found in catalog", name))
}

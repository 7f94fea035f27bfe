use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use srocket::ballistics::propellant;
use srocket::config::load_propellants;
use srocket_cli::{LogFormat, init_logging};

/// List the propellant presets with their burn-rate fit and derived c*.
#[derive(Parser, Debug)]
#[command(author, version, about = "Propellant preset catalog")]
struct Cli {
    /// Propellant catalog: a TOML file, a directory of TOML files, or a YAML list
    #[arg(long, default_value = "configs/propellants")]
    propellants: PathBuf,

    /// Show only presets in this category (amateur, advanced, commercial)
    #[arg(long)]
    category: Option<String>,

    /// Diagnostic log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let catalog = load_propellants(&cli.propellants)
        .with_context(|| format!("failed to load {}", cli.propellants.display()))?;

    println!(
        "{:<22} {:<11} {:>8} {:>6} {:>6} {:>6} {:>8} {:>13}",
        "name", "category", "rho", "a", "n", "gamma", "c*", "range MPa"
    );
    for entry in &catalog {
        let category = entry.category.as_deref().unwrap_or("-");
        if let Some(wanted) = &cli.category
            && !wanted.eq_ignore_ascii_case(category)
        {
            continue;
        }
        let spec = propellant::from_config(entry)
            .with_context(|| format!("preset '{}' is invalid", entry.name))?;
        println!(
            "{:<22} {:<11} {:>8.0} {:>6.2} {:>6.3} {:>6.3} {:>8.1} {:>6.2}-{:<6.2}",
            entry.name,
            category,
            spec.density_kg_m3(),
            spec.burn_rate_coefficient(),
            spec.burn_rate_exponent(),
            spec.specific_heat_ratio(),
            spec.characteristic_velocity_m_s(),
            entry.min_pressure_mpa,
            entry.max_pressure_mpa,
        );
        if let Some(description) = &entry.description {
            println!("    {}", description);
        }
    }

    Ok(())
}

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use srocket::ballistics::{BallisticsSolver, Termination};
use srocket::config;
use srocket::export::{self, report, samples, summary};
use srocket_cli::{LogFormat, MotorArgs, init_logging};

/// Simulate one motor from ignition to burnout and report its performance.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Solid rocket motor internal-ballistics simulator"
)]
struct Cli {
    #[command(flatten)]
    motor: MotorArgs,

    /// Sample log CSV (use '-' for stdout); a JSON summary is written next to it
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Text report file (defaults to stdout)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Save the resolved motor definition as TOML
    #[arg(long)]
    save: Option<PathBuf>,

    /// Diagnostic log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let loaded = cli.motor.load()?;

    if let Some(path) = &cli.save {
        let toml = config::motor_to_toml(&loaded.definition)?;
        let mut writer = export::writer_for_path(path)?;
        writer.write_all(toml.as_bytes())?;
        writer.flush()?;
    }

    let mut solver = BallisticsSolver::new(loaded.motor, loaded.config)?;
    let termination = solver.run_to_end()?;

    if let Termination::Aborted(diagnostic) = &termination
        && solver.state().samples().is_empty()
    {
        bail!(
            "simulation aborted before the first sample: {}",
            diagnostic.reason
        );
    }

    let result = solver.summary()?;
    let csv_to_stdout = cli.csv.as_deref() == Some(Path::new("-"));

    if let Some(path) = &cli.csv {
        let writer = export::writer_for_path(path)?;
        samples::write_csv(writer, solver.state().samples())
            .with_context(|| format!("failed to write {}", path.display()))?;
        if !csv_to_stdout {
            summary::write_sidecar(path, solver.motor(), &termination, &result)?;
        }
    }

    let now = chrono::Local::now();
    match &cli.report {
        Some(path) => {
            let mut writer = export::writer_for_path(path)?;
            report::write_report(&mut *writer, solver.motor(), &termination, &result, now)?;
            writer.flush()?;
        }
        None if !csv_to_stdout => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            report::write_report(&mut handle, solver.motor(), &termination, &result, now)?;
        }
        None => {}
    }

    if let Termination::Aborted(diagnostic) = termination {
        bail!("simulation aborted: {}", diagnostic.reason);
    }
    Ok(())
}

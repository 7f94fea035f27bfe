use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, bail};
use clap::Parser;
use srocket::ballistics::{Motor, SimulationConfig, SimulationResult, Termination, run};
use srocket::export::report::describe_termination;
use srocket::export::{self, sweep};
use srocket::propulsion::NozzleSpec;
use srocket_cli::{LogFormat, MotorArgs, init_logging};
use tracing::debug;

/// Sweep throat diameter for one motor, one independent solver per run.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Throat-diameter sweep for a solid rocket motor (CSV)"
)]
struct Cli {
    #[command(flatten)]
    motor: MotorArgs,

    /// Smallest throat diameter in mm
    #[arg(long)]
    throat_start: f64,

    /// Largest throat diameter in mm
    #[arg(long)]
    throat_end: f64,

    /// Throat diameter increment in mm
    #[arg(long, default_value_t = 0.5)]
    throat_step: f64,

    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,

    /// Diagnostic log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

enum Outcome {
    Finished {
        termination: Termination,
        result: Option<SimulationResult>,
        expansion_ratio: f64,
    },
    Rejected(String),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    if !(cli.throat_step > 0.0) {
        bail!("--throat-step must be positive");
    }
    if !(cli.throat_start > 0.0 && cli.throat_end >= cli.throat_start) {
        bail!("throat range must be positive and ordered");
    }

    let loaded = cli.motor.load()?;
    let diameters = throat_grid(cli.throat_start, cli.throat_end, cli.throat_step);
    let workers = cli
        .threads
        .or_else(|| thread::available_parallelism().ok().map(NonZeroUsize::get))
        .unwrap_or(1)
        .clamp(1, diameters.len().max(1));
    debug!(runs = diameters.len(), workers, "starting throat sweep");

    let chunk = diameters.len().div_ceil(workers).max(1);
    let motor = &loaded.motor;
    let config = loaded.config;
    let outcomes: Vec<Outcome> = thread::scope(|scope| {
        let handles: Vec<_> = diameters
            .chunks(chunk)
            .map(|slice| {
                scope.spawn(move || {
                    slice
                        .iter()
                        .map(|&throat| simulate(motor, config, throat))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().map_err(|_| anyhow!("sweep worker panicked")))
            .collect::<anyhow::Result<Vec<_>>>()
            .map(|chunks| chunks.into_iter().flatten().collect())
    })?;

    let mut writer = export::writer_for_path(&cli.output)?;
    sweep::write_header(&mut *writer)?;
    for (throat, outcome) in diameters.iter().zip(&outcomes) {
        record_for(*throat, outcome).write_to(&mut *writer)?;
    }
    writer.flush()?;

    Ok(())
}

fn throat_grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    let count = ((end - start) / step + 1e-9).floor() as usize + 1;
    (0..count).map(|i| start + step * i as f64).collect()
}

fn simulate(base: &Motor, config: SimulationConfig, throat: f64) -> Outcome {
    let nozzle = NozzleSpec::new(throat, base.nozzle.exit_diameter_mm())
        .and_then(|nozzle| nozzle.with_efficiency(base.nozzle.efficiency()));
    let nozzle = match nozzle {
        Ok(nozzle) => nozzle,
        Err(err) => return Outcome::Rejected(err.to_string()),
    };
    let motor = Motor {
        nozzle,
        ..base.clone()
    };

    match run(motor.clone(), config) {
        Ok(finished) => {
            let state = &finished.state;
            let result =
                SimulationResult::from_samples(&motor, state.samples(), state.regression_mm())
                    .ok();
            Outcome::Finished {
                termination: finished.termination,
                result,
                expansion_ratio: nozzle.expansion_ratio(),
            }
        }
        Err(err) => Outcome::Rejected(err.to_string()),
    }
}

fn record_for(throat: f64, outcome: &Outcome) -> sweep::Record<'_> {
    let empty = sweep::Record {
        throat_diameter_mm: throat,
        expansion_ratio: 0.0,
        status: "rejected",
        initial_kn: 0.0,
        peak_kn: 0.0,
        max_pressure_mpa: 0.0,
        average_pressure_mpa: 0.0,
        max_thrust_n: 0.0,
        total_impulse_ns: 0.0,
        burn_time_s: 0.0,
        specific_impulse_s: 0.0,
        designation: "",
        warnings: 0,
    };
    match outcome {
        Outcome::Rejected(reason) => {
            debug!(throat, %reason, "sweep point rejected");
            empty
        }
        Outcome::Finished {
            termination,
            result,
            expansion_ratio,
        } => {
            let status = match termination {
                Termination::Completed => "completed",
                Termination::Incomplete(_) => "incomplete",
                Termination::Aborted(_) => {
                    debug!(throat, reason = %describe_termination(termination), "sweep point aborted");
                    "aborted"
                }
            };
            match result {
                Some(result) => sweep::Record {
                    throat_diameter_mm: throat,
                    expansion_ratio: *expansion_ratio,
                    status,
                    initial_kn: result.initial_kn,
                    peak_kn: result.peak_kn,
                    max_pressure_mpa: result.max_pressure_mpa,
                    average_pressure_mpa: result.average_pressure_mpa,
                    max_thrust_n: result.max_thrust_n,
                    total_impulse_ns: result.total_impulse_ns,
                    burn_time_s: result.burn_time_s,
                    specific_impulse_s: result.specific_impulse_s,
                    designation: &result.designation,
                    warnings: result.warnings.len(),
                },
                None => sweep::Record {
                    expansion_ratio: *expansion_ratio,
                    status,
                    ..empty
                },
            }
        }
    }
}

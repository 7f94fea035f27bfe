//! Export helpers for CSV, JSON and plain-text motor artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Path of the JSON summary written next to `output` (`<stem>_summary.json`).
pub fn sidecar_path(output: &Path) -> PathBuf {
    let parent = output.parent().unwrap_or_else(|| Path::new("."));
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("motor");
    parent.join(format!("{}_summary.json", stem))
}

pub mod samples {
    use std::io::Write;

    use srocket_ballistics::Sample;

    use crate::ExportError;

    /// Write the sample log as CSV, one row per sample, header from field names.
    pub fn write_csv<W: Write>(writer: W, samples: &[Sample]) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for sample in samples {
            csv.serialize(sample)?;
        }
        csv.flush()?;
        Ok(())
    }
}

pub mod summary {
    use std::fs::{self, File};
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use srocket_ballistics::{Motor, SimulationResult, Termination};

    use crate::{ExportError, sidecar_path};

    #[derive(Serialize)]
    struct SummarySidecar<'a> {
        motor: &'a str,
        propellant: &'a str,
        grain_shape: &'a str,
        throat_diameter_mm: f64,
        exit_diameter_mm: f64,
        termination: String,
        #[serde(flatten)]
        result: &'a SimulationResult,
    }

    /// Write the JSON summary sidecar next to `output` and return its path.
    pub fn write_sidecar(
        output: &Path,
        motor: &Motor,
        termination: &Termination,
        result: &SimulationResult,
    ) -> Result<std::path::PathBuf, ExportError> {
        let path = sidecar_path(output);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let sidecar = SummarySidecar {
            motor: &motor.name,
            propellant: motor.propellant.name(),
            grain_shape: motor.grain.kind().as_str(),
            throat_diameter_mm: motor.nozzle.throat_diameter_mm(),
            exit_diameter_mm: motor.nozzle.exit_diameter_mm(),
            termination: crate::report::describe_termination(termination),
            result,
        };
        to_writer_pretty(File::create(&path)?, &sidecar)?;
        Ok(path)
    }
}

pub mod report {
    use std::io::{self, Write};

    use chrono::{DateTime, Local};
    use srocket_ballistics::{Ceiling, Motor, SimulationResult, Termination};

    /// One-line description of how a run ended.
    pub fn describe_termination(termination: &Termination) -> String {
        match termination {
            Termination::Completed => "completed".to_string(),
            Termination::Incomplete(Ceiling::Steps(steps)) => {
                format!("incomplete (step ceiling {} reached)", steps)
            }
            Termination::Incomplete(Ceiling::Time(limit)) => {
                format!("incomplete (time ceiling {:.3} s reached)", limit)
            }
            Termination::Aborted(diagnostic) => format!(
                "aborted at step {} (t = {:.3} s): {}",
                diagnostic.step_index, diagnostic.time_s, diagnostic.reason
            ),
        }
    }

    /// Write the human-readable results report.
    pub fn write_report(
        writer: &mut dyn Write,
        motor: &Motor,
        termination: &Termination,
        result: &SimulationResult,
        generated_at: DateTime<Local>,
    ) -> io::Result<()> {
        writeln!(writer, "=== Motor Report: {} ===", motor.name)?;
        writeln!(
            writer,
            "Generated       : {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(writer, "Status          : {}", describe_termination(termination))?;
        writeln!(writer, "Propellant      : {}", motor.propellant.name())?;
        writeln!(
            writer,
            "Grain           : {} ({:.1} mm long, {:.1} mm OD)",
            motor.grain.kind(),
            result.propellant_length_mm,
            motor.grain.outer_diameter()
        )?;
        writeln!(
            writer,
            "Nozzle          : throat {:.2} mm, exit {:.2} mm, efficiency {:.2}",
            motor.nozzle.throat_diameter_mm(),
            motor.nozzle.exit_diameter_mm(),
            motor.nozzle.efficiency()
        )?;
        writeln!(
            writer,
            "Designation     : {} ({}-class)",
            result.designation, result.motor_class
        )?;
        writeln!(
            writer,
            "Total impulse   : {:.2} N·s",
            result.total_impulse_ns
        )?;
        writeln!(writer, "Burn time       : {:.3} s", result.burn_time_s)?;
        writeln!(
            writer,
            "Thrust          : max {:.1} N, average {:.1} N",
            result.max_thrust_n, result.average_thrust_n
        )?;
        writeln!(
            writer,
            "Chamber pressure: max {:.3} MPa, average {:.3} MPa",
            result.max_pressure_mpa, result.average_pressure_mpa
        )?;
        writeln!(
            writer,
            "Specific impulse: {:.1} s",
            result.specific_impulse_s
        )?;
        writeln!(
            writer,
            "Propellant mass : {:.4} kg ({:.4} kg burned, {:.1}% loading)",
            result.propellant_mass_kg,
            result.propellant_mass_consumed_kg,
            result.volumetric_loading_percent
        )?;
        writeln!(
            writer,
            "Kn              : initial {:.1}, peak {:.1}",
            result.initial_kn, result.peak_kn
        )?;
        writeln!(
            writer,
            "Thrust coeff.   : ideal {:.3}, delivered {:.3}",
            result.ideal_thrust_coefficient, result.delivered_thrust_coefficient
        )?;
        writeln!(
            writer,
            "Port/throat     : throat-to-port {:.3}, peak mass flux {:.1} kg/m²/s",
            result.throat_to_port_ratio, result.peak_mass_flux_kg_m2_s
        )?;
        if result.warnings.is_empty() {
            writeln!(writer, "Warnings        : none")?;
        } else {
            for warning in &result.warnings {
                writeln!(writer, "Warning         : {:?}", warning)?;
            }
        }
        Ok(())
    }
}

pub mod sweep {
    use std::io::{self, Write};

    const HEADER: &str = "throat_diameter_mm,expansion_ratio,status,initial_kn,peak_kn,max_pressure_mpa,average_pressure_mpa,max_thrust_n,total_impulse_ns,burn_time_s,specific_impulse_s,designation,warnings";

    /// Write the standard sweep CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// CSV row emitted for one throat diameter of a sweep.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub throat_diameter_mm: f64,
        pub expansion_ratio: f64,
        pub status: &'a str,
        pub initial_kn: f64,
        pub peak_kn: f64,
        pub max_pressure_mpa: f64,
        pub average_pressure_mpa: f64,
        pub max_thrust_n: f64,
        pub total_impulse_ns: f64,
        pub burn_time_s: f64,
        pub specific_impulse_s: f64,
        pub designation: &'a str,
        pub warnings: usize,
    }

    impl Record<'_> {
        /// Serialize the record to CSV, matching the standard header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{:.3},{:.4},{},{:.3},{:.3},{:.4},{:.4},{:.3},{:.3},{:.4},{:.2},{},{}",
                self.throat_diameter_mm,
                self.expansion_ratio,
                self.status,
                self.initial_kn,
                self.peak_kn,
                self.max_pressure_mpa,
                self.average_pressure_mpa,
                self.max_thrust_n,
                self.total_impulse_ns,
                self.burn_time_s,
                self.specific_impulse_s,
                self.designation,
                self.warnings,
            )
        }
    }
}

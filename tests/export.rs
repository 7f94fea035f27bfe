use std::fs;

use srocket::ballistics::{BallisticsSolver, Motor, SimulationConfig, Termination};
use srocket::export::{report, samples, sidecar_path, summary, sweep};
use srocket::geometry::{EndBurner, GrainShape, GrainSpec};
use srocket::propulsion::{NozzleSpec, PropellantParams, PropellantSpec};

fn small_end_burner() -> Motor {
    Motor {
        name: "Export Test".to_string(),
        grain: GrainSpec::new(GrainShape::EndBurner(EndBurner {
            diameter: 30.0,
            length: 5.0,
        }))
        .expect("valid grain"),
        propellant: PropellantSpec::new(PropellantParams {
            name: "Test Mix".to_string(),
            density_kg_m3: 1800.0,
            burn_rate_coefficient: 8.0,
            burn_rate_exponent: 0.3,
            min_pressure_mpa: 0.5,
            max_pressure_mpa: 12.0,
            specific_heat_ratio: 1.13,
            combustion: None,
            characteristic_velocity_m_s: Some(900.0),
        })
        .expect("valid propellant"),
        nozzle: NozzleSpec::new(3.0, 7.0).expect("valid nozzle"),
    }
}

fn finished_solver() -> BallisticsSolver {
    let mut solver =
        BallisticsSolver::new(small_end_burner(), SimulationConfig::default()).expect("solver");
    assert_eq!(solver.run_to_end().expect("run"), Termination::Completed);
    solver
}

#[test]
fn sample_csv_has_one_row_per_sample() {
    let solver = finished_solver();
    let mut buffer = Vec::new();
    samples::write_csv(&mut buffer, solver.state().samples()).expect("csv");

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(&headers[0], "time_s");
    assert_eq!(&headers[5], "chamber_pressure_mpa");
    assert_eq!(&headers[11], "thrust_n");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), solver.state().samples().len());
    let first_thrust: f64 = rows[0][11].parse().expect("thrust");
    assert_eq!(first_thrust, solver.state().samples()[0].thrust_n);
    let last_thrust: f64 = rows[rows.len() - 1][11].parse().expect("thrust");
    assert_eq!(last_thrust, 0.0);
}

#[test]
fn summary_sidecar_lands_next_to_the_output() {
    let solver = finished_solver();
    let result = solver.summary().expect("summary");
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("runs").join("motor.csv");

    let written = summary::write_sidecar(
        &output,
        solver.motor(),
        solver.termination().expect("terminated"),
        &result,
    )
    .expect("sidecar");
    assert_eq!(written, dir.path().join("runs").join("motor_summary.json"));
    assert_eq!(written, sidecar_path(&output));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).expect("read")).expect("json");
    assert_eq!(json["motor"], "Export Test");
    assert_eq!(json["grain_shape"], "end-burner");
    assert_eq!(json["termination"], "completed");
    assert_eq!(json["designation"], result.designation.as_str());
    let impulse = json["total_impulse_ns"].as_f64().expect("impulse");
    assert!((impulse - result.total_impulse_ns).abs() < 1e-9);
    assert!(json["warnings"].is_array());
}

#[test]
fn text_report_lists_the_headline_numbers() {
    let solver = finished_solver();
    let result = solver.summary().expect("summary");
    let mut buffer = Vec::new();
    report::write_report(
        &mut buffer,
        solver.motor(),
        solver.termination().expect("terminated"),
        &result,
        chrono::Local::now(),
    )
    .expect("report");

    let text = String::from_utf8(buffer).expect("utf8");
    assert!(text.starts_with("=== Motor Report: Export Test ==="));
    assert!(text.contains("Status          : completed"));
    assert!(text.contains("Propellant      : Test Mix"));
    assert!(text.contains(&result.designation));
    assert!(text.contains("Generated"));
}

#[test]
fn sweep_records_follow_the_header() {
    let mut buffer = Vec::new();
    sweep::write_header(&mut buffer).expect("header");
    sweep::Record {
        throat_diameter_mm: 10.0,
        expansion_ratio: 4.0,
        status: "completed",
        initial_kn: 170.0,
        peak_kn: 340.0,
        max_pressure_mpa: 11.2,
        average_pressure_mpa: 8.0,
        max_thrust_n: 1200.0,
        total_impulse_ns: 1050.0,
        burn_time_s: 1.54,
        specific_impulse_s: 165.0,
        designation: "I682",
        warnings: 0,
    }
    .write_to(&mut buffer)
    .expect("record");

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers().expect("headers").clone();
    let row = reader.records().next().expect("one row").expect("row");
    assert_eq!(headers.len(), row.len());
    assert_eq!(&row[2], "completed");
    assert_eq!(&row[11], "I682");
}

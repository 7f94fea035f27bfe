use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn configs() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs")
}

fn catalog_args() -> Vec<String> {
    let root = configs();
    vec![
        "--motors".to_string(),
        root.join("motors").display().to_string(),
        "--propellants".to_string(),
        root.join("propellants").display().to_string(),
    ]
}

#[test]
fn simulate_prints_report_for_catalog_motor() {
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args(catalog_args())
        .args(["--motor", "knsb bates 70"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Motor Report: KNSB BATES 70 ==="))
        .stdout(predicate::str::contains("Status          : completed"))
        .stdout(predicate::str::contains("Warnings        : none"));
}

#[test]
fn simulate_writes_csv_sidecar_and_saved_definition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("out").join("bates.csv");
    let report_path = dir.path().join("bates.txt");
    let save_path = dir.path().join("bates.toml");

    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args(catalog_args())
        .args(["--motor", "KNSB BATES 70", "--csv"])
        .arg(&csv_path)
        .arg("--report")
        .arg(&report_path)
        .arg("--save")
        .arg(&save_path)
        .assert()
        .success();

    let csv = fs::read_to_string(&csv_path).expect("csv");
    assert!(csv.starts_with("time_s,regression_mm,"));
    assert!(csv.lines().count() > 100);

    let sidecar = dir.path().join("out").join("bates_summary.json");
    assert!(fs::metadata(&sidecar).expect("sidecar").len() > 0);
    assert!(
        fs::read_to_string(&report_path)
            .expect("report")
            .contains("Designation")
    );

    // The saved definition simulates on its own.
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .arg("--propellants")
        .arg(configs().join("propellants"))
        .arg("--motor-file")
        .arg(&save_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("KNSB BATES 70"));
}

#[test]
fn simulate_rejects_unknown_motor() {
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args(catalog_args())
        .args(["--motor", "does not exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn simulate_reports_step_ceiling_as_incomplete() {
    Command::cargo_bin("simulate")
        .expect("simulate bin")
        .args(catalog_args())
        .args(["--motor", "KNSB BATES 70", "--max-steps", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("incomplete (step ceiling 10 reached)"));
}

#[test]
fn sweep_emits_one_row_per_throat() {
    let output = Command::cargo_bin("sweep")
        .expect("sweep bin")
        .args(catalog_args())
        .args([
            "--motor",
            "KNSB BATES 70",
            "--throat-start",
            "9",
            "--throat-end",
            "11",
            "--throat-step",
            "0.5",
            "--threads",
            "2",
        ])
        .output()
        .expect("run sweep");
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("throat_diameter_mm,"));
    assert_eq!(lines.len(), 6);
    assert!(lines[1].starts_with("9.000,"));
    assert!(lines[5].starts_with("11.000,"));
    assert!(lines[1..].iter().all(|line| line.contains(",completed,")));
}

#[test]
fn propellants_lists_presets() {
    Command::cargo_bin("propellants")
        .expect("propellants bin")
        .arg("--propellants")
        .arg(configs().join("propellants"))
        .assert()
        .success()
        .stdout(predicate::str::contains("KNSB"))
        .stdout(predicate::str::contains("RCS - Blue Thunder"));

    Command::cargo_bin("propellants")
        .expect("propellants bin")
        .arg("--propellants")
        .arg(configs().join("propellants"))
        .args(["--category", "commercial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KNDX").not())
        .stdout(predicate::str::contains("RCS - White Lightning"));
}

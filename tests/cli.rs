use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn envelope_reports_a_derate_for_a_light_clean_takeoff() {
    Command::cargo_bin("envelope")
        .expect("envelope bin")
        .args([
            "--weight", "60000", "--altitude", "0", "--mach", "0.25", "--config", "CLEAN",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Setting: DERATE 85.0%"))
        .stdout(predicate::str::contains("Status: NORMAL"));
}

#[test]
fn envelope_flags_heavy_full_flap_takeoff_without_afterburner() {
    Command::cargo_bin("envelope")
        .expect("envelope bin")
        .args(["--weight", "70000", "--mach", "0.2", "--config", "FULL", "--trials"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: UNSAFE"))
        .stdout(predicate::str::contains("Trials:"));

    Command::cargo_bin("envelope")
        .expect("envelope bin")
        .args([
            "--weight", "70000", "--mach", "0.2", "--config", "FULL", "--allow-ab", "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ESCALATED\""));
}

#[test]
fn envelope_rejects_unknown_configuration() {
    Command::cargo_bin("envelope")
        .expect("envelope bin")
        .args(["--weight", "60000", "--config", "GEAR"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEAR"));
}

#[test]
fn sweep_exports_csv_and_summary_then_plots() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("sweep.csv");
    let json_path = dir.path().join("summary.json");
    let png_path = dir.path().join("gradient.png");

    Command::cargo_bin("envelope_sweep")
        .expect("envelope_sweep bin")
        .args([
            "--start",
            "50000",
            "--end",
            "70000",
            "--step",
            "5000",
            "--mach",
            "0.2",
            "--allow-ab",
            "--output",
            csv_path.to_str().unwrap(),
            "--summary",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let csv = fs::read_to_string(&csv_path).expect("sweep csv");
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.contains(",CLEAN,"));
    assert!(csv.contains(",FULL,"));
    let summary = fs::read_to_string(&json_path).expect("summary json");
    assert!(summary.contains("\"generated_at\""));

    Command::cargo_bin("gradient_plot")
        .expect("gradient_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
            "--width",
            "400",
            "--height",
            "300",
        ])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn sweep_rejects_an_empty_range() {
    Command::cargo_bin("envelope_sweep")
        .expect("envelope_sweep bin")
        .args(["--start", "70000", "--end", "50000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty weight range"));
}

use assert_cmd::Command;
use predicates::str::{contains, starts_with};
use std::io::Write;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("solar-twin").unwrap();
    cmd.arg("--utc");
    cmd
}

fn scene_json(args: &[&str]) -> serde_json::Value {
    let out = cmd().arg("--json").args(args).assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn default_installation_summary() {
    cmd()
        .assert()
        .success()
        .stdout(contains("5 columns x 5 rows, 25 placed"))
        .stdout(contains("9.200 x 3.000 x 9.200"))
        .stdout(contains("Faults      : none"))
        .stdout(contains("Sun (orbit)"));
}

#[test]
fn faulty_panel_is_reported_in_json() {
    let scene = scene_json(&["--faulty-panels", "16"]);
    let panels = scene["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 25);
    for p in panels {
        assert_eq!(p["has_error"], p["index"] == 16);
    }
    assert_eq!(scene["sun"]["position"]["x"], 100.0);
}

#[test]
fn panel_list_marks_faults() {
    cmd()
        .args(["--faulty-panels", "3", "--panels"])
        .assert()
        .success()
        .stdout(contains("FAULT"))
        .stdout(contains("Faults      : 1 (panels 3)"));
}

#[test]
fn fault_file_drives_panel_count() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let entries: Vec<String> =
        (0..7).map(|i| format!("{{\"hasError\": {}}}", i == 4)).collect();
    write!(file, "{{\"panels\": [{}]}}", entries.join(",")).unwrap();

    let scene = scene_json(&["--fault-file", file.path().to_str().unwrap()]);
    let panels = scene["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 7);
    assert_eq!(panels[4]["has_error"], true);
}

#[test]
fn short_fault_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let entries = vec!["{\"hasError\": false}"; 10];
    write!(file, "{{\"panels\": [{}]}}", entries.join(",")).unwrap();

    cmd()
        .args(["--fault-file", file.path().to_str().unwrap(), "--panel-count", "25"])
        .assert()
        .code(1)
        .stderr(starts_with("Error: fault table has 10 entries but 25 panels would be placed"));
}

#[test]
fn oversized_panel_leaves_frame_only() {
    cmd()
        .args(["--panel-length", "60"])
        .assert()
        .success()
        .stdout(contains("panel does not fit"));
}

#[test]
fn gaps_filling_the_frame_still_place_every_slot() {
    let scene = scene_json(&[
        "--frame-length",
        "10",
        "--frame-depth",
        "10",
        "--panel-length",
        "0.9",
        "--panel-depth",
        "0.9",
        "--panel-count",
        "121",
    ]);
    assert_eq!(scene["shape"]["columns"], 11);
    assert_eq!(scene["shape"]["rows"], 11);
    assert_eq!(scene["panels"].as_array().unwrap().len(), 121);
}

#[test]
fn ephemeris_sun_over_helsinki() {
    let scene = scene_json(&[
        "--latitude",
        "60.17",
        "--longitude",
        "24.94",
        "--date",
        "2025-06-21",
        "--at",
        "10:21",
    ]);
    assert_eq!(scene["sun"]["model"], "ephemeris");
    assert_eq!(scene["sun"]["below_horizon"], false);
    let y = scene["sun"]["position"]["y"].as_f64().unwrap();
    // 300 * sin(53.3°)
    assert!(y > 235.0 && y < 245.0, "y = {}", y);
}

#[test]
fn ephemeris_text_output_shows_instant() {
    cmd()
        .args(["--latitude", "60.17", "--longitude", "24.94"])
        .args(["--date", "2025-06-21", "--at", "22:21", "--no-refraction"])
        .assert()
        .success()
        .stdout(contains("Sun (ephemeris) at 2025-06-21 22:21:00 UTC"))
        .stdout(contains("Below the horizon."));
}

#[test]
fn invalid_inputs_are_rejected_by_parser() {
    cmd().args(["--latitude", "95", "--longitude", "0"]).assert().failure();
    cmd().args(["--frame-length", "0"]).assert().failure();
    cmd().args(["--panel-count", "0"]).assert().failure();
    cmd().args(["--at", "25:00"]).assert().failure().stderr(contains("invalid timestamp"));
}

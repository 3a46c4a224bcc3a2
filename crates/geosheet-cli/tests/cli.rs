use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BASE: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type":"Feature","geometry":{"type":"Point","coordinates":[10.0,20.0]},"properties":{"iconCaption":"Old"}},
    {"type":"Feature","geometry":{"type":"LineString","coordinates":[[0.0,0.0],[1.0,1.0]]},"properties":{"description":"Track"}}
  ]
}"#;

const SHEET: &str = "Name,Description,Coordinates
Kremlin,Red Square,\"55.75, 37.62\"
Hermitage,Museum,59.94;30.31
Broken,Bad cell,55.1;east
";

fn geosheet() -> Command {
    Command::cargo_bin("geosheet").unwrap()
}

fn write_config(dir: &Path, color: &str) -> std::path::PathBuf {
    let config = dir.join("config.yaml");
    let yaml = format!(
        "sheet:\n  file: {}\n  columns:\n    name: A\n    description: B\n    coordinates: C\n\
         geojson:\n  input: {}\n  output: {}\nappearance:\n  marker_color: \"{color}\"\n",
        dir.join("points.csv").display(),
        dir.join("base.geojson").display(),
        dir.join("out.geojson").display(),
    );
    fs::write(&config, yaml).unwrap();
    config
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("points.csv"), SHEET).unwrap();
    fs::write(dir.path().join("base.geojson"), BASE).unwrap();
    dir
}

#[test]
fn test_convert_writes_points() {
    let dir = setup();
    let config = write_config(dir.path(), "#00FF00");

    geosheet()
        .args(["convert", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 2 point(s)"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out.geojson")).unwrap()).unwrap();
    let features = written["features"].as_array().unwrap();
    assert_eq!(features.len(), 4);

    let kremlin = &features[2];
    assert_eq!(kremlin["geometry"]["type"], "Point");
    assert_eq!(kremlin["geometry"]["coordinates"], serde_json::json!([37.62, 55.75]));
    assert_eq!(kremlin["properties"]["iconCaption"], "Kremlin");
    assert_eq!(kremlin["properties"]["description"], "Red Square");
    assert_eq!(kremlin["properties"]["marker-color"], "#00FF00");
}

#[test]
fn test_convert_reports_skipped_rows() {
    let dir = setup();
    let config = write_config(dir.path(), "#FF0000");

    geosheet()
        .args(["convert", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("row 4"));
}

#[test]
fn test_convert_bad_point_names_row_and_cell() {
    let dir = setup();
    fs::write(
        dir.path().join("points.csv"),
        "Name,Description,Coordinates\nok,one,1 2\nbad,three,1 2 3\n",
    )
    .unwrap();
    let config = write_config(dir.path(), "#FF0000");

    geosheet()
        .args(["convert", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sheet 'points'"))
        .stderr(predicate::str::contains("row 3"))
        .stderr(predicate::str::contains("'1 2 3'"))
        .stderr(predicate::str::contains("Error:").count(1));

    assert!(!dir.path().join("out.geojson").exists());
}

#[test]
fn test_convert_missing_config() {
    let dir = TempDir::new().unwrap();

    geosheet()
        .args(["convert", "--config"])
        .arg(dir.path().join("nope.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_convert_missing_required_column() {
    let dir = setup();
    let config = dir.path().join("config.yaml");
    fs::write(
        &config,
        "sheet:\n  file: points.csv\n  columns:\n    description: B\ngeojson:\n  input: a\n  output: b\n",
    )
    .unwrap();

    geosheet()
        .args(["convert", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sheet.columns.coordinates"));
}

#[test]
fn test_remove_points() {
    let dir = setup();
    let file = dir.path().join("base.geojson");

    geosheet()
        .args(["remove-points", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 point(s)"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    let features = written["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "LineString");
}

#[test]
fn test_export_and_show() {
    let dir = setup();
    let input = dir.path().join("base.geojson");
    let output = dir.path().join("features.csv");

    geosheet()
        .args(["export", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 record(s)"));

    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.contains("Point,Old,,\"[10.0,20.0]\""));
    assert!(csv.contains("LineString,,Track,"));

    geosheet()
        .arg("show")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Features: 2"))
        .stdout(predicate::str::contains("Track"));
}

#[test]
fn test_show_rejects_single_feature() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("feature.geojson");
    fs::write(
        &file,
        r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[0,0]},"properties":{}}"#,
    )
    .unwrap();

    geosheet()
        .arg("show")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a FeatureCollection"));
}

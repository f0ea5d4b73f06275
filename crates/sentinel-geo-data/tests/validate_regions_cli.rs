//! End-to-end runs of the `validate-regions` binary.

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use sentinel_geo_data::{
    FixtureConfig, REGION_TABLE_ENV, RegionAsset, RegionRecord, create_fixture_asset,
};
use serde_json::Value;

fn validate_regions() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_validate-regions"));
    cmd.env_remove(REGION_TABLE_ENV);
    cmd
}

fn write_asset(dir: &Path, asset: &RegionAsset) -> std::path::PathBuf {
    let path = dir.join("regions.json");
    fs::write(&path, asset.to_json_string().unwrap()).unwrap();
    path
}

fn read_report(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("validate-regions should start")
}

#[test]
fn test_embedded_asset_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.json");

    let output = run(validate_regions().arg("--output").arg(&report));
    assert!(output.status.success(), "{output:?}");

    let value = read_report(&report);
    assert!(value["region_count"].as_u64().unwrap() > 100);
    assert!(value["issues"].as_array().unwrap().is_empty());
}

#[test]
fn test_swapped_centroid_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut asset = create_fixture_asset(&FixtureConfig::minimal());
    asset.regions.push(RegionRecord::new("Swapped", 120.6, 16.41));
    let asset_path = write_asset(dir.path(), &asset);
    let report = dir.path().join("report.json");

    let output = run(validate_regions()
        .arg("--asset")
        .arg(&asset_path)
        .arg("-o")
        .arg(&report));
    assert_eq!(output.status.code(), Some(1));

    let issues = read_report(&report)["issues"].as_array().unwrap().clone();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["name"], "Swapped");
    assert_eq!(issues[0]["kind"], "out_of_range");
    assert_eq!(issues[0]["swapped"], true);
}

#[test]
fn test_asset_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let asset = create_fixture_asset(&FixtureConfig::minimal());
    let asset_path = write_asset(dir.path(), &asset);
    let report = dir.path().join("report.json");

    let output = run(validate_regions()
        .env(REGION_TABLE_ENV, &asset_path)
        .arg("--output")
        .arg(&report));
    assert!(output.status.success(), "{output:?}");
    assert_eq!(read_report(&report)["region_count"], 3);
}

#[test]
fn test_legacy_table_diff() {
    let dir = tempfile::tempdir().unwrap();
    let asset = create_fixture_asset(&FixtureConfig::minimal());
    let asset_path = write_asset(dir.path(), &asset);

    let legacy_path = dir.path().join("map.component.ts");
    let legacy: String = asset
        .regions
        .iter()
        .enumerate()
        .map(|(i, r)| {
            // Second entry drifted by a few hundred metres
            let lat = if i == 1 { r.lat + 0.004 } else { r.lat };
            format!("  '{}': [{lat}, {}],\n", r.name, r.lng)
        })
        .collect();
    fs::write(
        &legacy_path,
        format!("private readonly BARANGAY_CENTROIDS = {{\n{legacy}}};\n"),
    )
    .unwrap();
    let report = dir.path().join("report.json");

    let output = run(validate_regions()
        .arg("--asset")
        .arg(&asset_path)
        .arg("--legacy")
        .arg(&legacy_path)
        .arg("--output")
        .arg(&report));
    assert_eq!(output.status.code(), Some(1));

    let value = read_report(&report);
    let diffs = value["legacy"][0]["diffs"].as_array().unwrap();
    assert_eq!(value["legacy"][0]["count"], 3);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0]["reason"], "coords_mismatch");
    assert_eq!(diffs[0]["name"], asset.regions[1].name);
}

#[test]
fn test_missing_asset_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(validate_regions()
        .arg("--asset")
        .arg(dir.path().join("missing.json")));
    assert_eq!(output.status.code(), Some(2));
}

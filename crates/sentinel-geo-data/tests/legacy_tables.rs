//! Legacy hand-written centroid tables checked against the asset.

use sentinel_geo_data::{
    DEFAULT_DIFF_TOLERANCE, FixtureConfig, IssueKind, TableDiff, check_centroids,
    create_fixture_asset, diff_tables, extract_centroids,
};

const MAP_COMPONENT: &str = r#"
import { Component } from '@angular/core';

@Component({ selector: 'app-map', templateUrl: './map.page.html' })
export class MapPage {
  private readonly BARANGAY_CENTROIDS: { [key: string]: [number, number] } = {
    'Session Road Area': [16.4125, 120.5964],
    Irisan: [120.5606, 16.4083],
    Kias: [16.3700, 120.6233],
    'Bal-Marcoville (Marcoville)': [16.4089, 120.6017],
    'Outlook Drive': [16.4031, 120.6139],
  };

  private zoom = 13;
}
"#;

const REPORT_FORM: &str = r#"
export const BARANGAY_CENTROIDS = {
  'Session Road Area': [16.4125, 120.5964],
  Irisan: [16.4083, 120.5606],
  Kias: [16.3667, 120.6233],
  'Bal-Marcoville (Marcoville)': [16.4089, 120.6017],
};
"#;

#[test]
fn test_legacy_table_extract_validate_diff() {
    let asset = create_fixture_asset(&FixtureConfig::sample());
    let legacy = extract_centroids(MAP_COMPONENT, "BARANGAY_CENTROIDS").unwrap();
    assert_eq!(legacy.len(), 5);

    // Range check only catches the transposed entry; Kias drifted but stays in town
    let issues = check_centroids(&legacy, &asset.bounds);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].name, "Irisan");
    assert!(issues[0].is_swapped());
    assert!(matches!(
        issues[0].kind,
        IssueKind::OutOfRange {
            lat_ok: false,
            lng_ok: false,
            swapped: true
        }
    ));

    let diffs = diff_tables(&legacy, &asset.regions, DEFAULT_DIFF_TOLERANCE);
    let mismatched: Vec<&str> = diffs
        .iter()
        .filter(|d| matches!(d, TableDiff::CoordsMismatch { .. }))
        .map(TableDiff::name)
        .collect();
    assert_eq!(mismatched, vec!["Irisan", "Kias"]);

    let legacy_only: Vec<&str> = diffs
        .iter()
        .filter(|d| matches!(d, TableDiff::MissingInOne { right: None, .. }))
        .map(TableDiff::name)
        .collect();
    assert_eq!(legacy_only, vec!["Outlook Drive"]);

    // Entries that agree with the asset never show up
    assert!(diffs.iter().all(|d| d.name() != "Session Road Area"));
    assert!(diffs.iter().all(|d| d.name() != "Bal-Marcoville (Marcoville)"));

    let missing_from_legacy = diffs
        .iter()
        .filter(|d| matches!(d, TableDiff::MissingInOne { left: None, .. }))
        .count();
    assert_eq!(missing_from_legacy, asset.regions.len() - 4);
}

#[test]
fn test_two_legacy_tables_disagree_only_where_one_drifted() {
    let map = extract_centroids(MAP_COMPONENT, "BARANGAY_CENTROIDS").unwrap();
    let form = extract_centroids(REPORT_FORM, "BARANGAY_CENTROIDS").unwrap();

    let diffs = diff_tables(&map, &form, DEFAULT_DIFF_TOLERANCE);
    let names: Vec<&str> = diffs.iter().map(TableDiff::name).collect();
    assert_eq!(names, vec!["Irisan", "Kias", "Outlook Drive"]);

    let TableDiff::CoordsMismatch { left, right, .. } = &diffs[0] else {
        panic!("expected a coordinate mismatch for Irisan, got {:?}", diffs[0]);
    };
    assert_eq!(*left, [120.5606, 16.4083]);
    assert_eq!(*right, [16.4083, 120.5606]);

    // The report form copy is clean
    let asset = create_fixture_asset(&FixtureConfig::sample());
    assert!(check_centroids(&form, &asset.bounds).is_empty());
}

//! Acceptance checks for a region table.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::asset::{Bounds, RegionAsset, RegionRecord};

/// What is wrong with a single table entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// At least one component lies outside the municipal bounds.
    ///
    /// `swapped` is set when both components are out of range and each would be
    /// in range after exchanging latitude and longitude.
    OutOfRange {
        lat_ok: bool,
        lng_ok: bool,
        swapped: bool,
    },
    /// The name appears more than once; only the first entry is reachable by name.
    DuplicateName,
    /// A landmark points at a region the table does not contain.
    UnknownLandmarkRegion { region: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentroidIssue {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl CentroidIssue {
    #[must_use]
    pub fn is_swapped(&self) -> bool {
        matches!(self.kind, IssueKind::OutOfRange { swapped: true, .. })
    }
}

/// Range check of a single entry against `bounds`.
#[must_use]
pub fn check_centroid(record: &RegionRecord, bounds: &Bounds) -> Option<CentroidIssue> {
    let lat_ok = bounds.lat_contains(record.lat);
    let lng_ok = bounds.lng_contains(record.lng);
    if lat_ok && lng_ok {
        return None;
    }

    let swapped =
        !lat_ok && !lng_ok && bounds.lng_contains(record.lat) && bounds.lat_contains(record.lng);

    Some(CentroidIssue {
        name: record.name.clone(),
        lat: record.lat,
        lng: record.lng,
        kind: IssueKind::OutOfRange {
            lat_ok,
            lng_ok,
            swapped,
        },
    })
}

/// Range-check every entry of a bare centroid list.
#[must_use]
pub fn check_centroids(records: &[RegionRecord], bounds: &Bounds) -> Vec<CentroidIssue> {
    records
        .iter()
        .filter_map(|r| check_centroid(r, bounds))
        .collect()
}

/// Full validation of an asset: ranges, duplicate names and landmark references.
#[must_use]
pub fn validate_asset(asset: &RegionAsset) -> Vec<CentroidIssue> {
    let mut issues = check_centroids(&asset.regions, &asset.bounds);

    let mut seen = HashSet::with_capacity(asset.regions.len());
    for record in &asset.regions {
        if !seen.insert(record.name.as_str()) {
            issues.push(CentroidIssue {
                name: record.name.clone(),
                lat: record.lat,
                lng: record.lng,
                kind: IssueKind::DuplicateName,
            });
        }
    }

    for landmark in &asset.landmarks {
        if !seen.contains(landmark.region.as_str()) {
            issues.push(CentroidIssue {
                name: landmark.name.clone(),
                lat: landmark.lat,
                lng: landmark.lng,
                kind: IssueKind::UnknownLandmarkRegion {
                    region: landmark.region.clone(),
                },
            });
        }
    }

    if issues.is_empty() {
        debug!(regions = asset.regions.len(), "Region asset passed validation");
    } else {
        for issue in &issues {
            warn!(name = %issue.name, lat = issue.lat, lng = issue.lng, kind = ?issue.kind, "Region asset issue");
        }
    }
    issues
}

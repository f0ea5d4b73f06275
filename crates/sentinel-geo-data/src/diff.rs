//! Cross-table comparison, used to prove derived copies match the asset.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::asset::RegionRecord;

/// Coordinates closer than this (per component, degrees) are considered equal.
pub const DEFAULT_DIFF_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TableDiff {
    MissingInOne {
        name: String,
        left: Option<[f64; 2]>,
        right: Option<[f64; 2]>,
    },
    CoordsMismatch {
        name: String,
        left: [f64; 2],
        right: [f64; 2],
        d_lat: f64,
        d_lng: f64,
    },
}

impl TableDiff {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::MissingInOne { name, .. } | Self::CoordsMismatch { name, .. } => name,
        }
    }
}

fn index(records: &[RegionRecord]) -> BTreeMap<&str, [f64; 2]> {
    // First occurrence wins, matching lookup-by-name semantics.
    let mut map = BTreeMap::new();
    for r in records {
        map.entry(r.name.as_str()).or_insert([r.lat, r.lng]);
    }
    map
}

/// Compare two tables by name. Results are sorted by name.
#[must_use]
pub fn diff_tables(left: &[RegionRecord], right: &[RegionRecord], tolerance: f64) -> Vec<TableDiff> {
    let left = index(left);
    let right = index(right);

    let mut names: Vec<&str> = left.keys().chain(right.keys()).copied().collect();
    names.sort_unstable();
    names.dedup();

    names
        .into_iter()
        .filter_map(|name| match (left.get(name), right.get(name)) {
            (Some(&a), Some(&b)) => {
                let d_lat = (a[0] - b[0]).abs();
                let d_lng = (a[1] - b[1]).abs();
                (d_lat > tolerance || d_lng > tolerance).then(|| TableDiff::CoordsMismatch {
                    name: name.to_string(),
                    left: a,
                    right: b,
                    d_lat,
                    d_lng,
                })
            }
            (a, b) => Some(TableDiff::MissingInOne {
                name: name.to_string(),
                left: a.copied(),
                right: b.copied(),
            }),
        })
        .collect()
}

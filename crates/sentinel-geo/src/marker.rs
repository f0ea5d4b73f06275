//! Marker descriptions for the map layer. No rendering happens here.

use crate::{
    geo::Coordinate,
    placement::Placement,
    report::{Priority, Report, UNKNOWN_PRIORITY_COLOR, UNKNOWN_PRIORITY_TAG},
};

/// Colour of region-group markers, whose position is only approximate.
pub const REGION_GROUP_COLOR: &str = "#9370db";

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// One geolocated report
    Single,
    /// Several geolocated reports at the same spot
    Cluster,
    /// Reports without coordinates, drawn at their region centroid
    RegionGroup,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub count: usize,
    pub report_ids: Vec<String>,
    pub label: String,
    pub color: &'static str,
    /// Drawn with muted styling to signal an approximate position
    pub muted: bool,
}

/// Highest priority among reports; `None` when no report has one set.
fn top_priority<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Option<Priority> {
    reports.into_iter().filter_map(|r| r.priority).max()
}

fn ids<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Vec<String> {
    reports.into_iter().map(|r| r.id.clone()).collect()
}

/// One marker per cluster, then one per region group.
#[must_use]
pub fn present(placement: &Placement<'_>) -> Vec<MapMarker> {
    let clusters = placement.clusters.iter().map(|cluster| {
        let reports = || cluster.members.iter().map(|m| m.report);
        if let [only] = cluster.members.as_slice() {
            let report = only.report;
            MapMarker {
                kind: MarkerKind::Single,
                position: cluster.center,
                count: 1,
                report_ids: vec![report.id.clone()],
                label: format!("{} {}", report.priority_tag(), report.excerpt(50)),
                color: report.priority_color(),
                muted: false,
            }
        } else {
            let top = top_priority(reports());
            MapMarker {
                kind: MarkerKind::Cluster,
                position: cluster.center,
                count: cluster.len(),
                report_ids: ids(reports()),
                label: format!(
                    "{} {} reports at this location",
                    top.map_or(UNKNOWN_PRIORITY_TAG, Priority::tag),
                    cluster.len()
                ),
                color: top.map_or(UNKNOWN_PRIORITY_COLOR, Priority::color),
                muted: false,
            }
        }
    });

    let groups = placement.region_groups.iter().map(|group| {
        let top = top_priority(group.reports.iter().copied());
        let noun = if group.reports.len() == 1 { "report" } else { "reports" };
        MapMarker {
            kind: MarkerKind::RegionGroup,
            position: group.position,
            count: group.reports.len(),
            report_ids: ids(group.reports.iter().copied()),
            label: format!(
                "{} {} {noun} in {} (approximate location)",
                top.map_or(UNKNOWN_PRIORITY_TAG, Priority::tag),
                group.reports.len(),
                group.region
            ),
            color: REGION_GROUP_COLOR,
            muted: true,
        }
    });

    clusters.chain(groups).collect()
}

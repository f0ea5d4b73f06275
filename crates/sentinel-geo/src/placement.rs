//! Turning a report list into what the map draws.
//!
//! Reports with a usable coordinate are clustered. The rest are grouped by
//! their free-text region name and placed at that region's centroid. A group
//! whose name resolves to no region is not placed: it is listed in
//! [`Placement::unplaced`] and logged, never guessed.

use tracing::{debug, instrument, warn};

use crate::{
    cluster::{Cluster, ClusterEngine, GeolocatedReport},
    geo::{BoundingBox, Coordinate},
    region::RegionResolver,
    report::{Report, ReportFilter},
};

/// Group key used for reports with a blank region name.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Reports without coordinates that share a region name.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGroup<'r> {
    /// Trimmed region name as written on the reports
    pub name: String,
    /// Canonical name of the region it resolved to
    pub region: String,
    /// The region centroid, an approximate position
    pub position: Coordinate,
    pub reports: Vec<&'r Report>,
}

/// Reports whose region name did not resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct UnplacedGroup<'r> {
    pub name: String,
    pub reports: Vec<&'r Report>,
}

/// Everything placed on the map for one report set and zoom level.
#[derive(Debug, Clone)]
pub struct Placement<'r> {
    pub zoom: u8,
    pub clusters: Vec<Cluster<GeolocatedReport<'r>>>,
    pub region_groups: Vec<RegionGroup<'r>>,
    pub unplaced: Vec<UnplacedGroup<'r>>,
    fallback_bounds: BoundingBox,
}

impl<'r> Placement<'r> {
    /// Map view for this placement: the box around every geolocated report,
    /// or the fallback bounds when there are none.
    #[must_use]
    pub fn fit_bounds(&self) -> BoundingBox {
        BoundingBox::enclosing(
            self.clusters
                .iter()
                .flat_map(|c| c.members.iter().map(|m| m.coordinate)),
        )
        .unwrap_or(self.fallback_bounds)
    }

    /// Number of reports drawn on the map.
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum::<usize>()
            + self
                .region_groups
                .iter()
                .map(|g| g.reports.len())
                .sum::<usize>()
    }

    /// Every placed report, clusters first.
    pub fn placed_reports(&self) -> impl Iterator<Item = &'r Report> + '_ {
        self.clusters
            .iter()
            .flat_map(|c| c.members.iter().map(|m| m.report))
            .chain(self.region_groups.iter().flat_map(|g| g.reports.iter().copied()))
    }
}

/// Key a report is grouped under when it has no coordinate.
fn group_key(report: &Report) -> &str {
    let name = report.barangay.trim();
    if name.is_empty() {
        UNKNOWN_LOCATION
    } else {
        name
    }
}

/// Place the reports `filter` accepts.
#[instrument(name = "Place reports", level = "debug", skip_all, fields(zoom = zoom))]
pub fn place_reports<'r, I>(
    resolver: &RegionResolver,
    engine: &ClusterEngine,
    reports: I,
    filter: &ReportFilter,
    zoom: u8,
    fallback_bounds: BoundingBox,
) -> Placement<'r>
where
    I: IntoIterator<Item = &'r Report>,
{
    let mut located = Vec::new();
    // (key, reports) in order of first appearance
    let mut unlocated: Vec<(&'r str, Vec<&'r Report>)> = Vec::new();

    for report in reports.into_iter().filter(|r| filter.accepts(r)) {
        if let Some(geo) = GeolocatedReport::from_report(report) {
            located.push(geo);
            continue;
        }
        let key = group_key(report);
        match unlocated.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(report),
            None => unlocated.push((key, vec![report])),
        }
    }

    let clusters = engine.cluster(&located, zoom);

    let mut region_groups = Vec::new();
    let mut unplaced = Vec::new();
    for (key, reports) in unlocated {
        match resolver.region_named(key) {
            Some(region) => region_groups.push(RegionGroup {
                name: key.to_string(),
                region: region.name().to_string(),
                position: region.centroid(),
                reports,
            }),
            None => {
                warn!(
                    region = key,
                    reports = reports.len(),
                    "No centroid for region, reports not placed on the map"
                );
                unplaced.push(UnplacedGroup {
                    name: key.to_string(),
                    reports,
                });
            }
        }
    }

    debug!(
        clusters = clusters.len(),
        region_groups = region_groups.len(),
        unplaced = unplaced.len(),
        "Placed reports"
    );

    Placement {
        zoom,
        clusters,
        region_groups,
        unplaced,
        fallback_bounds,
    }
}

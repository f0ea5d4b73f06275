//! Greedy single-pass clustering of geolocated items.
//!
//! The engine walks items in input order. Each unassigned item seeds a new
//! cluster, and the remaining unassigned items are absorbed when they fall
//! within the effective radius (see [`Linkage`] for what "within" means).
//! A multi-member cluster is centred on the mean of its members; absorption
//! is not re-run against that new centre.
//!
//! This is quadratic in the number of items and meant for one map view worth
//! of reports, not for bulk data.

use tracing::{debug, instrument};

use crate::{
    config::{ClusterPolicy, Linkage},
    geo::{Coordinate, distance_km},
    report::Report,
};

/// Anything with a position the engine can cluster.
pub trait Geolocated {
    fn coordinate(&self) -> Coordinate;
}

impl Geolocated for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

impl<T: Geolocated + ?Sized> Geolocated for &T {
    fn coordinate(&self) -> Coordinate {
        (**self).coordinate()
    }
}

/// A report paired with the coordinate it is placed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeolocatedReport<'r> {
    pub report: &'r Report,
    pub coordinate: Coordinate,
}

impl<'r> GeolocatedReport<'r> {
    /// `None` when the report has no usable coordinate.
    #[must_use]
    pub fn from_report(report: &'r Report) -> Option<Self> {
        report
            .geolocation()
            .map(|coordinate| Self { report, coordinate })
    }
}

impl Geolocated for GeolocatedReport<'_> {
    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// One or more items sharing a location. Members keep input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<T> {
    pub center: Coordinate,
    pub members: Vec<T>,
}

impl<T> Cluster<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterEngine {
    policy: ClusterPolicy,
}

impl ClusterEngine {
    #[must_use]
    pub const fn new(policy: ClusterPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> &ClusterPolicy {
        &self.policy
    }

    /// Partition `items` into clusters for the given zoom level.
    ///
    /// Every item lands in exactly one cluster and clusters come out in the
    /// order their seeds appear in the input.
    #[instrument(name = "Cluster", level = "debug", skip_all, fields(items = items.len(), zoom = zoom))]
    pub fn cluster<T>(&self, items: &[T], zoom: u8) -> Vec<Cluster<T>>
    where
        T: Geolocated + Clone,
    {
        let radius = self.policy.effective_radius_km(zoom);
        let coords: Vec<Coordinate> = items.iter().map(Geolocated::coordinate).collect();
        let mut assigned = vec![false; items.len()];
        let mut clusters = Vec::new();

        for seed in 0..items.len() {
            if assigned[seed] {
                continue;
            }
            assigned[seed] = true;
            let mut member_idx = vec![seed];

            for candidate in (seed + 1)..items.len() {
                if assigned[candidate] {
                    continue;
                }
                let point = coords[candidate];
                let within = match self.policy.linkage {
                    Linkage::Seed => distance_km(coords[seed], point) <= radius,
                    Linkage::Complete => member_idx
                        .iter()
                        .all(|&m| distance_km(coords[m], point) <= radius),
                };
                if within {
                    assigned[candidate] = true;
                    member_idx.push(candidate);
                }
            }

            let center = if member_idx.len() > 1 {
                Coordinate::mean(member_idx.iter().map(|&i| coords[i])).unwrap_or(coords[seed])
            } else {
                coords[seed]
            };
            clusters.push(Cluster {
                center,
                members: member_idx.into_iter().map(|i| items[i].clone()).collect(),
            });
        }

        debug!(radius_km = radius, clusters = clusters.len(), "Clustering complete");
        clusters
    }
}

//! Small deterministic region tables for tests in this workspace.

use tracing::debug;

use crate::asset::{Bounds, LandmarkRecord, RegionAsset, RegionRecord};

/// Configuration for fixture generation
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    /// Number of regions taken from the base list (clamped to its length)
    pub regions: usize,
    /// Number of landmarks taken from the base list (clamped to its length)
    pub landmarks: usize,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self::sample()
    }
}

impl FixtureConfig {
    /// Three regions and one landmark
    pub fn minimal() -> Self {
        Self {
            regions: 3,
            landmarks: 1,
        }
    }

    /// Every base region and landmark
    pub fn sample() -> Self {
        Self {
            regions: BASE_REGIONS.len(),
            landmarks: BASE_LANDMARKS.len(),
        }
    }
}

pub const FIXTURE_BOUNDS: Bounds = Bounds {
    lat_min: 16.35,
    lat_max: 16.48,
    lng_min: 120.52,
    lng_max: 120.66,
};

const BASE_REGIONS: [(&str, f64, f64); 12] = [
    ("Session Road Area", 16.4125, 120.5964),
    ("Bal-Marcoville (Marcoville)", 16.4089, 120.6017),
    ("Irisan", 16.4083, 120.5606),
    ("Loakan Proper", 16.3833, 120.6167),
    ("Mines View Park", 16.4244, 120.6331),
    ("Bagong Lipunan (Market Area)", 16.4153, 120.596),
    ("General Luna, Upper", 16.415, 120.6014),
    ("General Luna, Lower", 16.4136, 120.5997),
    ("Camp 7", 16.3769, 120.5939),
    ("Pacdal", 16.425, 120.6194),
    ("Holy Ghost Extension", 16.4189, 120.5994),
    ("Kias", 16.3667, 120.6233),
];

const BASE_LANDMARKS: [(&str, &str, f64, f64); 4] = [
    ("Session Road", "Session Road Area", 16.4125, 120.5964),
    ("Mines View Road", "Mines View Park", 16.4244, 120.6331),
    ("SM City Baguio", "Holy Ghost Extension", 16.4189, 120.5994),
    ("PNP Camp", "Camp 7", 16.3769, 120.5939),
];

/// Build an in-memory asset from the base lists.
///
/// Landmarks whose region was not selected are skipped so the fixture always
/// validates cleanly.
#[must_use]
pub fn create_fixture_asset(config: &FixtureConfig) -> RegionAsset {
    debug!(?config, "Creating fixture region asset");

    let regions: Vec<RegionRecord> = BASE_REGIONS
        .iter()
        .take(config.regions)
        .map(|&(name, lat, lng)| RegionRecord::new(name, lat, lng))
        .collect();

    let landmarks = BASE_LANDMARKS
        .iter()
        .filter(|(_, region, _, _)| regions.iter().any(|r| r.name == *region))
        .take(config.landmarks)
        .map(|&(name, region, lat, lng)| LandmarkRecord {
            name: name.to_string(),
            region: region.to_string(),
            lat,
            lng,
        })
        .collect();

    RegionAsset {
        version: "fixture".to_string(),
        municipality: "Baguio City".to_string(),
        bounds: FIXTURE_BOUNDS,
        regions,
        landmarks,
    }
}

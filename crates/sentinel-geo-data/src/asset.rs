//! Schema of the region asset.
//!
//! The asset is the only place where region centroids and landmark positions
//! are written down. Every consumer (resolver, map placement, location search,
//! validation tooling) reads from a loaded [`RegionAsset`].

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DataError, Result};

/// Rectangular lat/lng envelope in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl Bounds {
    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.lat_contains(lat) && self.lng_contains(lng)
    }

    #[must_use]
    pub fn lat_contains(&self, value: f64) -> bool {
        value >= self.lat_min && value <= self.lat_max
    }

    #[must_use]
    pub fn lng_contains(&self, value: f64) -> bool {
        value >= self.lng_min && value <= self.lng_max
    }

    /// True when `lat_min <= lat_max` and `lng_min <= lng_max`.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.lat_min <= self.lat_max && self.lng_min <= self.lng_max
    }
}

/// A named region with its manually chosen reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl RegionRecord {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }
}

/// A street or landmark that search can suggest, tied to the region it sits in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    pub name: String,
    pub region: String,
    pub lat: f64,
    pub lng: f64,
}

/// The versioned region asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAsset {
    pub version: String,
    pub municipality: String,
    pub bounds: Bounds,
    pub regions: Vec<RegionRecord>,
    #[serde(default)]
    pub landmarks: Vec<LandmarkRecord>,
}

impl RegionAsset {
    /// Parse an asset from JSON text.
    ///
    /// Structural problems (no regions, inverted bounds, non-finite numbers)
    /// are rejected here. Range problems are left to [`crate::validate_asset`]
    /// so tooling can still report on a table with bad entries.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let asset: Self = serde_json::from_str(text)?;
        asset.check_structure()?;
        debug!(
            version = %asset.version,
            regions = asset.regions.len(),
            landmarks = asset.landmarks.len(),
            "Parsed region asset"
        );
        Ok(asset)
    }

    /// Read and parse an asset file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = ?path, "Loading region asset from file");
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Pretty-printed JSON, the same layout as the shipped asset.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_structure(&self) -> Result<()> {
        if self.regions.is_empty() {
            return Err(DataError::InvalidAsset("asset has no regions".into()));
        }
        if !self.bounds.is_well_formed() {
            return Err(DataError::InvalidAsset(format!(
                "bounds are inverted: {:?}",
                self.bounds
            )));
        }
        if let Some(bad) = self
            .regions
            .iter()
            .find(|r| !r.lat.is_finite() || !r.lng.is_finite())
        {
            return Err(DataError::InvalidAsset(format!(
                "region `{}` has a non-finite coordinate",
                bad.name
            )));
        }
        if let Some(bad) = self.regions.iter().find(|r| r.name.trim().is_empty()) {
            return Err(DataError::InvalidAsset(format!(
                "region at ({}, {}) has an empty name",
                bad.lat, bad.lng
            )));
        }
        Ok(())
    }
}

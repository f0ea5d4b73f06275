//! The region table and everything that resolves points or names against it.
//!
//! A [`RegionTable`] is built once from the versioned region asset and never
//! mutated afterwards. Iteration always follows asset order, which is what
//! makes nearest-region tie-breaking deterministic.

use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use sentinel_geo_data::RegionAsset;
use tracing::{debug, info, instrument};

use crate::{
    error::Result,
    geo::{BoundingBox, Coordinate},
};

mod address;
mod resolve;

pub use address::{AddressHint, InferenceSource, InferredRegion, ReverseGeocoder};
pub use resolve::RegionResolver;

/// Text before the first `(`, trimmed. `"Bal-Marcoville (Marcoville)"` -> `"Bal-Marcoville"`.
#[must_use]
pub fn alias_stripped(name: &str) -> &str {
    name.split_once('(').map_or(name, |(base, _)| base).trim()
}

/// A named region and its reference point.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    name: String,
    centroid: Coordinate,
    #[cfg_attr(feature = "serde", serde(skip))]
    name_lower: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    base_lower: String,
}

impl Region {
    pub fn new(name: impl Into<String>, centroid: Coordinate) -> Self {
        let name = name.into();
        let name_lower = name.to_lowercase();
        let base_lower = alias_stripped(&name_lower).to_string();
        Self {
            name,
            centroid,
            name_lower,
            base_lower,
        }
    }

    /// Canonical display name, alias included.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn centroid(&self) -> Coordinate {
        self.centroid
    }

    #[must_use]
    pub fn base_name(&self) -> &str {
        alias_stripped(&self.name)
    }

    /// The parenthetical alias, if the name carries one.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        let (_, rest) = self.name.split_once('(')?;
        let alias = rest.split_once(')').map_or(rest, |(alias, _)| alias).trim();
        (!alias.is_empty()).then_some(alias)
    }

    pub(crate) fn name_lower(&self) -> &str {
        &self.name_lower
    }

    pub(crate) fn base_lower(&self) -> &str {
        &self.base_lower
    }
}

/// A street or landmark that location search can suggest.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub name: String,
    /// Name of the region the landmark sits in
    pub region: String,
    pub coordinate: Coordinate,
}

static SHARED_TABLE: OnceCell<Arc<RegionTable>> = OnceCell::new();

/// Immutable, ordered region table with an exact-name index.
#[derive(Debug, Clone)]
pub struct RegionTable {
    version: String,
    municipality: String,
    bounds: BoundingBox,
    regions: Vec<Region>,
    landmarks: Vec<Landmark>,
    by_name: AHashMap<String, usize>,
}

impl RegionTable {
    /// Build a table from a parsed asset. On duplicate names the first entry
    /// owns the exact-name index.
    #[must_use]
    pub fn from_asset(asset: &RegionAsset) -> Self {
        let regions: Vec<Region> = asset
            .regions
            .iter()
            .map(|r| Region::new(r.name.clone(), Coordinate::new(r.lat, r.lng)))
            .collect();

        let mut by_name = AHashMap::with_capacity(regions.len());
        for (i, region) in regions.iter().enumerate() {
            by_name.entry(region.name.clone()).or_insert(i);
        }

        let landmarks = asset
            .landmarks
            .iter()
            .map(|l| Landmark {
                name: l.name.clone(),
                region: l.region.clone(),
                coordinate: Coordinate::new(l.lat, l.lng),
            })
            .collect();

        debug!(
            version = %asset.version,
            regions = regions.len(),
            "Built region table"
        );

        Self {
            version: asset.version.clone(),
            municipality: asset.municipality.clone(),
            bounds: asset.bounds.into(),
            regions,
            landmarks,
            by_name,
        }
    }

    /// Table built from the asset compiled into the library.
    #[instrument(name = "Load embedded region table", level = "info")]
    pub fn load_embedded() -> Result<Self> {
        Ok(Self::from_asset(&sentinel_geo_data::load_embedded()?))
    }

    /// Table built from `SENTINEL_REGION_TABLE` when set, else the embedded asset.
    #[instrument(name = "Load configured region table", level = "info")]
    pub fn load_configured() -> Result<Self> {
        let table = Self::from_asset(&sentinel_geo_data::load_configured()?);
        info!(
            version = %table.version,
            regions = table.len(),
            landmarks = table.landmarks.len(),
            "Region table ready"
        );
        Ok(table)
    }

    /// Process-wide table, loaded on first use through [`Self::load_configured`].
    pub fn shared() -> Result<Arc<Self>> {
        SHARED_TABLE
            .get_or_try_init(|| Self::load_configured().map(Arc::new))
            .cloned()
    }

    /// Exact-name lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Region> {
        self.by_name.get(name).map(|&i| &self.regions[i])
    }

    /// Regions in asset order.
    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[must_use]
    pub const fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn municipality(&self) -> &str {
        &self.municipality
    }
}

impl<'a> IntoIterator for &'a RegionTable {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

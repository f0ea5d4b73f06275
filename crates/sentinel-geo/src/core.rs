//! The [`GeoCore`] facade.
//!
//! A `GeoCore` bundles one region table with one configuration and hands out
//! every geo operation the report and map surfaces need. It is cheap to clone:
//! the table is shared behind an `Arc`.
//!
//! ```rust
//! use sentinel_geo::{Coordinate, GeoCore};
//!
//! let core = GeoCore::new_embedded()?;
//! let region = core.nearest_region(Coordinate::new(16.4125, 120.5964));
//! assert!(region.is_some());
//!
//! let suggestions = core.search("session");
//! assert!(!suggestions.is_empty());
//! # Ok::<(), sentinel_geo::error::GeoError>(())
//! ```

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    cluster::{Cluster, ClusterEngine, Geolocated},
    config::GeoConfig,
    error::Result,
    geo::{BoundingBox, Coordinate},
    marker::{MapMarker, present},
    matcher::NameMatcher,
    placement::{Placement, place_reports},
    region::{InferredRegion, Region, RegionResolver, RegionTable, ReverseGeocoder},
    report::{Report, ReportFilter},
    search::{LocationSearch, LocationSuggestion},
    store::{NotificationCenter, ReportStore},
};

/// Region resolution, matching, search, clustering and placement over one table.
#[derive(Debug, Clone)]
pub struct GeoCore {
    config: GeoConfig,
    resolver: RegionResolver,
    matcher: NameMatcher,
    engine: ClusterEngine,
    search: LocationSearch,
}

impl GeoCore {
    /// Core over the process-wide table with the default configuration.
    ///
    /// The table honours `SENTINEL_REGION_TABLE` and is loaded once per process.
    #[instrument(name = "Initialize GeoCore", level = "info")]
    pub fn new_embedded() -> Result<Self> {
        Ok(Self::with_config(RegionTable::shared()?, GeoConfig::default()))
    }

    /// Core over the process-wide table with a custom configuration.
    pub fn shared(config: GeoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(RegionTable::shared()?, config))
    }

    #[must_use]
    pub fn from_table(table: Arc<RegionTable>) -> Self {
        Self::with_config(table, GeoConfig::default())
    }

    /// Assumes `config` is valid; see [`GeoCoreBuilder::build`] for the checked path.
    #[must_use]
    pub fn with_config(table: Arc<RegionTable>, config: GeoConfig) -> Self {
        info!(
            version = table.version(),
            regions = table.len(),
            "GeoCore ready"
        );
        Self {
            resolver: RegionResolver::new(Arc::clone(&table), &config),
            matcher: NameMatcher::from_config(&config),
            engine: ClusterEngine::new(config.cluster),
            search: LocationSearch::new(table, &config),
            config,
        }
    }

    #[must_use]
    pub fn builder() -> GeoCoreBuilder {
        GeoCoreBuilder::new()
    }

    #[must_use]
    pub const fn config(&self) -> &GeoConfig {
        &self.config
    }

    #[must_use]
    pub fn table(&self) -> &RegionTable {
        self.resolver.table()
    }

    #[must_use]
    pub const fn resolver(&self) -> &RegionResolver {
        &self.resolver
    }

    #[must_use]
    pub const fn location_search(&self) -> &LocationSearch {
        &self.search
    }

    // Region resolution

    #[must_use]
    pub fn nearest_region(&self, point: Coordinate) -> Option<&Region> {
        self.resolver.nearest_region(point)
    }

    #[must_use]
    pub fn nearest_region_strict(&self, point: Coordinate) -> Option<&Region> {
        self.resolver.nearest_region_strict(point)
    }

    #[must_use]
    pub fn region_named(&self, name: &str) -> Option<&Region> {
        self.resolver.region_named(name)
    }

    #[must_use]
    pub fn centroid_of(&self, name: &str) -> Option<Coordinate> {
        self.resolver.centroid_of(name)
    }

    pub fn infer_region<G>(&self, geocoder: &G, point: Coordinate) -> Option<InferredRegion<'_>>
    where
        G: ReverseGeocoder + ?Sized,
    {
        self.resolver.infer_region(geocoder, point)
    }

    // Matching and search

    #[must_use]
    pub fn match_score(&self, query: &str, candidate: &str) -> u32 {
        self.matcher.score(query, candidate)
    }

    #[must_use]
    pub fn search(&self, query: &str) -> Vec<LocationSuggestion> {
        self.search.search(query)
    }

    #[must_use]
    pub fn coordinates_of(&self, name: &str) -> Option<Coordinate> {
        self.search.coordinates_of(name)
    }

    #[must_use]
    pub fn nearby(&self, point: Coordinate, radius_km: Option<f64>) -> Vec<LocationSuggestion> {
        self.search.nearby(point, radius_km)
    }

    // Clustering and placement

    #[must_use]
    pub fn cluster<T>(&self, items: &[T], zoom: u8) -> Vec<Cluster<T>>
    where
        T: Geolocated + Clone,
    {
        self.engine.cluster(items, zoom)
    }

    /// Place approved reports at `zoom`, or the configured default zoom.
    pub fn place_reports<'r, I>(&self, reports: I, zoom: Option<u8>) -> Placement<'r>
    where
        I: IntoIterator<Item = &'r Report>,
    {
        self.place_reports_with_filter(reports, &ReportFilter::default(), zoom)
    }

    pub fn place_reports_with_filter<'r, I>(
        &self,
        reports: I,
        filter: &ReportFilter,
        zoom: Option<u8>,
    ) -> Placement<'r>
    where
        I: IntoIterator<Item = &'r Report>,
    {
        place_reports(
            &self.resolver,
            &self.engine,
            reports,
            filter,
            zoom.unwrap_or(self.config.default_zoom),
            self.fallback_bounds(),
        )
    }

    /// Map view used when nothing is geolocated: the configured override,
    /// else the table's own bounds.
    #[must_use]
    pub fn fallback_bounds(&self) -> BoundingBox {
        self.config.bounds.unwrap_or_else(|| self.table().bounds())
    }

    #[must_use]
    pub fn markers(&self, placement: &Placement<'_>) -> Vec<MapMarker> {
        present(placement)
    }

    // Stores

    /// Fresh report store wired to a fresh notification center.
    #[must_use]
    pub fn new_stores(&self) -> (ReportStore, NotificationCenter) {
        let notifications = NotificationCenter::new(self.config.event_capacity);
        let reports = ReportStore::new(notifications.clone(), self.config.event_capacity);
        (reports, notifications)
    }
}

/// Builder for [`GeoCore`].
#[derive(Debug, Clone, Default)]
pub struct GeoCoreBuilder {
    table: Option<Arc<RegionTable>>,
    config: GeoConfig,
}

impl GeoCoreBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this table instead of the process-wide one.
    #[must_use]
    pub fn table(mut self, table: impl Into<Arc<RegionTable>>) -> Self {
        self.table = Some(table.into());
        self
    }

    #[must_use]
    pub fn config(mut self, config: GeoConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and load the shared table if none was given.
    pub fn build(self) -> Result<GeoCore> {
        self.config.validate()?;
        let table = match self.table {
            Some(table) => table,
            None => RegionTable::shared()?,
        };
        Ok(GeoCore::with_config(table, self.config))
    }
}
